use jiff::Timestamp;
use jiff::tz::TimeZone;

/// Format a unix timestamp (seconds) in `tz` using a strftime pattern.
/// Out-of-range timestamps render as "unknown".
pub fn format_unix(timestamp: i64, tz: &TimeZone, pattern: &str) -> String {
    match Timestamp::from_second(timestamp) {
        Ok(ts) => ts.to_zoned(tz.clone()).strftime(pattern).to_string(),
        Err(_) => "unknown".to_string(),
    }
}

/// Format a unix timestamp (seconds) into a short relative string like "2d ago",
/// "3h ago", "15m ago", or "just now".
pub fn format_relative(timestamp: i64, now: Timestamp) -> String {
    let now_secs = now.as_second();

    // If timestamp is in the future or invalid, show just now
    if now_secs <= timestamp {
        return "just now".to_string();
    }

    let delta = now_secs.saturating_sub(timestamp);
    let days = delta / 86_400;
    if days > 0 {
        return format!("{}d ago", days);
    }

    let hours = delta / 3_600;
    if hours > 0 {
        return format!("{}h ago", hours);
    }

    let minutes = delta / 60;
    if minutes > 0 {
        return format!("{}m ago", minutes);
    }

    "just now".to_string()
}
