use std::io::{self, Write};

use jiff::Timestamp;
use jiff::tz::TimeZone;
use owo_colors::OwoColorize;

use crate::config::AppConfig;
use crate::internal::launcher::InstalledTools;
use crate::internal::models::Item;
use crate::utils::datetime::{format_relative, format_unix};

const PREVIEW_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn missing_marker(installed: bool, name: &str) -> String {
    if installed {
        String::new()
    } else {
        format!(" {}", format!("({name} is not installed)").red())
    }
}

/// Key legend followed by the story's metadata, as shown in the preview pane.
pub fn write_preview<W: Write>(
    out: &mut W,
    item: &Item,
    config: &AppConfig,
    tools: &InstalledTools,
    tz: &TimeZone,
    now: Timestamp,
) -> io::Result<()> {
    writeln!(
        out,
        "{}          -- open URL in {}{}",
        "F2".red(),
        config.terminal_browser,
        missing_marker(tools.terminal_browser, &config.terminal_browser)
    )?;
    writeln!(
        out,
        "{}          -- open URL in {}{}",
        "F3".red(),
        config.graphical_browser,
        missing_marker(tools.graphical_browser, &config.graphical_browser)
    )?;
    writeln!(
        out,
        "{} -- open comments in {} (Q -- quit)",
        "F4 or Enter".red(),
        config.pager_name()
    )?;
    writeln!(out, "{}         -- quit\n\n\n", "F10".red())?;

    writeln!(
        out,
        "time:  {} ({})",
        format_unix(item.time, tz, PREVIEW_TIME_FORMAT),
        format_relative(item.time, now)
    )?;
    writeln!(out, "by:    {}", item.by)?;
    writeln!(out, "title: {}", item.title)?;
    writeln!(out, "score:    {}", item.score)?;
    writeln!(out, "id:       {}", item.id)?;
    writeln!(out, "comments: {}", item.kids.len())?;
    writeln!(out, "url: {}", item.url)?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Item {
        Item {
            id: 8863,
            by: "dhouston".into(),
            title: "My YC app: Dropbox".into(),
            score: 104,
            time: 1175714200,
            kids: vec![9224, 8917],
            url: "http://www.getdropbox.com/u/2/screencast.html".into(),
            ..Default::default()
        }
    }

    fn render(tools: InstalledTools) -> String {
        let mut out = Vec::new();
        let now = Timestamp::from_second(1175714200 + 3 * 3_600).unwrap();
        write_preview(
            &mut out,
            &sample(),
            &AppConfig::default(),
            &tools,
            &TimeZone::UTC,
            now,
        )
        .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn metadata_block() {
        let all = InstalledTools {
            selector: true,
            terminal_browser: true,
            graphical_browser: true,
        };
        let out = render(all);
        let metadata: Vec<_> = out.lines().skip(7).collect();
        assert_eq!(
            metadata,
            vec![
                "time:  2007-04-04 19:16:40 (3h ago)",
                "by:    dhouston",
                "title: My YC app: Dropbox",
                "score:    104",
                "id:       8863",
                "comments: 2",
                "url: http://www.getdropbox.com/u/2/screencast.html",
            ]
        );
        assert!(!out.contains("is not installed"));
    }

    #[test]
    fn legend_marks_missing_browsers() {
        let out = render(InstalledTools {
            selector: true,
            terminal_browser: false,
            graphical_browser: true,
        });
        let lines: Vec<_> = out.lines().collect();
        assert!(lines[0].contains("open URL in elinks"));
        assert!(lines[0].contains("(elinks is not installed)"));
        assert!(!lines[1].contains("is not installed"));
        assert!(lines[2].contains("open comments in less"));
    }
}
