use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

const LOG_FILE_PREFIX: &str = "ycnews.log";

/// Filter directives built from the config: the default level followed by
/// per-module overrides.
pub fn filter_directives(config: &LoggingConfig) -> String {
    let mut filter_str = config.level.clone();
    for (module, level) in &config.module_levels {
        filter_str.push_str(&format!(",{}={}", module, level));
    }
    filter_str
}

/// Send tracing output to a daily rotating file in `log_dir`.
///
/// stdout and stderr belong to the selector (list, preview and error text),
/// so nothing is logged there. Keep the returned guard alive until exit or
/// buffered lines are lost.
pub fn init(config: &LoggingConfig, log_dir: &Path) -> Result<WorkerGuard> {
    fs::create_dir_all(log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;

    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // RUST_LOG, when set, takes precedence over the config.
    let env_filter = match std::env::var("RUST_LOG") {
        Ok(_) => EnvFilter::from_default_env(),
        Err(_) => EnvFilter::new(filter_directives(config)),
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(non_blocking)
        .with_ansi(false)
        .compact()
        .try_init()
        .map_err(|e| anyhow!("failed to install log subscriber: {e}"))?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directives_include_module_levels() {
        let mut config = LoggingConfig::default();
        assert_eq!(filter_directives(&config), "info");

        config.level = "warn".to_string();
        config
            .module_levels
            .insert("ycnews::api".to_string(), "debug".to_string());
        config
            .module_levels
            .insert("reqwest".to_string(), "error".to_string());
        assert_eq!(
            filter_directives(&config),
            "warn,reqwest=error,ycnews::api=debug"
        );
    }
}
