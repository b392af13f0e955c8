use anyhow::Result;
use clap::Parser;

use ycnews::app::{self, Action};
use ycnews::cli::{self, Cli};
use ycnews::config::{AppConfig, AppContext};
use ycnews::internal::launcher::Callback;
use ycnews::logging;

fn main() {
    // Failures end the invocation with a message; the selector shows
    // whatever we print, so there is no exit-code taxonomy.
    if let Err(err) = try_main() {
        eprintln!("{err:#}");
    }
}

fn try_main() -> Result<()> {
    let cli = Cli::parse_from(cli::normalize_args(std::env::args_os()));
    let loaded = AppConfig::load(cli.config.as_deref())?;

    let cache_dir = loaded.config.cache_dir()?;
    let log_dir = loaded.config.log_dir(&cache_dir);
    let _guard = logging::init(&loaded.config.logging, &log_dir)?;
    loaded.log();

    // callbacks may run from another directory than ours
    let config_path = cli
        .config
        .as_deref()
        .map(|p| std::path::absolute(p).unwrap_or_else(|_| p.to_path_buf()));
    let callback = Callback::new(self_program(), config_path);

    let ctx = AppContext::new(loaded.config, callback)?;
    app::run(&ctx, Action::from_cli(&cli))
}

/// Path the selector should use to call back into this binary.
fn self_program() -> String {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.to_str().map(str::to_string))
        .or_else(|| std::env::args().next())
        .unwrap_or_else(|| "ycnews".to_string())
}
