use anyhow::{Context, Result};
use jiff::tz::TimeZone;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::api::{ApiService, HN_API_BASE_URL};
use crate::internal::cache::DiskCache;
use crate::internal::launcher::{Callback, InstalledTools};

const CONFIG_FILE_NAME: &str = "config.ron";
const APP_DIR_NAME: &str = "ycnews";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Versioned API root, e.g. "https://hacker-news.firebaseio.com/v0/".
    pub api_base_url: String,
    /// Directory holding cached item bodies. Defaults to "$HOME/.cache/ycnews".
    pub cache_dir: Option<String>,
    /// Column at which comment text is wrapped.
    pub wrap_width: usize,
    /// Fuzzy selector launched in interactive mode.
    pub selector: String,
    /// Shell command the rendered comment thread is piped into.
    pub pager: String,
    /// Browser bound to F2; runs inside the terminal.
    pub terminal_browser: String,
    /// Browser bound to F3; started in the background.
    pub graphical_browser: String,
    /// Prefix of the discussion page opened for stories without a link.
    pub discussion_url: String,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level when RUST_LOG is not set.
    pub level: String,
    /// Per-module overrides, e.g. { "ycnews::api": "debug" }.
    pub module_levels: BTreeMap<String, String>,
    /// Directory for the rolling log file. Defaults to "<cache_dir>/logs".
    pub log_directory: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: HN_API_BASE_URL.to_string(),
            cache_dir: None,
            wrap_width: 72,
            selector: "fzf".to_string(),
            pager: "less -r".to_string(),
            terminal_browser: "elinks".to_string(),
            graphical_browser: "firefox".to_string(),
            discussion_url: "https://news.ycombinator.com/item?id=".to_string(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            module_levels: BTreeMap::new(),
            log_directory: None,
        }
    }
}

/// Outcome of the config search, kept until logging is up so it can be
/// reported.
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: AppConfig,
    /// File the config came from; `None` means built-in defaults.
    pub path: Option<PathBuf>,
    /// Candidates that exist but could not be read or parsed.
    pub rejected: Vec<(PathBuf, String)>,
}

impl LoadedConfig {
    pub fn log(&self) {
        for (path, reason) in &self.rejected {
            tracing::warn!("Skipped config at {}: {}", path.display(), reason);
        }
        match &self.path {
            Some(path) => tracing::info!("Loaded config from {}", path.display()),
            None => tracing::info!("No config file found, using defaults"),
        }
    }
}

impl AppConfig {
    /// Load configuration.
    ///
    /// An `explicit` file must exist and parse. Otherwise the first of
    /// `./config.ron`, `config.ron` next to the executable and
    /// `<config dir>/ycnews/config.ron` that parses wins.
    pub fn load(explicit: Option<&Path>) -> Result<LoadedConfig> {
        if let Some(path) = explicit {
            let config = Self::load_file(path)?;
            return Ok(LoadedConfig {
                config,
                path: Some(path.to_path_buf()),
                rejected: Vec::new(),
            });
        }

        let mut candidates = vec![PathBuf::from(CONFIG_FILE_NAME)];

        if let Ok(exe) = std::env::current_exe()
            && let Some(dir) = exe.parent()
        {
            candidates.push(dir.join(CONFIG_FILE_NAME));
        }

        if let Some(dir) = dirs::config_dir() {
            candidates.push(dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME));
        }

        Ok(Self::load_from(&candidates))
    }

    pub fn load_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("cannot read config {}", path.display()))?;
        ron::from_str(&content).with_context(|| format!("cannot parse config {}", path.display()))
    }

    fn load_from(candidates: &[PathBuf]) -> LoadedConfig {
        let mut rejected = Vec::new();
        for path in candidates.iter().filter(|p| p.exists()) {
            match Self::load_file(path) {
                Ok(config) => {
                    return LoadedConfig {
                        config,
                        path: Some(path.clone()),
                        rejected,
                    };
                }
                Err(e) => rejected.push((path.clone(), format!("{e:#}"))),
            }
        }

        LoadedConfig {
            config: Self::default(),
            path: None,
            rejected,
        }
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        match &self.cache_dir {
            Some(dir) => Ok(PathBuf::from(dir)),
            None => {
                let home = dirs::home_dir().context("cannot locate home directory (is HOME set?)")?;
                Ok(home.join(".cache").join(APP_DIR_NAME))
            }
        }
    }

    pub fn log_dir(&self, cache_dir: &Path) -> PathBuf {
        self.logging
            .log_directory
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| cache_dir.join("logs"))
    }

    /// Program name of the pager command, for display.
    pub fn pager_name(&self) -> &str {
        self.pager.split_whitespace().next().unwrap_or("less")
    }
}

/// Everything one invocation needs, built once in `main` and passed down.
pub struct AppContext {
    pub config: AppConfig,
    pub api: ApiService,
    pub tools: InstalledTools,
    /// How the selector should re-invoke this binary.
    pub callback: Callback,
    pub tz: TimeZone,
}

impl AppContext {
    pub fn new(config: AppConfig, callback: Callback) -> Result<Self> {
        let cache = DiskCache::open(config.cache_dir()?)?;
        let api = ApiService::new(config.api_base_url.clone(), cache)?;
        let tools = InstalledTools::probe(&config);
        Ok(Self {
            config,
            api,
            tools,
            callback,
            tz: TimeZone::system(),
        })
    }
}
