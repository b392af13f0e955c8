use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{Context, Result, bail};

use crate::api::StoryListType;
use crate::config::AppConfig;

/// Browsers that take over the terminal and must run attached to it.
const TERMINAL_BROWSERS: &[&str] = &["elinks", "lynx", "w3m", "links"];

/// Opener name that hands the URL to the desktop's default handler.
pub const DEFAULT_OPENER: &str = "default";

/// Environment variable the selector reads its list command from.
pub const SELECTOR_DEFAULT_COMMAND_ENV: &str = "FZF_DEFAULT_COMMAND";

/// Which of the configured external programs are on `PATH`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InstalledTools {
    pub selector: bool,
    pub terminal_browser: bool,
    pub graphical_browser: bool,
}

impl InstalledTools {
    pub fn probe(config: &AppConfig) -> Self {
        let tools = Self {
            selector: is_installed(&config.selector),
            terminal_browser: is_installed(&config.terminal_browser),
            graphical_browser: is_installed(&config.graphical_browser),
        };
        tracing::debug!(?tools, "probed external programs");
        tools
    }
}

pub fn is_installed(program: &str) -> bool {
    match env::var_os("PATH") {
        Some(path) => find_in_path(program, &path).is_some(),
        None => false,
    }
}

/// Resolve `program` the way a shell would: names containing a separator
/// are checked as paths, bare names are searched in `path_var`.
pub fn find_in_path(program: &str, path_var: &OsStr) -> Option<PathBuf> {
    if program.is_empty() {
        return None;
    }
    if program.contains('/') {
        let path = PathBuf::from(program);
        return is_executable(&path).then_some(path);
    }
    env::split_paths(path_var)
        .map(|dir| dir.join(program))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

fn is_terminal_browser(program: &str) -> bool {
    let name = Path::new(program)
        .file_name()
        .and_then(OsStr::to_str)
        .unwrap_or(program);
    TERMINAL_BROWSERS.contains(&name)
}

/// Open `url` with `program`.
///
/// Terminal browsers inherit stdio and are waited for; anything else is
/// started in the background and left running.
pub fn open_url(program: &str, url: &str) -> Result<()> {
    if program == DEFAULT_OPENER {
        tracing::info!(url, "opening with default handler");
        return open::that_detached(url).with_context(|| format!("cannot open {url}"));
    }

    let mut cmd = Command::new(program);
    cmd.arg(url);

    if is_terminal_browser(program) {
        tracing::info!(program, url, "opening in terminal browser");
        let status = cmd
            .status()
            .with_context(|| format!("cannot run {program}"))?;
        if !status.success() {
            tracing::warn!(program, %status, "browser exited unsuccessfully");
        }
    } else {
        tracing::info!(program, url, "starting browser");
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("cannot start {program}"))?;
    }
    Ok(())
}

/// Quote `s` for `sh` unless it is made only of safe characters.
pub fn shell_quote(s: &str) -> String {
    let safe = !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || "/._-+:@%=,".contains(c));
    if safe {
        s.to_string()
    } else {
        format!("'{}'", s.replace('\'', r"'\''"))
    }
}

/// How the selector calls back into this binary: the executable plus the
/// config file the launcher itself was started with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Callback {
    program: String,
    config: Option<PathBuf>,
}

impl Callback {
    pub fn new(program: impl Into<String>, config: Option<PathBuf>) -> Self {
        Self {
            program: program.into(),
            config,
        }
    }

    /// Shell prefix every callback starts with.
    pub fn command(&self) -> String {
        let mut cmd = shell_quote(&self.program);
        if let Some(config) = &self.config {
            cmd.push_str(" --config ");
            cmd.push_str(&shell_quote(&config.to_string_lossy()));
        }
        cmd
    }
}

/// Command the selector runs to obtain its list.
pub fn list_command(callback: &Callback, list_type: StoryListType) -> String {
    format!("{} --list --stories {}", callback.command(), list_type)
}

/// Selector arguments wiring preview and key bindings back to `callback`.
pub fn selector_args(callback: &Callback, config: &AppConfig) -> Vec<String> {
    let prog = callback.command();
    let comments = format!("{prog} --view-comments --line {{}} | {}", config.pager);
    vec![
        "--ansi".to_string(),
        format!("--preview={prog} --preview --line {{}}"),
        "--preview-window=right:40%:wrap".to_string(),
        "--bind=alt-p:preview-up,alt-n:preview-down,alt-u:preview-page-up,alt-d:preview-page-down"
            .to_string(),
        "--bind=f10:abort".to_string(),
        format!(
            "--bind=f2:execute({prog} --open {} --line {{}})",
            shell_quote(&config.terminal_browser)
        ),
        format!(
            "--bind=f3:execute({prog} --open {} --line {{}})",
            shell_quote(&config.graphical_browser)
        ),
        format!("--bind=f4:execute({comments})"),
        format!("--bind=enter:execute({comments})"),
    ]
}

/// Hand the terminal to the selector until the user quits it.
pub fn run_selector(
    config: &AppConfig,
    tools: &InstalledTools,
    callback: &Callback,
    list_type: StoryListType,
) -> Result<()> {
    if !tools.selector {
        bail!("{} is not installed", config.selector);
    }

    let args = selector_args(callback, config);
    let list = list_command(callback, list_type);
    tracing::info!(selector = %config.selector, list = %list, "launching selector");

    let status = Command::new(&config.selector)
        .args(&args)
        .env(SELECTOR_DEFAULT_COMMAND_ENV, &list)
        .status()
        .with_context(|| format!("cannot run {}", config.selector))?;

    // 1: no match, 130: aborted by the user
    match status.code() {
        Some(0 | 1 | 130) => Ok(()),
        _ => bail!("{} exited with {}", config.selector, status),
    }
}
