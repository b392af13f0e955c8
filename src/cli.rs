use std::ffi::OsString;
use std::path::PathBuf;

use clap::{CommandFactory, Parser};

use crate::api::StoryListType;

/// Browse Hacker News through fzf.
///
/// Without flags the selector is launched; it calls back into this binary
/// with the flags below to list stories, preview one, or act on it.
/// Long flags may also be spelled with a single dash (`-list`, `-line=...`).
#[derive(Parser, Debug, Default)]
#[command(name = "ycnews", version, long_about = None)]
pub struct Cli {
    /// Story record to open or preview; RECORD should be 'whatever [ITEM_ID]'
    #[arg(long, value_name = "RECORD")]
    pub line: Option<String>,

    /// Preview the story named by --line
    #[arg(long)]
    pub preview: bool,

    /// List stories, one per line
    #[arg(long)]
    pub list: bool,

    /// Open the story URL in PROGRAM ("default" uses the system handler)
    #[arg(long, value_name = "PROGRAM")]
    pub open: Option<String>,

    /// Print the comment thread of the story named by --line
    #[arg(long)]
    pub view_comments: bool,

    /// Story ranking to list
    #[arg(long, value_enum, default_value_t = StoryListType::Top)]
    pub stories: StoryListType,

    /// Read configuration from this RON file first
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Rewrite single-dash long flags (`-list`, `-line=x`) to their `--` form.
///
/// Values of flags that take one are passed through untouched, as is
/// everything after `--`.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut cmd = Cli::command();
    cmd.build();
    let longs: Vec<(String, bool)> = cmd
        .get_arguments()
        .filter_map(|arg| {
            arg.get_long()
                .map(|long| (long.to_string(), arg.get_action().takes_values()))
        })
        .collect();
    let takes_value = |name: &str| longs.iter().find(|(long, _)| long == name).map(|(_, v)| *v);

    let mut args = args.into_iter().map(Into::into);
    let mut out: Vec<OsString> = args.next().into_iter().collect();
    let mut expect_value = false;
    let mut passthrough = false;

    for arg in args {
        if passthrough || expect_value {
            expect_value = false;
            out.push(arg);
            continue;
        }

        let mut rewritten = None;
        if let Some(s) = arg.to_str() {
            if s == "--" {
                passthrough = true;
            } else if let Some(flag) = s.strip_prefix("--") {
                expect_value = !flag.contains('=') && takes_value(flag) == Some(true);
            } else if let Some(flag) = s.strip_prefix('-') {
                let (name, inline) = match flag.split_once('=') {
                    Some((name, _)) => (name, true),
                    None => (flag, false),
                };
                if let Some(takes) = takes_value(name) {
                    expect_value = takes && !inline;
                    rewritten = Some(OsString::from(format!("-{s}")));
                }
            }
        }
        out.push(rewritten.unwrap_or(arg));
    }
    out
}
