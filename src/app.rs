use std::io::{self, BufWriter};

use anyhow::{Context, Result};
use jiff::Timestamp;

use crate::api::StoryListType;
use crate::cli::Cli;
use crate::config::AppContext;
use crate::internal::launcher;
use crate::internal::listing::list_stories;
use crate::internal::locator::locate;
use crate::internal::models::Item;
use crate::internal::preview::write_preview;
use crate::internal::render::ThreadRenderer;

/// What one invocation of the binary does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Open the story's link with an external program.
    Open { program: String, line: String },
    /// Print the preview pane for a story.
    Preview { line: String },
    /// Print the story's comment thread.
    ViewComments { line: String },
    /// Print the selector list.
    List { list_type: StoryListType },
    /// Launch the selector wired back to this binary.
    Interactive { list_type: StoryListType },
}

impl Action {
    /// Pick the action for a flag combination; the first match wins in the
    /// order open, preview, view comments, list, interactive.
    pub fn from_cli(cli: &Cli) -> Self {
        let line = cli.line.clone().unwrap_or_default();

        if let Some(program) = cli.open.as_deref().filter(|p| !p.is_empty()) {
            Action::Open {
                program: program.to_string(),
                line,
            }
        } else if cli.preview {
            Action::Preview { line }
        } else if cli.view_comments {
            Action::ViewComments { line }
        } else if cli.list {
            Action::List {
                list_type: cli.stories,
            }
        } else {
            Action::Interactive {
                list_type: cli.stories,
            }
        }
    }
}

/// Link to open for `item`: its URL, or its discussion page for text posts.
pub fn target_url(item: &Item, discussion_url: &str) -> String {
    if item.url.is_empty() {
        format!("{}{}", discussion_url, item.id)
    } else {
        item.url.clone()
    }
}

pub fn run(ctx: &AppContext, action: Action) -> Result<()> {
    tracing::info!(?action, "dispatching");

    match action {
        Action::Open { program, line } => {
            let item = locate(&ctx.api, &line)?;
            let url = target_url(&item, &ctx.config.discussion_url);
            launcher::open_url(&program, &url)
        }
        Action::Preview { line } => {
            let item = locate(&ctx.api, &line)?;
            let mut out = BufWriter::new(io::stdout().lock());
            let res = write_preview(
                &mut out,
                &item,
                &ctx.config,
                &ctx.tools,
                &ctx.tz,
                Timestamp::now(),
            );
            ignore_broken_pipe(res).context("cannot write preview")
        }
        Action::ViewComments { line } => {
            let item = locate(&ctx.api, &line)?;
            let mut out = BufWriter::new(io::stdout().lock());
            let res = ThreadRenderer::new(&ctx.api, ctx.config.wrap_width).render(&item, &mut out);
            ignore_broken_pipe(res).context("cannot write comments")
        }
        Action::List { list_type } => {
            let mut out = BufWriter::new(io::stdout().lock());
            match list_stories(&ctx.api, list_type, &ctx.tz, &mut out) {
                Err(e) if is_broken_pipe(&e) => Ok(()),
                res => res,
            }
        }
        Action::Interactive { list_type } => {
            launcher::run_selector(&ctx.config, &ctx.tools, &ctx.callback, list_type)
        }
    }
}

/// The reader of our stdout (pager, selector) went away; nothing left to do.
fn ignore_broken_pipe(res: io::Result<()>) -> io::Result<()> {
    match res {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        res => res,
    }
}

fn is_broken_pipe(err: &anyhow::Error) -> bool {
    err.downcast_ref::<io::Error>()
        .is_some_and(|e| e.kind() == io::ErrorKind::BrokenPipe)
}
