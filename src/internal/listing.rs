use std::io::Write;

use anyhow::{Context, Result};
use jiff::tz::TimeZone;
use owo_colors::OwoColorize;

use crate::api::{ApiService, StoryListType};
use crate::internal::models::Item;
use crate::utils::datetime::format_unix;

const LIST_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Highlight band a story score falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreTier {
    Plain,
    Warm,
    Hot,
}

pub fn score_tier(score: i64) -> ScoreTier {
    if score > 1000 {
        ScoreTier::Hot
    } else if score > 500 {
        ScoreTier::Warm
    } else {
        ScoreTier::Plain
    }
}

/// Four-column score field, coloured by tier.
pub fn format_score(score: i64) -> String {
    let field = format!("{:4}", score);
    match score_tier(score) {
        ScoreTier::Hot => field.red().to_string(),
        ScoreTier::Warm => field.yellow().to_string(),
        ScoreTier::Plain => field,
    }
}

/// One selector line for a story. The trailing `[id]` is what the locator
/// reads back; everything before it is display text.
pub fn format_story_line(item: &Item, tz: &TimeZone) -> String {
    format!(
        "{}  {}  {:4}  {} [{}]",
        format_unix(item.time, tz, LIST_TIME_FORMAT),
        format_score(item.score),
        item.kids.len(),
        item.title,
        item.id
    )
}

/// Write one line per story of `list_type` to `out`.
///
/// The ranking itself must load; a story that fails to load is reported in
/// place on its own line and the listing continues.
pub fn list_stories<W: Write>(
    api: &ApiService,
    list_type: StoryListType,
    tz: &TimeZone,
    out: &mut W,
) -> Result<()> {
    let ids = api
        .fetch_story_ids(list_type)
        .with_context(|| format!("error fetching {list_type} stories"))?;
    tracing::info!(count = ids.len(), %list_type, "listing stories");

    for id in ids {
        match api.fetch_item(id) {
            Ok(item) => writeln!(out, "{}", format_story_line(&item, tz))?,
            Err(e) => {
                let e = anyhow::Error::from(e);
                tracing::warn!(id, error = %format!("{e:#}"), "failed to fetch story");
                writeln!(out, "{id}: error fetching ({e:#})")?;
            }
        }
    }
    out.flush()?;
    Ok(())
}
