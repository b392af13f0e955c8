use std::collections::HashSet;
use std::io::{self, Write};

use owo_colors::OwoColorize;

use crate::api::ApiService;
use crate::internal::models::Item;
use crate::utils::html::render_comment;

/// One indentation unit per reply level.
const INDENT_UNIT: &str = "\t";

/// Comment still waiting to be fetched and printed.
struct Pending {
    id: u64,
    depth: usize,
}

/// Renders a story and its whole comment tree as indented terminal text.
///
/// Children are fetched lazily, one request per uncached comment, and
/// printed depth first in `kids` order. A comment that fails to load is
/// replaced by a single error line; its siblings are still printed. Each id
/// is printed at most once per render, so a malformed reply graph cannot
/// loop forever.
pub struct ThreadRenderer<'a> {
    api: &'a ApiService,
    wrap_width: usize,
}

impl<'a> ThreadRenderer<'a> {
    pub fn new(api: &'a ApiService, wrap_width: usize) -> Self {
        Self { api, wrap_width }
    }

    pub fn render<W: Write>(&self, root: &Item, out: &mut W) -> io::Result<()> {
        writeln!(out, "{}\n", root.title.yellow())?;
        if !root.text.is_empty() {
            writeln!(out, "{}", render_comment(&root.text, "", self.wrap_width))?;
        }

        let mut visited = HashSet::from([root.id]);
        let mut stack = Vec::new();
        push_children(&mut stack, &root.kids, 0);

        while let Some(Pending { id, depth }) = stack.pop() {
            if !visited.insert(id) {
                tracing::warn!(id, parent = root.id, "item reached twice, skipping");
                continue;
            }
            let indent = INDENT_UNIT.repeat(depth);

            let item = match self.api.fetch_item(id) {
                Ok(item) => item,
                Err(e) => {
                    let e = anyhow::Error::from(e);
                    tracing::warn!(id, error = %format!("{e:#}"), "failed to fetch comment");
                    writeln!(out, "{indent}{}", format!("{e:#}").red())?;
                    continue;
                }
            };

            writeln!(out, "{indent}{}", format!("[{}]", item.author_label()).yellow())?;
            let body = render_comment(&item.text, &indent, self.wrap_width);
            if !body.is_empty() {
                writeln!(out, "{body}")?;
            }
            push_children(&mut stack, &item.kids, depth + 1);
        }

        out.flush()
    }
}

/// Queue `kids` so that popping yields them in display order.
fn push_children(stack: &mut Vec<Pending>, kids: &[u64], depth: usize) {
    stack.extend(kids.iter().rev().map(|&id| Pending { id, depth }));
}
