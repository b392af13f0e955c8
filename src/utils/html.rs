use once_cell::sync::Lazy;
use owo_colors::{OwoColorize, Style};
use regex::Regex;

static PRE_CODE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<pre>\s*<code>(.*?)</code>\s*</pre>").unwrap());
static ANCHOR_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?is)<a\s[^>]*?href="([^"]*)"[^>]*>.*?</a>"#).unwrap());
static ITALIC_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<i>(.*?)</i>").unwrap());
static CODE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<code>(.*?)</code>").unwrap());
static PARAGRAPH_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)</?p\s*/?>").unwrap());
static TAG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());

/// A block of comment text after markup has been interpreted.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// Inline text, may carry ANSI emphasis; wrapped when rendered.
    Paragraph(String),
    /// Preformatted lines, rendered verbatim.
    Code(String),
}

/// Split an HN comment fragment into paragraphs and code blocks.
///
/// Links become `[href]`, `<i>` and inline `<code>` become terminal
/// emphasis, any other tag is dropped and entities are decoded.
pub fn comment_blocks(html: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut last = 0;

    for caps in PRE_CODE_REGEX.captures_iter(html) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        push_paragraphs(&mut blocks, &html[last..whole.start()]);

        let code = decode(&TAG_REGEX.replace_all(&caps[1], ""));
        let code = code.trim_end_matches('\n');
        if !code.trim().is_empty() {
            blocks.push(Block::Code(code.to_string()));
        }
        last = whole.end();
    }
    push_paragraphs(&mut blocks, &html[last..]);

    blocks
}

/// Render a comment fragment as wrapped text, every line prefixed by `indent`.
///
/// Blocks are separated by an empty line; the result ends with a newline
/// unless the fragment had no text at all.
pub fn render_comment(html: &str, indent: &str, width: usize) -> String {
    let options = textwrap::Options::new(width)
        .initial_indent(indent)
        .subsequent_indent(indent)
        .break_words(false);

    let mut out = String::new();
    for (i, block) in comment_blocks(html).iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        match block {
            Block::Paragraph(text) => {
                out.push_str(&textwrap::fill(text, options.clone()));
                out.push('\n');
            }
            Block::Code(code) => {
                for line in code.lines() {
                    out.push_str(indent);
                    out.push_str(&line.green().to_string());
                    out.push('\n');
                }
            }
        }
    }
    out
}

fn push_paragraphs(blocks: &mut Vec<Block>, fragment: &str) {
    let text = ANCHOR_REGEX.replace_all(fragment, |caps: &regex::Captures| {
        let href: &str = &caps[1];
        format!("[{}]", href.magenta())
    });
    let text = ITALIC_REGEX.replace_all(&text, |caps: &regex::Captures| {
        let inner: &str = &caps[1];
        inner.style(Style::new().bold().cyan()).to_string()
    });
    let text = CODE_REGEX.replace_all(&text, |caps: &regex::Captures| {
        let inner: &str = &caps[1];
        inner.green().to_string()
    });
    let text = PARAGRAPH_REGEX.replace_all(&text, "\n\n");
    let text = TAG_REGEX.replace_all(&text, "");
    let text = decode(&text);

    blocks.extend(
        text.split("\n\n")
            .map(|p| p.split_whitespace().collect::<Vec<_>>().join(" "))
            .filter(|p| !p.is_empty())
            .map(Block::Paragraph),
    );
}

fn decode(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}
