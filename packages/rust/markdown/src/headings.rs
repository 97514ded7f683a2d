//! ATX heading scanner.
//!
//! Walks the text line by line, skipping fenced code blocks, and reports
//! every `#`-style heading with its byte span.

use std::sync::LazyLock;

use regex::Regex;

/// A heading found in a Markdown document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// 1 for `#`, up to 6 for `######`.
    pub level: u8,
    /// Heading text with the closing `#` sequence removed.
    pub text: String,
    /// Byte offset of the first character of the heading line.
    pub start: usize,
    /// Byte offset just past the heading line (including its newline).
    pub end: usize,
}

/// Matches an ATX heading line: up to 3 spaces of indent, 1–6 `#`, then text.
static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^ {0,3}(#{1,6})(?:[ \t]+(.*?))?[ \t]*$").expect("heading regex")
});

/// Matches a fence line: the marker run, then an optional info string.
static FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ {0,3}(`{3,}|~{3,})(.*)$").expect("fence regex"));

/// Scan `md` for headings outside fenced code blocks.
pub fn headings(md: &str) -> Vec<Heading> {
    let mut found = Vec::new();
    let mut fence: Option<String> = None;
    let mut offset = 0usize;

    for raw_line in md.split_inclusive('\n') {
        let start = offset;
        offset += raw_line.len();
        let line = raw_line.trim_end_matches(['\n', '\r']);

        if let Some(caps) = FENCE_RE.captures(line) {
            let marker = &caps[1];
            let closes_fence = |open: &str| marker.starts_with(open) && caps[2].trim().is_empty();
            match &fence {
                None => fence = Some(marker.to_string()),
                // A closing fence carries no info string.
                Some(open) if closes_fence(open) => fence = None,
                Some(_) => {}
            }
            continue;
        }

        if fence.is_some() {
            continue;
        }

        if let Some(caps) = HEADING_RE.captures(line) {
            let text = caps.get(2).map_or("", |m| m.as_str());
            found.push(Heading {
                level: caps[1].len() as u8,
                text: strip_closing_sequence(text).to_string(),
                start,
                end: offset,
            });
        }
    }

    found
}

/// Drop an optional closing run of `#` (it must be preceded by a space).
fn strip_closing_sequence(text: &str) -> &str {
    let trimmed = text.trim_end_matches('#');
    if trimmed.len() == text.len() {
        return text;
    }
    if trimmed.is_empty() {
        return "";
    }
    if trimmed.ends_with([' ', '\t']) {
        trimmed.trim_end()
    } else {
        text
    }
}
