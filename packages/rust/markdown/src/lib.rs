//! Markdown heading scanning, heading-section extraction, and link rendering.
//!
//! Everything here is pure text processing: no I/O, no hidden state, so the
//! same input always yields the same output.

mod headings;
mod links;

pub use headings::{Heading, headings};
pub use links::{markdown_link, parent_link};

use tracing::trace;

/// Whether a heading's text is introduced by `marker` (case-insensitive).
///
/// An empty marker never matches.
pub fn heading_matches(heading_text: &str, marker: &str) -> bool {
    let marker = marker.trim();
    if marker.is_empty() {
        return false;
    }
    heading_text
        .trim_start()
        .to_lowercase()
        .starts_with(&marker.to_lowercase())
}

/// Whether `md` contains a heading introduced by `marker`.
pub fn has_heading(md: &str, marker: &str) -> bool {
    headings(md).iter().any(|h| heading_matches(&h.text, marker))
}

/// Extract every section introduced by a heading matching `marker`.
///
/// A section runs from its heading line up to (not including) the next
/// heading of the same or a higher level, or the end of the text. Sections
/// nested inside an already extracted section are not repeated. The slices
/// are concatenated in document order; `None` if nothing matches.
///
/// Re-extracting from the result yields the result unchanged.
pub fn extract_sections(md: &str, marker: &str) -> Option<String> {
    let all = headings(md);
    let mut out = String::new();
    let mut covered_until = 0usize;

    for (i, heading) in all.iter().enumerate() {
        if heading.start < covered_until || !heading_matches(&heading.text, marker) {
            continue;
        }

        let end = all[i + 1..]
            .iter()
            .find(|next| next.level <= heading.level)
            .map_or(md.len(), |next| next.start);

        trace!(
            heading = %heading.text,
            level = heading.level,
            start = heading.start,
            end,
            "extracted section"
        );

        out.push_str(&md[heading.start..end]);
        covered_until = end;
    }

    if out.is_empty() { None } else { Some(out) }
}
