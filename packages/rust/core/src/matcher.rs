//! Per-file category matching and content extraction.

use docsgen_markdown::{extract_sections, has_heading};
use docsgen_shared::CategoryDef;

/// Whether `path`'s basename contains one of the category's filename patterns.
///
/// Matching is a case-sensitive substring test; directories never count.
pub fn found_in_filename(category: &CategoryDef, path: &str) -> bool {
    let name = basename(path);
    category
        .filename_patterns
        .iter()
        .any(|pattern| !pattern.is_empty() && name.contains(pattern.as_str()))
}

/// Whether `content` has a heading introduced by the category's marker.
pub fn found_in_content(category: &CategoryDef, content: &str) -> bool {
    has_heading(content, &category.marker)
}

/// The part of `content` that belongs to `category`.
///
/// Every section headed by the marker, concatenated. Content without a
/// marker heading is returned whole.
pub fn output(category: &CategoryDef, content: &str) -> String {
    extract_sections(content, &category.marker).unwrap_or_else(|| content.to_string())
}

/// Outcome of matching one file against one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    pub by_filename: bool,
    pub by_content: bool,
    /// Extracted slice; only computed for content-only matches.
    pub extracted: Option<String>,
}

impl MatchResult {
    pub fn evaluate(category: &CategoryDef, path: &str, content: &str) -> Self {
        let by_filename = found_in_filename(category, path);
        let by_content = found_in_content(category, content);
        let extracted = (by_content && !by_filename).then(|| output(category, content));

        Self {
            by_filename,
            by_content,
            extracted,
        }
    }

    pub fn matched(&self) -> bool {
        self.by_filename || self.by_content
    }

    /// What to write for this file: the raw file on a filename match,
    /// otherwise the extracted slice. `None` if nothing matched.
    pub fn content_to_write<'a>(&'a self, raw: &'a str) -> Option<&'a str> {
        if self.by_filename {
            Some(raw)
        } else {
            self.extracted.as_deref()
        }
    }

    /// Short label for logs.
    pub fn location(&self) -> &'static str {
        if self.by_filename { "filename" } else { "content" }
    }
}

/// Last `/`-separated component of a repository path.
pub(crate) fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SectionRegistry;

    fn category(name: &str) -> CategoryDef {
        SectionRegistry::default().get(name).cloned().unwrap()
    }

    #[test]
    fn filename_match_uses_basename_only() {
        let tutorials = category("tutorials");
        assert!(found_in_filename(&tutorials, "docs/tutorial-intro.md"));
        assert!(found_in_filename(&tutorials, "TUTORIAL.md"));
        assert!(!found_in_filename(&tutorials, "tutorial/intro.md"));
        assert!(!found_in_filename(&tutorials, "docs/Tutorial.md"));
    }

    #[test]
    fn content_match_needs_heading() {
        let howtos = category("howtos");
        assert!(found_in_content(&howtos, "# X\n\n## How To Deploy\n\nsteps\n"));
        assert!(!found_in_content(&howtos, "Read how to deploy below.\n"));
        assert!(!found_in_content(&howtos, "```\n## How To Deploy\n```\n"));
    }

    #[test]
    fn output_without_marker_is_whole_content() {
        let custom = CategoryDef::named("architecture");
        assert_eq!(output(&custom, "# Arch\n\ntext\n"), "# Arch\n\ntext\n");
    }

    #[test]
    fn output_is_idempotent() {
        let howtos = category("howtos");
        let text = "# Demo\n\n## How To Deploy\n\nsteps\n\n## License\n\nMIT\n";
        let once = output(&howtos, text);
        assert_eq!(once, "## How To Deploy\n\nsteps\n\n");
        assert_eq!(output(&howtos, &once), once);
    }

    #[test]
    fn filename_wins_over_content() {
        let tutorials = category("tutorials");
        let raw = "# Intro\n\n## Tutorial Part 1\n\nfoo\n\n## Other\n";
        let result = MatchResult::evaluate(&tutorials, "docs/tutorial-intro.md", raw);

        assert!(result.by_filename);
        assert!(result.by_content);
        assert!(result.extracted.is_none());
        assert_eq!(result.content_to_write(raw), Some(raw));
        assert_eq!(result.location(), "filename");
    }

    #[test]
    fn content_only_match_writes_extracted_slice() {
        let howtos = category("howtos");
        let raw = "# Demo\n\n## How To Deploy\n\nsteps\n";
        let result = MatchResult::evaluate(&howtos, "README.md", raw);

        assert!(result.matched());
        assert_eq!(result.content_to_write(raw), Some("## How To Deploy\n\nsteps\n"));
    }

    #[test]
    fn unmatched_file_writes_nothing() {
        let references = category("references");
        let result = MatchResult::evaluate(&references, "docs/guide.md", "# Guide\n");
        assert!(!result.matched());
        assert_eq!(result.content_to_write("# Guide\n"), None);
    }
}
