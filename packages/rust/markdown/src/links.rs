//! Markdown list-item links used by navigation blocks and index files.

/// Render `- [name](target)` with spaces in the target percent-encoded.
pub fn markdown_link(name: &str, target: &str) -> String {
    format!("- [{name}]({})\n", target.replace(' ', "%20"))
}

/// Link to the enclosing directory.
pub fn parent_link() -> String {
    markdown_link("../", "../")
}
