//! Core domain types shared between the provider, the pipeline, and the CLI.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// CategoryDef
// ---------------------------------------------------------------------------

/// Definition of one documentation category (tutorial, how-to, ...).
///
/// `name` is the stable key: it names the output subdirectory and is the
/// token the cleaner looks for when detecting stale output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDef {
    /// Stable identifier, also the output subdirectory name.
    pub name: String,
    /// Display label (status table column header).
    pub header_text: String,
    /// Heading text that marks a section of this category inside a file.
    pub marker: String,
    /// Case-sensitive substrings matched against a file's basename.
    #[serde(default)]
    pub filename_patterns: Vec<String>,
}

impl CategoryDef {
    /// A lightweight reference to a category known only by name.
    ///
    /// Used for custom copy destinations, which share the output layout of
    /// real categories but never match anything.
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            header_text: name.clone(),
            name,
            marker: String::new(),
            filename_patterns: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// RemoteRepo
// ---------------------------------------------------------------------------

/// Repository listing metadata as returned by the hosting API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRepo {
    /// Repository name (without owner).
    pub name: String,
    /// Branch checked out by default.
    pub default_branch: String,
}

// ---------------------------------------------------------------------------
// RepoSnapshot
// ---------------------------------------------------------------------------

/// A single markdown file captured from a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotFile {
    /// Repository-relative path with `/` separators.
    pub path: String,
    /// Full UTF-8 text of the file.
    pub content: String,
}

/// Eagerly fetched markdown content of one repository at one branch.
#[derive(Debug, Clone, Default)]
pub struct RepoSnapshot {
    pub owner: String,
    pub name: String,
    pub branch: String,
    /// Markdown files in stable listing order.
    pub files: Vec<SnapshotFile>,
}

impl RepoSnapshot {
    /// Look up a file's content by its repository-relative path.
    pub fn get(&self, path: &str) -> Option<&str> {
        self.files
            .iter()
            .find(|f| f.path == path)
            .map(|f| f.content.as_str())
    }
}
