//! Repository adapter: a uniform view over one source repository.
//!
//! A [`Repository`] couples an identity (`owner/name@branch`) with a
//! [`ContentSource`] that lists and reads markdown files, and the
//! per-repository [`Overrides`] that bypass classification.

use std::path::{Path, PathBuf};

use tracing::{debug, trace};
use walkdir::WalkDir;

use docsgen_shared::{DocsgenError, RepoConfig, RepoSnapshot, Result};

use crate::matcher::basename;

// ---------------------------------------------------------------------------
// Content sources
// ---------------------------------------------------------------------------

/// Where a repository's files come from.
pub trait ContentSource: Send + Sync {
    /// Repository-relative paths of all markdown files, in a stable order.
    fn markdown_files(&self) -> Result<Vec<String>>;

    /// Full text of a file. [`DocsgenError::NotFound`] if it does not exist.
    fn file_contents(&self, path: &str) -> Result<String>;
}

/// In-memory source backed by a snapshot fetched from the provider.
#[derive(Debug, Clone)]
pub struct SnapshotSource {
    snapshot: RepoSnapshot,
}

impl SnapshotSource {
    pub fn new(snapshot: RepoSnapshot) -> Self {
        Self { snapshot }
    }
}

impl ContentSource for SnapshotSource {
    fn markdown_files(&self) -> Result<Vec<String>> {
        Ok(self.snapshot.files.iter().map(|f| f.path.clone()).collect())
    }

    fn file_contents(&self, path: &str) -> Result<String> {
        self.snapshot
            .get(path)
            .map(str::to_string)
            .ok_or_else(|| DocsgenError::not_found(path))
    }
}

/// A checkout on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalSource {
    root: PathBuf,
}

impl LocalSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ContentSource for LocalSource {
    fn markdown_files(&self) -> Result<Vec<String>> {
        let mut files = Vec::new();

        let walker = WalkDir::new(&self.root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| e.file_name() != ".git");

        for entry in walker {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(self.root.as_path()).to_path_buf();
                DocsgenError::io(path, e.into())
            })?;
            if !entry.file_type().is_file() || !is_markdown(entry.path()) {
                continue;
            }
            if let Ok(rel) = entry.path().strip_prefix(&self.root) {
                let rel: Vec<_> = rel
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect();
                files.push(rel.join("/"));
            }
        }

        files.sort();
        debug!(root = %self.root.display(), count = files.len(), "local markdown files listed");
        Ok(files)
    }

    fn file_contents(&self, path: &str) -> Result<String> {
        let full = self.root.join(path);
        std::fs::read_to_string(&full).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => DocsgenError::not_found(path),
            _ => DocsgenError::io(full, e),
        })
    }
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md"))
}

// ---------------------------------------------------------------------------
// Overrides
// ---------------------------------------------------------------------------

/// What the override lists say about one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverrideAction {
    /// Skip the file; carries the matching ignore entry.
    Ignore(String),
    /// Copy the file verbatim to a custom destination.
    Copy(CopyOverride),
    /// Classify normally.
    None,
}

/// A resolved, not yet consumed, copy entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyOverride {
    index: usize,
    pub selector: String,
    pub destination: String,
}

/// Per-repository ignore and copy lists.
///
/// Copy entries are one-shot: consuming one marks it used and adds the
/// selector's basename to the ignore list, so the same file is not
/// classified again on a later category pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    ignore: Vec<String>,
    copy: Vec<String>,
    consumed: Vec<bool>,
}

impl Overrides {
    pub fn new(ignore: Vec<String>, copy: Vec<String>) -> Self {
        let consumed = vec![false; copy.len()];
        Self {
            ignore,
            copy,
            consumed,
        }
    }

    /// Decide what to do with `path`. Ignore entries are checked first.
    pub fn resolve(&self, path: &str) -> OverrideAction {
        trace!(path, ignore = ?self.ignore, copy = ?self.copy, "resolving overrides");

        if let Some(entry) = self
            .ignore
            .iter()
            .find(|entry| selector_matches(selector_of(entry), path))
        {
            return OverrideAction::Ignore(entry.clone());
        }

        let copy = self
            .copy
            .iter()
            .enumerate()
            .filter(|(i, _)| !self.consumed[*i])
            .find(|(_, entry)| selector_matches(selector_of(entry), path));

        match copy {
            Some((index, entry)) => {
                let (selector, destination) = entry.rsplit_once('/').unwrap_or((entry.as_str(), ""));
                OverrideAction::Copy(CopyOverride {
                    index,
                    selector: selector.to_string(),
                    destination: destination.to_string(),
                })
            }
            None => OverrideAction::None,
        }
    }

    /// Mark a copy entry as applied and ignore its source from now on.
    pub fn consume_copy(&mut self, copy: &CopyOverride) {
        if let Some(flag) = self.consumed.get_mut(copy.index) {
            *flag = true;
        }
        self.ignore.push(basename(&copy.selector).to_string());
    }

    pub fn ignored(&self) -> &[String] {
        &self.ignore
    }

    /// Copy entries not yet applied.
    pub fn remaining_copies(&self) -> impl Iterator<Item = &str> {
        self.copy
            .iter()
            .zip(&self.consumed)
            .filter(|(_, used)| !**used)
            .map(|(entry, _)| entry.as_str())
    }
}

impl From<&RepoConfig> for Overrides {
    fn from(config: &RepoConfig) -> Self {
        Self::new(config.files_to_ignore.clone(), config.files_to_copy.clone())
    }
}

/// Selector part of an override entry: everything before the last `/`,
/// or the whole entry if it has none.
pub fn selector_of(entry: &str) -> &str {
    entry.rsplit_once('/').map_or(entry, |(selector, _)| selector)
}

/// Whether `selector` occurs in `path` as a run of whole path segments.
///
/// `docs/api` matches `docs/api/x.md` and `src/docs/api/y.md` but not
/// `docs/api-v2/x.md`. An empty selector matches nothing.
pub fn selector_matches(selector: &str, path: &str) -> bool {
    let wanted: Vec<&str> = selector.split('/').filter(|s| !s.is_empty()).collect();
    if wanted.is_empty() {
        return false;
    }
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    segments.windows(wanted.len()).any(|w| w == wanted.as_slice())
}

// ---------------------------------------------------------------------------
// Repository
// ---------------------------------------------------------------------------

/// One source repository, as seen by the assembler.
pub struct Repository {
    pub owner: String,
    pub name: String,
    pub branch: String,
    pub overrides: Overrides,
    source: Box<dyn ContentSource>,
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("owner", &self.owner)
            .field("name", &self.name)
            .field("branch", &self.branch)
            .field("overrides", &self.overrides)
            .finish_non_exhaustive()
    }
}

impl Repository {
    pub fn new(
        owner: impl Into<String>,
        name: impl Into<String>,
        branch: impl Into<String>,
        overrides: Overrides,
        source: impl ContentSource + 'static,
    ) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            branch: branch.into(),
            overrides,
            source: Box::new(source),
        }
    }

    /// Wrap a snapshot fetched from the provider.
    pub fn from_snapshot(snapshot: RepoSnapshot, overrides: Overrides) -> Self {
        Self::new(
            snapshot.owner.clone(),
            snapshot.name.clone(),
            snapshot.branch.clone(),
            overrides,
            SnapshotSource::new(snapshot),
        )
    }

    /// `owner/name@branch`
    pub fn full_name(&self) -> String {
        format!("{}/{}@{}", self.owner, self.name, self.branch)
    }

    pub fn all_markdown_files(&self) -> Result<Vec<String>> {
        self.source.markdown_files()
    }

    /// Content of a file that must exist.
    pub fn file_contents(&self, path: &str) -> Result<String> {
        self.source.file_contents(path)
    }

    /// Content of a file that may be absent; missing reads as empty.
    pub fn optional_file_contents(&self, path: &str) -> Result<String> {
        match self.source.file_contents(path) {
            Err(e) if e.is_not_found() => {
                debug!(repo = %self.name, path, "optional file missing, using empty content");
                Ok(String::new())
            }
            other => other,
        }
    }
}
