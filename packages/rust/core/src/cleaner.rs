//! Docs tree cleaner.
//!
//! Before a run, any top-level directory of the output root that contains a
//! subdirectory named after a current category is removed entirely.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use docsgen_shared::{DocsgenError, Result};

use crate::registry::SectionRegistry;

/// Remove stale repository directories under `base`. Returns what was removed.
///
/// A missing `base` is not an error; plain files at the top level are left alone.
#[instrument(skip(registry))]
pub fn clear_docs(base: &Path, registry: &SectionRegistry) -> Result<Vec<PathBuf>> {
    if !base.is_dir() {
        debug!("output root does not exist, nothing to clear");
        return Ok(Vec::new());
    }

    let mut repo_dirs = Vec::new();
    for entry in std::fs::read_dir(base).map_err(|e| DocsgenError::io(base, e))? {
        let entry = entry.map_err(|e| DocsgenError::io(base, e))?;
        let path = entry.path();
        if path.is_dir() {
            repo_dirs.push(path);
        }
    }
    repo_dirs.sort();

    let mut removed = Vec::new();
    for repo_dir in repo_dirs {
        let Some(category) = registry.names().find(|name| repo_dir.join(name).is_dir()) else {
            debug!(dir = %repo_dir.display(), "no category subdirectory, keeping");
            continue;
        };

        std::fs::remove_dir_all(&repo_dir).map_err(|e| DocsgenError::io(&repo_dir, e))?;
        info!(dir = %repo_dir.display(), category, "removed stale docs");
        removed.push(repo_dir);
    }

    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        let dir =
            std::env::temp_dir().join(format!("docsgen-cleaner-test-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn removes_whole_repo_dir_with_category() {
        let tmp = temp_dir();
        std::fs::create_dir_all(tmp.join("repoA/tutorials")).unwrap();
        std::fs::create_dir_all(tmp.join("repoA/custom")).unwrap();
        std::fs::write(tmp.join("repoA/custom/keep.md"), "x").unwrap();
        std::fs::create_dir_all(tmp.join("repoB/unrelatedDir")).unwrap();

        let removed = clear_docs(&tmp, &SectionRegistry::default()).unwrap();

        assert_eq!(removed, vec![tmp.join("repoA")]);
        assert!(!tmp.join("repoA").exists());
        assert!(tmp.join("repoB/unrelatedDir").exists());

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn category_named_file_does_not_count() {
        let tmp = temp_dir();
        std::fs::create_dir_all(tmp.join("repoC")).unwrap();
        std::fs::write(tmp.join("repoC/howtos"), "not a dir").unwrap();
        std::fs::write(tmp.join("README.md"), "- [repoC](repoC)\n").unwrap();

        let removed = clear_docs(&tmp, &SectionRegistry::default()).unwrap();

        assert!(removed.is_empty());
        assert!(tmp.join("repoC/howtos").exists());
        assert!(tmp.join("README.md").exists());

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn missing_root_is_fine() {
        let tmp = temp_dir();
        let missing = tmp.join("never-created");
        assert!(clear_docs(&missing, &SectionRegistry::default()).unwrap().is_empty());

        let _ = std::fs::remove_dir_all(&tmp);
    }
}
