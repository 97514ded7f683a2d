//! Output tree writer.
//!
//! Layout: `<base>/<repo>/<category or custom destination>/<filename>`.
//! Directories are created on demand.

use std::collections::HashSet;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use docsgen_shared::{CategoryDef, DocsgenError, Result};

/// How a write treats an existing file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Accumulate. The first append to a path in a run starts the file fresh.
    Append,
    /// Overwrite the file.
    Replace,
    /// Put the new content in front of what is already there.
    Prepend,
}

/// Writer for one run's output tree.
///
/// Tracks which files were written during this run, so accumulating writes
/// never pick up content left behind by a previous invocation.
#[derive(Debug)]
pub struct OutputTree {
    base: PathBuf,
    written: HashSet<PathBuf>,
}

impl OutputTree {
    /// Create a writer rooted at `base` (made absolute, not created yet).
    pub fn new(base: impl AsRef<Path>) -> Result<Self> {
        let base = base.as_ref();
        let base = std::path::absolute(base).map_err(|e| DocsgenError::io(base, e))?;
        Ok(Self {
            base,
            written: HashSet::new(),
        })
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// `<base>/<repo>`
    pub fn repo_dir(&self, repo: &str) -> PathBuf {
        self.base.join(repo)
    }

    /// Write `content` to `<base>/<repo>/<dir.name>/<filename>`.
    ///
    /// Returns the absolute path written.
    pub fn write(
        &mut self,
        repo: &str,
        dir: &CategoryDef,
        filename: &str,
        content: &str,
        mode: WriteMode,
    ) -> Result<PathBuf> {
        for part in [dir.name.as_str(), filename] {
            if !is_plain_component(part) {
                return Err(DocsgenError::validation(format!(
                    "output path component '{part}' would leave {}",
                    self.repo_dir(repo).display()
                )));
            }
        }

        let dir_path = self.repo_dir(repo).join(&dir.name);
        std::fs::create_dir_all(&dir_path).map_err(|e| DocsgenError::io(&dir_path, e))?;

        let path = dir_path.join(filename);
        self.write_at(&path, content, mode)?;
        Ok(path)
    }

    /// Overwrite the file at `path`, creating parent directories.
    pub fn replace(&mut self, path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| DocsgenError::io(parent, e))?;
        }
        self.write_at(path, content, WriteMode::Replace)
    }

    /// Put `content` in front of the current text of `path`.
    pub fn prepend_to(&mut self, path: &Path, content: &str) -> Result<()> {
        self.write_at(path, content, WriteMode::Prepend)
    }

    fn write_at(&mut self, path: &Path, content: &str, mode: WriteMode) -> Result<()> {
        let fresh = self.written.insert(path.to_path_buf());

        match mode {
            WriteMode::Append if !fresh => {
                trace!(path = %path.display(), bytes = content.len(), "appending");
                let mut file = std::fs::OpenOptions::new()
                    .read(true)
                    .append(true)
                    .open(path)
                    .map_err(|e| DocsgenError::io(path, e))?;
                if !ends_with_newline(&mut file).map_err(|e| DocsgenError::io(path, e))? {
                    file.write_all(b"\n")
                        .map_err(|e| DocsgenError::io(path, e))?;
                }
                file.write_all(content.as_bytes())
                    .map_err(|e| DocsgenError::io(path, e))?;
            }
            WriteMode::Append | WriteMode::Replace => {
                debug!(path = %path.display(), bytes = content.len(), "writing");
                std::fs::write(path, content).map_err(|e| DocsgenError::io(path, e))?;
            }
            WriteMode::Prepend => {
                let existing = match std::fs::read_to_string(path) {
                    Ok(text) => text,
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
                    Err(e) => return Err(DocsgenError::io(path, e)),
                };
                std::fs::write(path, format!("{content}{existing}"))
                    .map_err(|e| DocsgenError::io(path, e))?;
            }
        }

        Ok(())
    }
}

/// A single normal path component: not empty, `.`, `..`, or nested.
fn is_plain_component(part: &str) -> bool {
    let mut components = Path::new(part).components();
    matches!(
        (components.next(), components.next()),
        (Some(std::path::Component::Normal(_)), None)
    )
}

/// Whether the last byte of `file` is `\n`. Empty files count as terminated.
fn ends_with_newline(file: &mut std::fs::File) -> std::io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(true);
    }
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("docsgen-output-test-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn read(path: &Path) -> String {
        std::fs::read_to_string(path).unwrap()
    }

    #[test]
    fn write_creates_layout() {
        let tmp = temp_dir();
        let mut tree = OutputTree::new(&tmp).unwrap();

        let path = tree
            .write("demo", &CategoryDef::named("tutorials"), "intro.md", "hi\n", WriteMode::Append)
            .unwrap();

        assert!(path.is_absolute());
        assert_eq!(path, tmp.join("demo/tutorials/intro.md"));
        assert_eq!(read(&path), "hi\n");

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn append_accumulates_within_a_run() {
        let tmp = temp_dir();
        let mut tree = OutputTree::new(&tmp).unwrap();
        let cat = CategoryDef::named("howtos");

        tree.write("demo", &cat, "README.md", "one\n", WriteMode::Append).unwrap();
        let path = tree
            .write("demo", &cat, "README.md", "two\n", WriteMode::Append)
            .unwrap();

        assert_eq!(read(&path), "one\ntwo\n");

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn new_run_starts_appended_files_fresh() {
        let tmp = temp_dir();
        let cat = CategoryDef::named("howtos");

        let mut first = OutputTree::new(&tmp).unwrap();
        first.write("demo", &cat, "README.md", "old\n", WriteMode::Append).unwrap();

        let mut second = OutputTree::new(&tmp).unwrap();
        let path = second
            .write("demo", &cat, "README.md", "new\n", WriteMode::Append)
            .unwrap();

        assert_eq!(read(&path), "new\n");

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn replace_and_prepend() {
        let tmp = temp_dir();
        let mut tree = OutputTree::new(&tmp).unwrap();
        let cat = CategoryDef::named("references");

        tree.write("demo", &cat, "api.md", "body\n", WriteMode::Append).unwrap();
        let path = tree
            .write("demo", &cat, "api.md", "header\n", WriteMode::Prepend)
            .unwrap();
        assert_eq!(read(&path), "header\nbody\n");

        tree.write("demo", &cat, "api.md", "only\n", WriteMode::Replace).unwrap();
        assert_eq!(read(&path), "only\n");

        tree.prepend_to(&path, "- [../](../)\n").unwrap();
        assert_eq!(read(&path), "- [../](../)\nonly\n");

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn prepend_to_missing_file_creates_it() {
        let tmp = temp_dir();
        let mut tree = OutputTree::new(&tmp).unwrap();
        let path = tmp.join("new.md");
        tree.prepend_to(&path, "x\n").unwrap();
        assert_eq!(read(&path), "x\n");

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn append_starts_on_a_new_line() {
        let tmp = temp_dir();
        let mut tree = OutputTree::new(&tmp).unwrap();
        let cat = CategoryDef::named("howtos");

        tree.write("demo", &cat, "README.md", "one", WriteMode::Append).unwrap();
        let path = tree
            .write("demo", &cat, "README.md", "two\n", WriteMode::Append)
            .unwrap();

        assert_eq!(read(&path), "one\ntwo\n");

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn write_refuses_to_leave_repo_dir() {
        let tmp = temp_dir();
        let mut tree = OutputTree::new(&tmp).unwrap();

        for dest in ["..", ".", "", "a/b"] {
            let err = tree
                .write("demo", &CategoryDef::named(dest), "x.md", "x", WriteMode::Append)
                .unwrap_err();
            assert!(matches!(err, DocsgenError::Validation { .. }), "{dest}");
        }
        let err = tree
            .write("demo", &CategoryDef::named("ok"), "../x.md", "x", WriteMode::Append)
            .unwrap_err();
        assert!(matches!(err, DocsgenError::Validation { .. }));
        assert!(!tmp.join("x.md").exists());

        let _ = std::fs::remove_dir_all(&tmp);
    }
}
