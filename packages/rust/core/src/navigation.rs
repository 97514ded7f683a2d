//! Navigation generator.
//!
//! Two kinds of navigation are produced after a repository is assembled:
//!
//! - every created file gets a header linking to its siblings (and
//!   optionally to `../`), followed by a blank line and its original text;
//! - index files list every entry found a fixed number of levels below a
//!   directory.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};
use walkdir::WalkDir;

use docsgen_markdown::{markdown_link, parent_link};
use docsgen_shared::{DocsgenError, Result};

use crate::output::OutputTree;

/// Build the navigation header for one file.
pub fn nav_header(siblings: &[String], include_parent: bool) -> String {
    let mut header = String::new();
    if include_parent {
        header.push_str(&parent_link());
    }
    for name in siblings {
        header.push_str(&markdown_link(name, name));
    }
    header.push('\n');
    header
}

/// Inject sibling navigation into each of `files`.
#[instrument(skip_all, fields(files = files.len()))]
pub fn add_nav_to_files(
    out: &mut OutputTree,
    files: &[PathBuf],
    include_parent: bool,
) -> Result<()> {
    for file in files {
        add_nav_to_file(out, file, include_parent)?;
    }
    Ok(())
}

/// Prepend a navigation header listing the other entries of `file`'s directory.
pub fn add_nav_to_file(out: &mut OutputTree, file: &Path, include_parent: bool) -> Result<()> {
    let siblings = match (file.parent(), file.file_name()) {
        (Some(dir), Some(own)) => entries_at_depth(dir, 1)?
            .into_iter()
            .filter(|name| std::ffi::OsStr::new(name) != own)
            .collect(),
        _ => Vec::new(),
    };

    debug!(file = %file.display(), siblings = siblings.len(), "adding navigation");
    out.prepend_to(file, &nav_header(&siblings, include_parent))
}

/// Write `<dir>/<index_file>` linking every entry `depth` levels below `dir`.
///
/// The index never lists itself.
#[instrument(skip(out))]
pub fn write_index(
    out: &mut OutputTree,
    dir: &Path,
    depth: usize,
    include_parent: bool,
    index_file: &str,
) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| DocsgenError::io(dir, e))?;

    let mut content = String::new();
    if include_parent {
        content.push_str(&parent_link());
    }
    for rel in entries_at_depth(dir, depth.max(1))? {
        if rel == index_file {
            continue;
        }
        content.push_str(&markdown_link(&rel, &rel));
    }

    let path = dir.join(index_file);
    out.replace(&path, &content)?;
    debug!(path = %path.display(), "index written");
    Ok(path)
}

/// Relative `/`-joined paths of the non-hidden entries exactly `depth`
/// levels below `dir`, sorted.
fn entries_at_depth(dir: &Path, depth: usize) -> Result<Vec<String>> {
    let walker = WalkDir::new(dir)
        .min_depth(depth)
        .max_depth(depth)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'));

    let mut entries = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| DocsgenError::io(dir, e.into()))?;
        if let Ok(rel) = entry.path().strip_prefix(dir) {
            let rel: Vec<_> = rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            entries.push(rel.join("/"));
        }
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use docsgen_shared::CategoryDef;

    use crate::output::WriteMode;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("docsgen-nav-test-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn read(path: &Path) -> String {
        std::fs::read_to_string(path).unwrap()
    }

    #[test]
    fn header_shape() {
        let siblings = vec!["b.md".to_string(), "My Guide.md".to_string()];
        assert_eq!(
            nav_header(&siblings, true),
            "- [../](../)\n- [b.md](b.md)\n- [My Guide.md](My%20Guide.md)\n\n"
        );
        assert_eq!(nav_header(&[], false), "\n");
    }

    #[test]
    fn three_siblings_link_to_each_other() {
        let tmp = temp_dir();
        let mut out = OutputTree::new(&tmp).unwrap();
        let cat = CategoryDef::named("tutorials");

        let files: Vec<PathBuf> = ["a.md", "b.md", "c.md"]
            .iter()
            .map(|name| {
                out.write("demo", &cat, name, &format!("# {name}\n"), WriteMode::Append)
                    .unwrap()
            })
            .collect();

        add_nav_to_files(&mut out, &files, true).unwrap();

        assert_eq!(
            read(&files[0]),
            "- [../](../)\n- [b.md](b.md)\n- [c.md](c.md)\n\n# a.md\n"
        );
        assert_eq!(
            read(&files[1]),
            "- [../](../)\n- [a.md](a.md)\n- [c.md](c.md)\n\n# b.md\n"
        );
        assert_eq!(
            read(&files[2]),
            "- [../](../)\n- [a.md](a.md)\n- [b.md](b.md)\n\n# c.md\n"
        );

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn nav_without_parent_link() {
        let tmp = temp_dir();
        let mut out = OutputTree::new(&tmp).unwrap();
        let cat = CategoryDef::named("howtos");

        let only = out
            .write("demo", &cat, "README.md", "body\n", WriteMode::Append)
            .unwrap();
        add_nav_to_file(&mut out, &only, false).unwrap();

        assert_eq!(read(&only), "\nbody\n");

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn repo_index_lists_category_dirs() {
        let tmp = temp_dir();
        let mut out = OutputTree::new(&tmp).unwrap();
        out.write("demo", &CategoryDef::named("tutorials"), "a.md", "a", WriteMode::Append)
            .unwrap();
        out.write("demo", &CategoryDef::named("howtos"), "b.md", "b", WriteMode::Append)
            .unwrap();

        let repo_dir = out.repo_dir("demo");
        let index = write_index(&mut out, &repo_dir, 1, true, "README.md").unwrap();
        assert_eq!(
            read(&index),
            "- [../](../)\n- [howtos](howtos)\n- [tutorials](tutorials)\n"
        );

        // Regenerating does not list the index itself.
        write_index(&mut out, &repo_dir, 1, true, "README.md").unwrap();
        assert!(!read(&index).contains("[README.md]"));

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn deeper_index_lists_nested_paths() {
        let tmp = temp_dir();
        let mut out = OutputTree::new(&tmp).unwrap();
        out.write("demo", &CategoryDef::named("tutorials"), "My Intro.md", "a", WriteMode::Append)
            .unwrap();

        let base = out.base().to_path_buf();
        let index = write_index(&mut out, &base, 3, false, "README.md").unwrap();
        assert_eq!(
            read(&index),
            "- [demo/tutorials/My Intro.md](demo/tutorials/My%20Intro.md)\n"
        );

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn root_index_on_empty_tree() {
        let tmp = temp_dir().join("missing");
        let mut out = OutputTree::new(&tmp).unwrap();
        let base = out.base().to_path_buf();

        let index = write_index(&mut out, &base, 1, false, "README.md").unwrap();
        assert_eq!(read(&index), "");

        let _ = std::fs::remove_dir_all(tmp.parent().unwrap());
    }
}
