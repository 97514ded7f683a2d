//! Docs assembler: classify one repository's files into the output tree.
//!
//! For every category (registry order) and every markdown file (listing
//! order) the assembler:
//!
//! 1. matches the file by filename and by content, and ORs the result into
//!    the repository's found flag for the category;
//! 2. applies ignore / copy overrides, which bypass classification;
//! 3. appends the raw file (filename match) or the extracted sections
//!    (content match) to `<base>/<repo>/<category>/<basename>`.

use std::path::PathBuf;

use tracing::{debug, info, instrument};

use docsgen_shared::{CategoryDef, Result};

use crate::matcher::{MatchResult, basename};
use crate::output::{OutputTree, WriteMode};
use crate::registry::SectionRegistry;
use crate::repository::{OverrideAction, Repository};

/// Optional per-repository readme, read as empty when missing.
const README: &str = "README.md";

/// What happened while assembling one repository.
#[derive(Debug, Clone, Default)]
pub struct RepoReport {
    pub owner: String,
    pub name: String,
    pub branch: String,
    /// `(category name, found)` in registry order.
    pub found: Vec<(String, bool)>,
    /// Output files written by classification, without duplicates.
    pub created_files: Vec<PathBuf>,
    /// Output files written by copy overrides.
    pub copied_files: Vec<PathBuf>,
    /// Whether the repository has a non-empty README.
    pub has_readme: bool,
}

impl RepoReport {
    /// Whether `category` was found in any file of the repository.
    pub fn found(&self, category: &str) -> bool {
        self.found
            .iter()
            .any(|(name, found)| name == category && *found)
    }
}

/// A listed markdown file with its content.
struct SourceFile {
    path: String,
    content: String,
}

/// Run the per-repository algorithm and write matches into `out`.
///
/// A listed file that cannot be read aborts the repository.
#[instrument(skip_all, fields(repo = %repo.full_name()))]
pub fn assemble_repo(
    repo: &mut Repository,
    registry: &SectionRegistry,
    out: &mut OutputTree,
) -> Result<RepoReport> {
    info!("parsing repository");

    let readme = repo.optional_file_contents(README)?;

    let files = repo
        .all_markdown_files()?
        .into_iter()
        .map(|path| {
            let content = repo.file_contents(&path)?;
            Ok(SourceFile { path, content })
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(files = files.len(), "markdown files loaded");

    let mut report = RepoReport {
        owner: repo.owner.clone(),
        name: repo.name.clone(),
        branch: repo.branch.clone(),
        has_readme: !readme.is_empty(),
        ..RepoReport::default()
    };

    for category in registry {
        let found = assemble_category(repo, category, &files, out, &mut report)?;
        report.found.push((category.name.clone(), found));
    }

    info!(
        created = report.created_files.len(),
        copied = report.copied_files.len(),
        "parsed repository"
    );

    Ok(report)
}

#[instrument(skip_all, fields(category = %category.name))]
fn assemble_category(
    repo: &mut Repository,
    category: &CategoryDef,
    files: &[SourceFile],
    out: &mut OutputTree,
    report: &mut RepoReport,
) -> Result<bool> {
    let mut found = false;

    for file in files {
        let result = MatchResult::evaluate(category, &file.path, &file.content);
        found |= result.matched();

        let filename = basename(&file.path);

        match repo.overrides.resolve(&file.path) {
            OverrideAction::Ignore(entry) => {
                debug!(path = %file.path, entry = %entry, "ignoring");
                continue;
            }
            OverrideAction::Copy(copy) => {
                let dest = CategoryDef::named(copy.destination.as_str());
                let written =
                    out.write(&repo.name, &dest, filename, &file.content, WriteMode::Append)?;
                repo.overrides.consume_copy(&copy);
                info!(path = %file.path, dest = %copy.destination, "copied verbatim");
                report.copied_files.push(written);
                continue;
            }
            OverrideAction::None => {}
        }

        let Some(content) = result.content_to_write(&file.content) else {
            debug!(path = %file.path, "no match");
            continue;
        };

        let written = out.write(&repo.name, category, filename, content, WriteMode::Append)?;
        info!(
            path = %file.path,
            from = result.location(),
            output = %written.display(),
            "added section"
        );

        if !report.created_files.contains(&written) {
            report.created_files.push(written);
        }
    }

    debug!(found, "finished category");
    Ok(found)
}
