//! End-to-end `build` pipeline: clean → assemble each repository → navigation → root index.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{info, instrument};

use docsgen_shared::{AppConfig, Result};

use crate::assembler::{RepoReport, assemble_repo};
use crate::cleaner::clear_docs;
use crate::navigation::{add_nav_to_files, write_index};
use crate::output::OutputTree;
use crate::registry::SectionRegistry;
use crate::repository::Repository;

/// Configuration for one `build` run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Output base directory.
    pub output_dir: PathBuf,
    /// Categories, in processing order.
    pub registry: SectionRegistry,
    /// Inject sibling navigation and write per-repository index files.
    pub nav: bool,
    /// `../` links in generated files and repository indexes.
    pub parent_links: bool,
    /// Levels listed by index files.
    pub index_depth: usize,
    /// File name of generated index files.
    pub index_file: String,
}

impl RunConfig {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            output_dir: config.output.dir.clone(),
            registry: SectionRegistry::new(config.categories.clone()),
            nav: config.output.nav,
            parent_links: config.output.parent_links,
            index_depth: config.output.index_depth,
            index_file: config.output.index_file.clone(),
        }
    }
}

/// Result of a `build` run.
#[derive(Debug)]
pub struct RunReport {
    /// One entry per processed repository, in processing order.
    pub repos: Vec<RepoReport>,
    /// Stale directories removed by the cleaner.
    pub removed: Vec<PathBuf>,
    /// Path of the root index file.
    pub root_index: PathBuf,
    pub elapsed: Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called before a repository is assembled.
    fn repo_started(&self, full_name: &str, current: usize, total: usize);
    /// Called after a repository is assembled.
    fn repo_finished(&self, report: &RepoReport);
    /// Called when the pipeline completes.
    fn done(&self, report: &RunReport);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn repo_started(&self, _full_name: &str, _current: usize, _total: usize) {}
    fn repo_finished(&self, _report: &RepoReport) {}
    fn done(&self, _report: &RunReport) {}
}

/// Run the full `build` pipeline.
///
/// 1. Clean stale repository directories
/// 2. Assemble each repository, strictly in order
/// 3. Inject navigation and write the repository index (if enabled and
///    anything was created)
/// 4. Write the root index
///
/// Repository overrides are consumed in place.
#[instrument(skip_all, fields(repos = repos.len(), out = %config.output_dir.display()))]
pub fn run(
    config: &RunConfig,
    repos: &mut [Repository],
    progress: &dyn ProgressReporter,
) -> Result<RunReport> {
    let start = Instant::now();
    let mut out = OutputTree::new(&config.output_dir)?;

    info!(base = %out.base().display(), "starting build pipeline");

    // --- Phase 1: Clean ---
    progress.phase("Clearing old docs");
    let removed = clear_docs(out.base(), &config.registry)?;

    // --- Phase 2: Assemble ---
    progress.phase("Parsing repositories");
    let total = repos.len();
    let mut reports = Vec::with_capacity(total);

    for (i, repo) in repos.iter_mut().enumerate() {
        progress.repo_started(&repo.full_name(), i + 1, total);

        let report = assemble_repo(repo, &config.registry, &mut out)?;

        if config.nav && !report.created_files.is_empty() {
            add_nav_to_files(&mut out, &report.created_files, config.parent_links)?;
            let repo_dir = out.repo_dir(&repo.name);
            write_index(
                &mut out,
                &repo_dir,
                config.index_depth,
                config.parent_links,
                &config.index_file,
            )?;
        }

        progress.repo_finished(&report);
        reports.push(report);
    }

    // --- Phase 3: Root index ---
    progress.phase("Writing root index");
    let base = out.base().to_path_buf();
    let root_index = write_index(
        &mut out,
        &base,
        config.index_depth,
        false,
        &config.index_file,
    )?;

    let report = RunReport {
        repos: reports,
        removed,
        root_index,
        elapsed: start.elapsed(),
    };

    progress.done(&report);

    info!(
        repos = report.repos.len(),
        removed = report.removed.len(),
        elapsed_ms = report.elapsed.as_millis(),
        "build pipeline complete"
    );

    Ok(report)
}
