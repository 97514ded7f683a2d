//! Classification and assembly pipeline for docsgen.
//!
//! This crate sorts a repository's markdown into documentation categories,
//! writes the per-repository output tree, and adds navigation between the
//! generated files (e.g., `pipeline::run`).

pub mod assembler;
pub mod cleaner;
pub mod matcher;
pub mod navigation;
pub mod output;
pub mod pipeline;
pub mod registry;
pub mod repository;

pub use assembler::RepoReport;
pub use output::{OutputTree, WriteMode};
pub use pipeline::{ProgressReporter, RunConfig, RunReport, SilentProgress};
pub use registry::SectionRegistry;
pub use repository::{ContentSource, LocalSource, OverrideAction, Overrides, Repository, SnapshotSource};
