//! Shared types, error model, and configuration for docsgen.
//!
//! This crate is the foundation depended on by all other docsgen crates.
//! It provides:
//! - [`DocsgenError`], the unified error type
//! - Domain types ([`CategoryDef`], [`RepoSnapshot`], [`RemoteRepo`])
//! - Configuration ([`AppConfig`], [`RepoSelection`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, GithubSettings, OutputConfig, RepoConfig, RepoSelection, config_dir,
    config_file_path, default_categories, init_config, load_config, load_config_from,
    resolve_config_path,
};
pub use error::{DocsgenError, Result};
pub use types::{CategoryDef, RemoteRepo, RepoSnapshot, SnapshotFile};
