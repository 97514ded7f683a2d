//! Application configuration for docsgen.
//!
//! The config file is looked up as `--config <path>`, then `./docsgen.toml`,
//! then `~/.docsgen/docsgen.toml`. CLI flags override config file values,
//! which override defaults.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DocsgenError, Result};
use crate::types::CategoryDef;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "docsgen.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".docsgen";

// ---------------------------------------------------------------------------
// Config structs (matching docsgen.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Output tree settings.
    #[serde(default)]
    pub output: OutputConfig,

    /// Repository provider settings.
    #[serde(default)]
    pub github: GithubSettings,

    /// Ordered category definitions (order = processing and display order).
    #[serde(default = "default_categories")]
    pub categories: Vec<CategoryDef>,

    /// Explicit repositories to process.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub repos: Vec<RepoConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output: OutputConfig::default(),
            github: GithubSettings::default(),
            categories: default_categories(),
            repos: Vec::new(),
        }
    }
}

/// `[output]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Base directory of the generated documentation tree.
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,

    /// Inject sibling navigation and write per-repository index files.
    #[serde(default = "default_true")]
    pub nav: bool,

    /// Put a `../` link at the top of generated files.
    #[serde(default = "default_true")]
    pub parent_links: bool,

    /// How many directory levels an index file lists.
    #[serde(default = "default_index_depth")]
    pub index_depth: usize,

    /// File name used for generated index files.
    #[serde(default = "default_index_file")]
    pub index_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            nav: true,
            parent_links: true,
            index_depth: default_index_depth(),
            index_file: default_index_file(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("docs")
}
fn default_true() -> bool {
    true
}
fn default_index_depth() -> usize {
    1
}
fn default_index_file() -> String {
    "README.md".into()
}

/// `[github]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubSettings {
    /// Owner whose repositories are processed when no `[[repos]]` are given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_owner: Option<String>,

    /// REST API base URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Base URL serving raw file contents.
    #[serde(default = "default_raw_url")]
    pub raw_url: String,

    /// Name of the env var holding an access token (never store the token itself).
    #[serde(default = "default_token_env")]
    pub token_env: String,

    /// HTTP timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GithubSettings {
    fn default() -> Self {
        Self {
            fallback_owner: None,
            api_url: default_api_url(),
            raw_url: default_raw_url(),
            token_env: default_token_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_api_url() -> String {
    "https://api.github.com".into()
}
fn default_raw_url() -> String {
    "https://raw.githubusercontent.com".into()
}
fn default_token_env() -> String {
    "GITHUB_TOKEN".into()
}
fn default_timeout_secs() -> u64 {
    30
}

/// `[[repos]]` entry: one repository to aggregate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoConfig {
    /// Owner (user or organisation). Falls back to `github.fallback_owner`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    /// Repository name.
    pub name: String,

    /// Branch to read. Falls back to the repository's default branch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,

    /// Read from a local checkout instead of the remote provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// `selector/...` entries whose matching files are skipped entirely.
    #[serde(default)]
    pub files_to_ignore: Vec<String>,

    /// `selector/destination` entries copied verbatim to `destination/`.
    #[serde(default)]
    pub files_to_copy: Vec<String>,
}

/// Which repositories a run should process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoSelection<'a> {
    /// The `[[repos]]` list from the config.
    Explicit(&'a [RepoConfig]),
    /// Every repository owned by this user or organisation.
    Owner(&'a str),
}

impl AppConfig {
    /// Decide which repositories to process.
    ///
    /// Fails when neither explicit repositories nor a fallback owner exist.
    pub fn repo_selection(&self) -> Result<RepoSelection<'_>> {
        if !self.repos.is_empty() {
            return Ok(RepoSelection::Explicit(&self.repos));
        }
        match self.github.fallback_owner.as_deref() {
            Some(owner) if !owner.is_empty() => Ok(RepoSelection::Owner(owner)),
            _ => Err(DocsgenError::config(
                "either [[repos]] or github.fallback_owner has to be defined",
            )),
        }
    }

    /// Check category definitions and override entries for obvious mistakes.
    pub fn validate(&self) -> Result<()> {
        if self.categories.is_empty() {
            return Err(DocsgenError::validation("at least one category is required"));
        }

        let mut seen = HashSet::new();
        for cat in &self.categories {
            if cat.name.trim().is_empty() || cat.name.contains('/') {
                return Err(DocsgenError::validation(format!(
                    "invalid category name '{}'",
                    cat.name
                )));
            }
            if !seen.insert(cat.name.as_str()) {
                return Err(DocsgenError::validation(format!(
                    "duplicate category name '{}'",
                    cat.name
                )));
            }
        }

        for repo in &self.repos {
            for entry in &repo.files_to_copy {
                match entry.rsplit_once('/') {
                    Some((selector, dest))
                        if !selector.is_empty() && !matches!(dest, "" | "." | "..") => {}
                    _ => {
                        return Err(DocsgenError::validation(format!(
                            "copy override '{entry}' in {} must look like 'selector/destination'",
                            repo.name
                        )));
                    }
                }
            }
        }

        Ok(())
    }
}

/// The built-in Diátaxis categories, in processing order.
pub fn default_categories() -> Vec<CategoryDef> {
    fn def(name: &str, header: &str, marker: &str, patterns: &[&str]) -> CategoryDef {
        CategoryDef {
            name: name.into(),
            header_text: header.into(),
            marker: marker.into(),
            filename_patterns: patterns.iter().map(|p| (*p).to_string()).collect(),
        }
    }

    vec![
        def("tutorials", "Tutorials", "Tutorial", &["tutorial", "TUTORIAL"]),
        def(
            "howtos",
            "How-To Guides",
            "How To",
            &["howto", "how-to", "HOWTO", "HOW-TO"],
        ),
        def(
            "explanations",
            "Explanations",
            "Explanation",
            &["explanation", "EXPLANATION"],
        ),
        def("references", "References", "Reference", &["reference", "REFERENCE"]),
    ]
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.docsgen/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| DocsgenError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the user-level config file (`~/.docsgen/docsgen.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Find the config file to use: explicit path, then `./docsgen.toml`,
/// then the user-level file. `None` means "use defaults".
pub fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(DocsgenError::config(format!(
                "config file {} does not exist",
                path.display()
            )));
        }
        return Ok(Some(path.to_path_buf()));
    }

    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return Ok(Some(local));
    }

    let user = config_file_path()?;
    if user.exists() {
        return Ok(Some(user));
    }

    Ok(None)
}

/// Load the application config. Returns defaults if no config file exists.
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig> {
    match resolve_config_path(explicit)? {
        Some(path) => load_config_from(&path),
        None => {
            tracing::debug!("config file not found, using defaults");
            Ok(AppConfig::default())
        }
    }
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| DocsgenError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        DocsgenError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    config.validate()?;

    tracing::debug!(
        path = %path.display(),
        categories = config.categories.len(),
        repos = config.repos.len(),
        "config loaded"
    );
    Ok(config)
}

/// Write a default config file into `dir` (creating it if needed).
/// Returns the path to the created file.
pub fn init_config(dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| DocsgenError::io(dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| DocsgenError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| DocsgenError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("api_url"));
        assert!(toml_str.contains("tutorials"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.output.index_depth, 1);
        assert_eq!(parsed.github.token_env, "GITHUB_TOKEN");
        assert_eq!(parsed.categories, default_categories());
    }

    #[test]
    fn missing_categories_fall_back_to_builtin() {
        let config: AppConfig = toml::from_str("[output]\ndir = \"/tmp/out\"\n").expect("parse");
        assert_eq!(config.categories.len(), 4);
        assert_eq!(config.categories[0].name, "tutorials");
        assert_eq!(config.categories[3].name, "references");
        assert!(config.output.nav);
    }

    #[test]
    fn config_with_repos() {
        let toml_str = r#"
[github]
fallback_owner = "octo"

[[repos]]
name = "service-a"
branch = "develop"
files_to_ignore = ["CHANGELOG.md"]
files_to_copy = ["docs/ARCHITECTURE.md/architecture"]
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.repos.len(), 1);
        assert_eq!(config.repos[0].branch.as_deref(), Some("develop"));
        assert_eq!(config.repos[0].files_to_copy.len(), 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn selection_prefers_explicit_repos() {
        let mut config = AppConfig::default();
        config.github.fallback_owner = Some("octo".into());
        assert_eq!(config.repo_selection().unwrap(), RepoSelection::Owner("octo"));

        config.repos.push(RepoConfig {
            name: "demo".into(),
            ..Default::default()
        });
        assert!(matches!(
            config.repo_selection().unwrap(),
            RepoSelection::Explicit(repos) if repos.len() == 1
        ));
    }

    #[test]
    fn selection_without_repos_or_owner_is_config_error() {
        let config = AppConfig::default();
        let err = config.repo_selection().unwrap_err();
        assert!(matches!(err, DocsgenError::Config { .. }));
        assert!(err.to_string().contains("fallback_owner"));
    }

    #[test]
    fn validate_rejects_duplicate_categories() {
        let mut config = AppConfig::default();
        config.categories.push(config.categories[0].clone());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate category"));
    }

    #[test]
    fn validate_rejects_copy_without_destination() {
        let mut config = AppConfig::default();
        config.repos.push(RepoConfig {
            name: "demo".into(),
            files_to_copy: vec!["CHANGELOG.md".into()],
            ..Default::default()
        });
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("selector/destination"));
    }

    #[test]
    fn validate_rejects_copy_to_dot_destinations() {
        for entry in ["docs/x.md/..", "docs/x.md/."] {
            let mut config = AppConfig::default();
            config.repos.push(RepoConfig {
                name: "demo".into(),
                files_to_copy: vec![entry.into()],
                ..Default::default()
            });
            let err = config.validate().unwrap_err();
            assert!(err.to_string().contains("selector/destination"), "{entry}");
        }
    }

    #[test]
    fn fixture_config_validates() {
        let config = load_config_from(Path::new("../../../fixtures/config/docsgen.fixture.toml"))
            .expect("load fixture config");
        assert_eq!(config.repos.len(), 1);
        assert_eq!(config.repos[0].name, "demo");
        assert!(!config.output.parent_links);
    }
}
