//! Remote repository provider backed by the GitHub REST API.
//!
//! docsgen only needs three things from a hosting service: the repositories
//! of an owner (with their default branch), the list of markdown files in a
//! repository, and the raw content of a file. Everything is fetched
//! sequentially; a repository is captured eagerly as a [`RepoSnapshot`] so
//! the assembly pipeline itself stays synchronous.

mod api;

use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use tracing::{debug, info, instrument, warn};
use url::Url;

use docsgen_shared::{
    DocsgenError, GithubSettings, RemoteRepo, RepoSnapshot, Result, SnapshotFile,
};

use api::{RepoItem, TreeResponse};

/// User-Agent string for provider requests.
const USER_AGENT: &str = concat!("docsgen/", env!("CARGO_PKG_VERSION"));

/// Page size used when listing an owner's repositories (API maximum).
const PER_PAGE: usize = 100;

// ---------------------------------------------------------------------------
// GithubClient
// ---------------------------------------------------------------------------

/// Thin client over the GitHub REST API and the raw content host.
#[derive(Debug, Clone)]
pub struct GithubClient {
    client: Client,
    api_url: Url,
    raw_url: Url,
}

impl GithubClient {
    /// Build a client from settings, reading the token from `token_env` if set.
    pub fn new(settings: &GithubSettings) -> Result<Self> {
        let token = std::env::var(&settings.token_env)
            .ok()
            .filter(|t| !t.is_empty());
        if token.is_none() {
            debug!(var = %settings.token_env, "no API token found, using anonymous access");
        }
        Self::with_token(settings, token)
    }

    /// Build a client with an explicit (optional) token.
    pub fn with_token(settings: &GithubSettings, token: Option<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        if let Some(token) = token {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| DocsgenError::config(format!("invalid API token: {e}")))?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| DocsgenError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_url: parse_base(&settings.api_url)?,
            raw_url: parse_base(&settings.raw_url)?,
        })
    }

    /// List every repository owned by `owner`.
    #[instrument(skip(self))]
    pub async fn list_repos(&self, owner: &str) -> Result<Vec<RemoteRepo>> {
        let mut repos = Vec::new();

        for page in 1.. {
            let mut url = join_segments(&self.api_url, &["users", owner, "repos"]);
            url.query_pairs_mut()
                .append_pair("per_page", &PER_PAGE.to_string())
                .append_pair("page", &page.to_string());

            let items: Vec<RepoItem> = self.get_json(&url).await?;
            let count = items.len();
            repos.extend(items.into_iter().map(RemoteRepo::from));

            if count < PER_PAGE {
                break;
            }
        }

        info!(owner, count = repos.len(), "listed repositories");
        Ok(repos)
    }

    /// Fetch one repository's metadata (used to learn its default branch).
    #[instrument(skip(self))]
    pub async fn repo_info(&self, owner: &str, name: &str) -> Result<RemoteRepo> {
        let url = join_segments(&self.api_url, &["repos", owner, name]);
        let item: RepoItem = self.get_json(&url).await?;
        Ok(item.into())
    }

    /// List the markdown files of a repository at `branch`, sorted by path.
    #[instrument(skip(self))]
    pub async fn list_markdown_files(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<Vec<String>> {
        let mut url = join_segments(&self.api_url, &["repos", owner, repo, "git", "trees", branch]);
        url.query_pairs_mut().append_pair("recursive", "1");

        let tree: TreeResponse = self.get_json(&url).await?;
        if tree.truncated {
            warn!(owner, repo, branch, "tree listing was truncated by the API");
        }

        let mut paths: Vec<String> = tree
            .tree
            .into_iter()
            .filter(|entry| entry.kind == "blob" && is_markdown(&entry.path))
            .map(|entry| entry.path)
            .collect();
        paths.sort();

        debug!(count = paths.len(), "markdown files listed");
        Ok(paths)
    }

    /// Fetch a file's raw content. `Ok(None)` when the file does not exist.
    #[instrument(skip(self))]
    pub async fn get_file(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        path: &str,
    ) -> Result<Option<String>> {
        let mut segments = vec![owner, repo];
        segments.extend(branch.split('/'));
        segments.extend(path.split('/').filter(|s| !s.is_empty()));
        let url = join_segments(&self.raw_url, &segments);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| DocsgenError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!(path, "file not found");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(DocsgenError::Network(format!("{url}: HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| DocsgenError::Network(format!("{url}: failed to read body: {e}")))?;
        Ok(Some(body))
    }

    /// Capture every markdown file of a repository.
    ///
    /// A file present in the listing but missing from the content host is a
    /// hard error: the two are expected to agree.
    #[instrument(skip(self))]
    pub async fn fetch_snapshot(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<RepoSnapshot> {
        let paths = self.list_markdown_files(owner, repo, branch).await?;
        let mut files = Vec::with_capacity(paths.len());

        for path in paths {
            let content = self
                .get_file(owner, repo, branch, &path)
                .await?
                .ok_or_else(|| DocsgenError::not_found(path.clone()))?;
            files.push(SnapshotFile { path, content });
        }

        info!(owner, repo, branch, files = files.len(), "repository snapshot fetched");

        Ok(RepoSnapshot {
            owner: owner.to_string(),
            name: repo.to_string(),
            branch: branch.to_string(),
            files,
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &Url) -> Result<T> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| DocsgenError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DocsgenError::Network(format!("{url}: HTTP {status}")));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| DocsgenError::parse(format!("{url}: {e}")))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse a base URL, making sure it can take path segments.
fn parse_base(raw: &str) -> Result<Url> {
    let url = Url::parse(raw)
        .map_err(|e| DocsgenError::config(format!("invalid base URL '{raw}': {e}")))?;
    if url.cannot_be_a_base() {
        return Err(DocsgenError::config(format!("'{raw}' cannot be a base URL")));
    }
    Ok(url)
}

/// Append percent-encoded path segments to a base URL.
fn join_segments(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

fn is_markdown(path: &str) -> bool {
    path.rsplit_once('.')
        .is_some_and(|(_, ext)| ext.eq_ignore_ascii_case("md"))
}
