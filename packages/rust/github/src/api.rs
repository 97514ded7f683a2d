//! Wire shapes of the GitHub REST responses docsgen reads.
//!
//! Only the fields we use are declared; serde ignores the rest.

use serde::Deserialize;

use docsgen_shared::RemoteRepo;

/// An item of `GET /users/{owner}/repos` or the body of `GET /repos/{owner}/{repo}`.
#[derive(Debug, Deserialize)]
pub(crate) struct RepoItem {
    pub name: String,
    pub default_branch: String,
}

impl From<RepoItem> for RemoteRepo {
    fn from(item: RepoItem) -> Self {
        Self {
            name: item.name,
            default_branch: item.default_branch,
        }
    }
}

/// Body of `GET /repos/{owner}/{repo}/git/trees/{ref}?recursive=1`.
#[derive(Debug, Deserialize)]
pub(crate) struct TreeResponse {
    #[serde(default)]
    pub tree: Vec<TreeEntry>,
    #[serde(default)]
    pub truncated: bool,
}

/// One entry of a git tree.
#[derive(Debug, Deserialize)]
pub(crate) struct TreeEntry {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: String,
}
