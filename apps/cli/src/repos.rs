//! Turn the configured repository selection into `Repository` values.

use docsgen_core::{LocalSource, Overrides, ProgressReporter, Repository};
use docsgen_github::GithubClient;
use docsgen_shared::{AppConfig, DocsgenError, RepoConfig, RepoSelection, Result};
use tracing::{info, instrument};

/// Branch label for repositories read from a local checkout without one.
const LOCAL_BRANCH: &str = "local";

/// Collect every repository of the run, fetching remote ones eagerly.
#[instrument(skip_all)]
pub(crate) async fn collect(
    config: &AppConfig,
    progress: &dyn ProgressReporter,
) -> Result<Vec<Repository>> {
    let client = GithubClient::new(&config.github)?;

    match config.repo_selection()? {
        RepoSelection::Explicit(entries) => {
            info!(count = entries.len(), "using repositories defined in config");
            let mut repos = Vec::with_capacity(entries.len());
            for entry in entries {
                let owner = owner_of(entry, config.github.fallback_owner.as_deref())?;
                progress.phase(&format!("Collecting {owner}/{}", entry.name));
                repos.push(from_entry(&client, entry, owner).await?);
            }
            Ok(repos)
        }
        RepoSelection::Owner(owner) => {
            info!(owner, "no repositories configured, adding every repository of the owner");
            progress.phase(&format!("Listing repositories of {owner}"));
            let listed = client.list_repos(owner).await?;

            let mut repos = Vec::with_capacity(listed.len());
            for remote in listed {
                progress.phase(&format!("Collecting {owner}/{}", remote.name));
                let snapshot = client
                    .fetch_snapshot(owner, &remote.name, &remote.default_branch)
                    .await?;
                repos.push(Repository::from_snapshot(snapshot, Overrides::default()));
            }
            Ok(repos)
        }
    }
}

async fn from_entry(client: &GithubClient, entry: &RepoConfig, owner: &str) -> Result<Repository> {
    let overrides = Overrides::from(entry);

    if let Some(path) = &entry.path {
        let branch = entry.branch.as_deref().unwrap_or(LOCAL_BRANCH);
        return Ok(Repository::new(
            owner,
            entry.name.as_str(),
            branch,
            overrides,
            LocalSource::new(path),
        ));
    }

    let branch = match &entry.branch {
        Some(branch) => branch.clone(),
        None => client.repo_info(owner, &entry.name).await?.default_branch,
    };
    let snapshot = client.fetch_snapshot(owner, &entry.name, &branch).await?;
    Ok(Repository::from_snapshot(snapshot, overrides))
}

fn owner_of<'a>(entry: &'a RepoConfig, fallback: Option<&'a str>) -> Result<&'a str> {
    entry
        .owner
        .as_deref()
        .or(fallback)
        .filter(|owner| !owner.is_empty())
        .ok_or_else(|| {
            DocsgenError::config(format!(
                "repository '{}' has no owner and github.fallback_owner is not set",
                entry.name
            ))
        })
}
