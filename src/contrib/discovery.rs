use clap::ValueEnum;
use serde::Deserialize;
use std::collections::HashSet;
use tracing::{debug, instrument};

use crate::github::types::{Repository, SearchResults};
use crate::github::{fetch, ApiClient, ApiError};

/// Repositories requested per page when listing everything the token can see.
pub const REPOS_PER_PAGE: u32 = 100;

/// How the set of repositories to walk is found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiscoveryMode {
    /// Every repository visible to the token, page by page
    #[default]
    FullScan,
    /// Only repositories with an issue or PR involving the user (one search call)
    InvolvementSearch,
}

impl std::fmt::Display for DiscoveryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiscoveryMode::FullScan => write!(f, "full-scan"),
            DiscoveryMode::InvolvementSearch => write!(f, "involvement-search"),
        }
    }
}

/// Output of repository discovery.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discovered {
    /// Repositories to walk, `owner/repo`, in first-seen order.
    pub repositories: Vec<String>,
    /// One entry per search hit (repeats allowed). Empty for a full scan.
    pub involvement: Vec<String>,
}

pub async fn discover(
    client: &dyn ApiClient,
    mode: DiscoveryMode,
    username: &str,
) -> Result<Discovered, ApiError> {
    match mode {
        DiscoveryMode::FullScan => Ok(Discovered {
            repositories: list_all_repositories(client).await?,
            involvement: Vec::new(),
        }),
        DiscoveryMode::InvolvementSearch => search_involved_repositories(client, username).await,
    }
}

/// Walk `/user/repos` until a page comes back empty. A repository that
/// shifts across a page boundary mid-scan is listed once, at its first
/// position.
#[instrument(skip(client))]
pub async fn list_all_repositories(client: &dyn ApiClient) -> Result<Vec<String>, ApiError> {
    let mut repositories = Vec::new();
    let mut seen = HashSet::new();
    let mut page = 1;
    loop {
        let route = format!("/user/repos?per_page={REPOS_PER_PAGE}&page={page}");
        let batch: Vec<Repository> = fetch(client, &route).await?;
        debug!(page, count = batch.len(), "fetched repository page");
        if batch.is_empty() {
            break;
        }
        for repo in batch {
            if seen.insert(repo.full_name.clone()) {
                repositories.push(repo.full_name);
            }
        }
        page += 1;
    }
    Ok(repositories)
}

/// One `involves:` search; repositories are derived from each hit's
/// `repository_url`.
#[instrument(skip(client))]
pub async fn search_involved_repositories(
    client: &dyn ApiClient,
    username: &str,
) -> Result<Discovered, ApiError> {
    let route = format!("/search/issues?q=involves:{username}&per_page={REPOS_PER_PAGE}");
    let results: SearchResults = fetch(client, &route).await?;
    debug!(
        total = results.total_count,
        returned = results.items.len(),
        "search results"
    );

    let mut discovered = Discovered::default();
    for item in &results.items {
        let Some(repo) = repo_name_from_url(client.base_url(), &item.repository_url) else {
            debug!(url = %item.repository_url, "skipping search hit without a repository");
            continue;
        };
        if !discovered.repositories.contains(&repo) {
            discovered.repositories.push(repo.clone());
        }
        discovered.involvement.push(repo);
    }
    Ok(discovered)
}

/// `{base}/repos/owner/repo` to `owner/repo`. URLs from a different host
/// (or behind a proxy) fall back to their last two path segments.
pub fn repo_name_from_url(base_url: &str, repository_url: &str) -> Option<String> {
    let prefix = format!("{}/repos/", base_url.trim_end_matches('/'));
    if let Some(name) = repository_url.strip_prefix(&prefix) {
        return (!name.is_empty()).then(|| name.trim_end_matches('/').to_string());
    }

    let mut segments = repository_url
        .trim_end_matches('/')
        .rsplit('/')
        .filter(|s| !s.is_empty());
    let repo = segments.next()?;
    let owner = segments.next()?;
    if owner.contains(':') {
        return None;
    }
    Some(format!("{owner}/{repo}"))
}
