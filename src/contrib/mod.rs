pub mod discovery;
pub mod tally;
pub mod window;

pub use discovery::{Discovered, DiscoveryMode};
pub use tally::Contributions;
pub use window::DateWindow;

use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::config::Settings;
use crate::github::types::{
    Authored, CommitDetail, CommitRef, IssueComment, PullRequest, Review, UserProfile,
};
use crate::github::{fetch, ApiClient, ApiError};
use crate::report::types::ContributionReport;

#[derive(Debug, Error)]
pub enum ContribError {
    #[error("Repository discovery failed: {0}")]
    Discovery(#[from] ApiError),
}

/// Discover repositories, walk them, and finalize the report.
///
/// Only discovery failures abort the run. Everything below it is isolated:
/// a failing repository, pull request, commit or profile lookup is logged and
/// skipped while the rest of the totals are kept.
#[instrument(skip_all, fields(user = %settings.credentials.username, mode = %settings.mode))]
pub async fn collect(
    client: &dyn ApiClient,
    settings: &Settings,
) -> Result<ContributionReport, ContribError> {
    let username = settings.credentials.username.as_str();

    if settings.window.is_bounded() {
        info!(
            start = ?settings.window.start(),
            end = ?settings.window.end(),
            "filtering by creation date"
        );
    }

    info!("discovering repositories");
    let discovered = discovery::discover(client, settings.mode, username).await?;
    info!(repositories = discovered.repositories.len(), "discovered repositories");

    let contributions = walk(client, &discovered, username, &settings.window).await;
    if contributions.tally.is_empty() {
        warn!("no repositories found to report on");
    }
    info!(
        repositories = contributions.tally.len(),
        scanned = contributions.repositories_scanned,
        failed = contributions.repositories_failed,
        "walk complete"
    );

    let display_name = resolve_display_name(client, username).await;
    Ok(contributions.finalize(username, display_name, &settings.window))
}

/// Accumulate `username`'s activity across every discovered repository, in
/// discovery order.
pub async fn walk(
    client: &dyn ApiClient,
    discovered: &Discovered,
    username: &str,
    window: &DateWindow,
) -> Contributions {
    let mut acc = Contributions::default();

    for repo in &discovered.involvement {
        acc.tally.record(repo);
    }

    for repo in &discovered.repositories {
        acc.tally.observe(repo);
        walk_repository(client, repo, username, window, &mut acc).await;
    }

    acc
}

#[instrument(skip(client, window, acc))]
async fn walk_repository(
    client: &dyn ApiClient,
    repo: &str,
    username: &str,
    window: &DateWindow,
    acc: &mut Contributions,
) {
    let route = format!("/repos/{repo}/pulls?state=all&per_page=100");
    let pulls: Vec<PullRequest> = match fetch(client, &route).await {
        Ok(pulls) => pulls,
        Err(error) => {
            warn!(%repo, %error, "failed to list pull requests, skipping repository");
            acc.repositories_failed += 1;
            return;
        }
    };
    acc.repositories_scanned += 1;
    debug!(count = pulls.len(), "listed pull requests");

    for pr in &pulls {
        if !window.contains(pr.created_at) {
            continue;
        }
        walk_pull_request(client, repo, pr, username, acc).await;
    }
}

async fn walk_pull_request(
    client: &dyn ApiClient,
    repo: &str,
    pr: &PullRequest,
    username: &str,
    acc: &mut Contributions,
) {
    if pr.authored_by(username) {
        acc.pull_requests_authored += 1;
        acc.tally.record(repo);
        add_commit_lines(client, repo, pr, acc).await;
    }

    match fetch::<Vec<Review>>(client, &pr.reviews_url()).await {
        Ok(reviews) => {
            for review in reviews.iter().filter(|r| r.is_by(username)) {
                acc.record_review(review.body());
            }
        }
        Err(error) => warn!(%repo, pr = pr.number, %error, "failed to fetch reviews"),
    }

    match fetch::<Vec<IssueComment>>(client, &pr.comments_url).await {
        Ok(comments) => {
            for comment in comments.iter().filter(|c| c.is_by(username)) {
                acc.record_comment(comment.body());
            }
        }
        Err(error) => warn!(%repo, pr = pr.number, %error, "failed to fetch comments"),
    }
}

async fn add_commit_lines(
    client: &dyn ApiClient,
    repo: &str,
    pr: &PullRequest,
    acc: &mut Contributions,
) {
    let commits: Vec<CommitRef> = match fetch(client, &pr.commits_url).await {
        Ok(commits) => commits,
        Err(error) => {
            warn!(%repo, pr = pr.number, %error, "failed to fetch commits");
            return;
        }
    };

    for commit in &commits {
        match fetch::<CommitDetail>(client, &commit.url).await {
            Ok(detail) => {
                let stats = detail.line_stats();
                acc.add_lines(stats.additions, stats.deletions);
            }
            Err(error) => {
                warn!(
                    %repo,
                    pr = pr.number,
                    sha = %commit.sha,
                    %error,
                    "failed to fetch commit detail"
                )
            }
        }
    }
}

/// The profile's display name, or `username` when it is unset or the lookup
/// fails.
async fn resolve_display_name(client: &dyn ApiClient, username: &str) -> String {
    match fetch::<UserProfile>(client, &format!("/users/{username}")).await {
        Ok(profile) => {
            debug!(login = %profile.login, name = ?profile.name, "resolved profile");
            profile
                .name
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| username.to_string())
        }
        Err(error) => {
            warn!(%username, %error, "failed to resolve display name");
            username.to_string()
        }
    }
}
