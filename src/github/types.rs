//! Wire types for the slices of the GitHub REST API this tool reads.
//! Unknown fields are ignored; fields GitHub may omit or null out default.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// The `user` object GitHub embeds in pulls, reviews and comments.
/// Null for deleted ("ghost") accounts.
#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    pub login: String,
}

/// Entry from `/user/repos`.
#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    pub full_name: String,
}

/// Entry from `/repos/{owner}/{repo}/pulls`.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub user: Option<Account>,
    pub commits_url: String,
    pub review_comments_url: String,
    pub comments_url: String,
}

impl PullRequest {
    pub fn authored_by(&self, login: &str) -> bool {
        self.user.as_ref().is_some_and(|u| u.login == login)
    }

    /// Reviews live next to review comments:
    /// `.../pulls/{n}/comments` becomes `.../pulls/{n}/reviews`.
    pub fn reviews_url(&self) -> String {
        match self.review_comments_url.strip_suffix("/comments") {
            Some(prefix) => format!("{prefix}/reviews"),
            None => self.review_comments_url.replace("comments", "reviews"),
        }
    }
}

/// Entry from a pull request's `commits_url`.
#[derive(Debug, Clone, Deserialize)]
pub struct CommitRef {
    #[serde(default)]
    pub sha: String,
    pub url: String,
}

/// Single-commit detail; only the line stats are read.
#[derive(Debug, Clone, Deserialize)]
pub struct CommitDetail {
    #[serde(default)]
    pub stats: Option<CommitStats>,
}

impl CommitDetail {
    /// Line stats, zero when GitHub omits or nulls them.
    pub fn line_stats(&self) -> CommitStats {
        self.stats.unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
pub struct CommitStats {
    #[serde(default)]
    pub additions: u64,
    #[serde(default)]
    pub deletions: u64,
}

/// Entry from `/pulls/{n}/reviews`.
#[derive(Debug, Clone, Deserialize)]
pub struct Review {
    #[serde(default)]
    pub user: Option<Account>,
    #[serde(default)]
    pub body: Option<String>,
}

/// Entry from a pull request's `comments_url` (conversation thread).
#[derive(Debug, Clone, Deserialize)]
pub struct IssueComment {
    #[serde(default)]
    pub user: Option<Account>,
    #[serde(default)]
    pub body: Option<String>,
}

/// Reviews and issue comments are judged the same way once fetched.
pub trait Authored {
    fn author(&self) -> Option<&str>;
    fn body(&self) -> Option<&str>;

    fn is_by(&self, login: &str) -> bool {
        self.author() == Some(login)
    }
}

impl Authored for Review {
    fn author(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.login.as_str())
    }

    fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }
}

impl Authored for IssueComment {
    fn author(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.login.as_str())
    }

    fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }
}

/// `/users/{username}`.
#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// `/search/issues` response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResults {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub items: Vec<SearchItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchItem {
    pub repository_url: String,
}
