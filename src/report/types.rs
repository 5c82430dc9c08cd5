use chrono::NaiveDate;
use clap::ValueEnum;
use serde::Serialize;

/// One row of the most-active-repositories ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoActivity {
    /// `owner/repo`
    pub repository: String,
    pub interactions: u64,
}

/// Final result of a run. Built once by `Contributions::finalize`.
#[derive(Debug, Clone, Serialize)]
pub struct ContributionReport {
    /// Login the report was built for
    pub username: String,
    /// Profile display name, or the login when none is set
    pub display_name: String,
    pub pull_requests_authored: u64,
    pub pull_requests_reviewed: u64,
    pub valid_comments: u64,
    pub lines_added: u64,
    pub lines_deleted: u64,
    /// Always `lines_added + lines_deleted`
    pub lines_modified: u64,
    /// At most three, busiest first
    pub top_repositories: Vec<RepoActivity>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub repositories_scanned: u64,
    pub repositories_failed: u64,
}

/// Rendering target for a [`ContributionReport`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Html,
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Html => write!(f, "html"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
