use std::collections::HashMap;

use super::window::DateWindow;
use crate::report::types::{ContributionReport, RepoActivity};

/// A review or comment body counts only when it is longer than this many
/// characters.
pub const VALID_COMMENT_THRESHOLD: usize = 10;

/// How many repositories make the final ranking.
pub const TOP_REPOSITORIES: usize = 3;

pub fn is_valid_comment(body: Option<&str>) -> bool {
    body.is_some_and(|b| !b.is_empty() && b.chars().count() > VALID_COMMENT_THRESHOLD)
}

/// Per-repository interaction counts in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct RepoTally {
    entries: Vec<(String, u64)>,
    index: HashMap<String, usize>,
}

impl RepoTally {
    /// Zero-initialise `repo` if it has not been seen yet.
    pub fn observe(&mut self, repo: &str) -> usize {
        if let Some(&slot) = self.index.get(repo) {
            return slot;
        }
        let slot = self.entries.len();
        self.entries.push((repo.to_string(), 0));
        self.index.insert(repo.to_string(), slot);
        slot
    }

    /// Add one interaction to `repo`, observing it first if needed.
    pub fn record(&mut self, repo: &str) {
        let slot = self.observe(repo);
        self.entries[slot].1 += 1;
    }

    pub fn get(&self, repo: &str) -> Option<u64> {
        self.index.get(repo).map(|&slot| self.entries[slot].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The `n` busiest repositories, highest count first. Ties keep
    /// first-seen order.
    pub fn top(&self, n: usize) -> Vec<RepoActivity> {
        let mut ranked = self.entries.clone();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
            .into_iter()
            .take(n)
            .map(|(repository, interactions)| RepoActivity {
                repository,
                interactions,
            })
            .collect()
    }
}

/// Running totals for one run. Counters only ever go up.
#[derive(Debug, Clone, Default)]
pub struct Contributions {
    pub pull_requests_authored: u64,
    pub pull_requests_reviewed: u64,
    pub valid_comments: u64,
    pub lines_added: u64,
    pub lines_deleted: u64,
    pub tally: RepoTally,
    pub repositories_scanned: u64,
    pub repositories_failed: u64,
}

impl Contributions {
    pub fn add_lines(&mut self, additions: u64, deletions: u64) {
        self.lines_added += additions;
        self.lines_deleted += deletions;
    }

    /// A review by the target user; substantive ones also count as comments.
    pub fn record_review(&mut self, body: Option<&str>) {
        self.pull_requests_reviewed += 1;
        if is_valid_comment(body) {
            self.valid_comments += 1;
        }
    }

    /// An issue comment by the target user. Does not count as a review.
    pub fn record_comment(&mut self, body: Option<&str>) {
        if is_valid_comment(body) {
            self.valid_comments += 1;
        }
    }

    pub fn finalize(
        self,
        username: &str,
        display_name: String,
        window: &DateWindow,
    ) -> ContributionReport {
        ContributionReport {
            username: username.to_string(),
            display_name,
            pull_requests_authored: self.pull_requests_authored,
            pull_requests_reviewed: self.pull_requests_reviewed,
            valid_comments: self.valid_comments,
            lines_added: self.lines_added,
            lines_deleted: self.lines_deleted,
            lines_modified: self.lines_added + self.lines_deleted,
            top_repositories: self.tally.top(TOP_REPOSITORIES),
            start_date: window.start(),
            end_date: window.end(),
            repositories_scanned: self.repositories_scanned,
            repositories_failed: self.repositories_failed,
        }
    }
}
