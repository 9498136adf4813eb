use anyhow::Result;

use crate::github::IssueContent;
use crate::url::{IssueRef, RepoUrl};

/// Remote operations the broadcast pipeline needs.
///
/// Implemented by `GitHubTracker` and `StubTracker`. Calls are awaited one at
/// a time; implementations need not be `Send`.
#[allow(async_fn_in_trait)]
pub trait IssueTracker {
    /// Read an issue's title and body.
    async fn fetch_issue(&self, issue: &IssueRef) -> Result<IssueContent>;

    /// Check that a repository is reachable without mutating it.
    async fn probe_repo(&self, repo: &RepoUrl) -> Result<()>;

    /// Open a new issue in `repo`.
    async fn create_issue(&self, repo: &RepoUrl, content: &IssueContent) -> Result<()>;
}
