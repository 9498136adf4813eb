use anyhow::Result;

use crate::github::{GitHubClient, IssueContent, issues};
use crate::url::{IssueRef, RepoUrl};

use super::interface::IssueTracker;

/// The real GitHub REST backend.
pub struct GitHubTracker {
    client: GitHubClient,
}

impl GitHubTracker {
    pub fn new(client: GitHubClient) -> Self {
        Self { client }
    }
}

impl IssueTracker for GitHubTracker {
    async fn fetch_issue(&self, issue: &IssueRef) -> Result<IssueContent> {
        tracing::debug!("tracker: GET issue {issue}");
        issues::fetch(self.client.octocrab(), issue)
            .await
            .inspect_err(|e| log_status("fetch_issue", e))
    }

    async fn probe_repo(&self, repo: &RepoUrl) -> Result<()> {
        tracing::debug!("tracker: GET repo {repo}");
        issues::probe_repo(self.client.octocrab(), repo)
            .await
            .inspect_err(|e| log_status("probe_repo", e))
    }

    async fn create_issue(&self, repo: &RepoUrl, content: &IssueContent) -> Result<()> {
        tracing::debug!("tracker: POST issue to {repo}");
        issues::create(self.client.octocrab(), repo, content)
            .await
            .inspect_err(|e| log_status("create_issue", e))
    }
}

fn log_status(op: &str, error: &anyhow::Error) {
    match issues::error_status(error) {
        Some(status) => tracing::debug!("tracker: {op} answered {status}"),
        None => tracing::debug!("tracker: {op} failed: {error:#}"),
    }
}
