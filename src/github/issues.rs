use std::sync::Arc;

use anyhow::{Context, Result};
use octocrab::Octocrab;

use crate::github::types::{IssueContent, RawIssue, RawRepository};
use crate::url::{IssueRef, RepoUrl};

/// Fetch the title and body of a single issue.
pub(crate) async fn fetch(octocrab: &Arc<Octocrab>, issue: &IssueRef) -> Result<IssueContent> {
    let RepoUrl { owner, repo } = &issue.repo;
    let route = format!("/repos/{owner}/{repo}/issues/{}", issue.number);
    let raw: RawIssue = octocrab
        .get(route, None::<&()>)
        .await
        .context("fetching issue")?;
    Ok(raw.into())
}

/// Read repository metadata; succeeds only if the body reports an owner.
pub(crate) async fn probe_repo(octocrab: &Arc<Octocrab>, repo: &RepoUrl) -> Result<()> {
    let RepoUrl { owner, repo } = repo;
    let route = format!("/repos/{owner}/{repo}");
    let raw: RawRepository = octocrab
        .get(route, None::<&()>)
        .await
        .context("reading repository metadata")?;
    tracing::debug!("probe {owner}/{repo}: owned by {}", raw.owner.login);
    Ok(())
}

/// Open a new issue with the given title and body.
///
/// GitHub answers `201 Created`; any error status surfaces as `Err`.
pub(crate) async fn create(
    octocrab: &Arc<Octocrab>,
    repo: &RepoUrl,
    content: &IssueContent,
) -> Result<()> {
    let RepoUrl { owner, repo } = repo;
    let route = format!("/repos/{owner}/{repo}/issues");
    let payload = serde_json::json!({ "title": content.title, "body": content.body });
    let _: serde_json::Value = octocrab
        .post(route, Some(&payload))
        .await
        .context("creating issue")?;
    Ok(())
}

/// HTTP status carried by an octocrab error, if the server answered at all.
pub(crate) fn error_status(error: &anyhow::Error) -> Option<http::StatusCode> {
    match error.downcast_ref::<octocrab::Error>()? {
        octocrab::Error::GitHub { source, .. } => Some(source.status_code),
        _ => None,
    }
}
