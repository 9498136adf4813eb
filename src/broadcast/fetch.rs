use crate::error::SkpkgError;
use crate::github::IssueContent;
use crate::tracker::IssueTracker;
use crate::url::{IssueRef, RepoUrl};

/// The issue to broadcast together with the repository that hosts it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedIssue {
    pub source_repo: RepoUrl,
    pub content: IssueContent,
}

impl FetchedIssue {
    /// Canonical URL of the source repository, excluded from broadcast targets.
    pub fn source_repo_url(&self) -> String {
        self.source_repo.html_url()
    }
}

/// Resolve an issue URL to its content with a single read. No retries.
pub async fn fetch_issue<T: IssueTracker>(
    tracker: &T,
    issue_url: &str,
) -> Result<FetchedIssue, SkpkgError> {
    let issue = IssueRef::parse(issue_url).map_err(|_| SkpkgError::InvalidIssueUrl {
        input: issue_url.to_owned(),
        hint: "expected https://github.com/<owner>/<repo>/issues/<number>",
    })?;

    let content = tracker.fetch_issue(&issue).await.map_err(|e| {
        tracing::debug!("fetching {issue} failed: {e:#}");
        SkpkgError::IssueNotFound {
            url: issue_url.to_owned(),
        }
    })?;

    tracing::info!("fetched issue {issue}: {:?}", content.title);
    Ok(FetchedIssue {
        source_repo: issue.repo,
        content,
    })
}
