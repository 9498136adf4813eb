use std::fmt::Write as _;

use crate::github::IssueContent;
use crate::tracker::IssueTracker;
use crate::url::{RepoUrl, is_github_repo_url};

/// Whether the broadcast only simulates or actually opens issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BroadcastMode {
    /// Probe each repository; never issue a write.
    DryRun,
    /// Create the issue in each confirmed repository.
    Live,
}

impl BroadcastMode {
    pub fn from_dry_run(dry_run: bool) -> Self {
        if dry_run { Self::DryRun } else { Self::Live }
    }
}

/// Terminal state of a single target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetOutcome {
    /// Not `https://github.com/<owner>/<repo>`; never contacted.
    NonGithub,
    /// Dry run: the repository is reachable.
    ProbeOk,
    /// Dry run: the repository probe failed, so creation might too.
    ProbeFailed,
    Created,
    CreateFailed,
    /// The operator declined; neither success nor failure.
    Skipped,
}

impl TargetOutcome {
    pub fn is_failure(self) -> bool {
        matches!(self, Self::ProbeFailed | Self::CreateFailed)
    }

    pub fn is_success(self) -> bool {
        matches!(self, Self::ProbeOk | Self::Created)
    }
}

/// Per-target results of one broadcast, in processing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastOutcome {
    pub mode: BroadcastMode,
    pub results: Vec<(String, TargetOutcome)>,
}

impl BroadcastOutcome {
    fn urls_where(&self, pred: impl Fn(TargetOutcome) -> bool) -> Vec<&str> {
        self.results
            .iter()
            .filter(|(_, outcome)| pred(*outcome))
            .map(|(url, _)| url.as_str())
            .collect()
    }

    pub fn non_github_urls(&self) -> Vec<&str> {
        self.urls_where(|o| o == TargetOutcome::NonGithub)
    }

    /// Failed creates, or in a dry run, targets that might fail.
    pub fn failed_urls(&self) -> Vec<&str> {
        self.urls_where(TargetOutcome::is_failure)
    }

    pub fn succeeded_urls(&self) -> Vec<&str> {
        self.urls_where(TargetOutcome::is_success)
    }

    pub fn skipped_urls(&self) -> Vec<&str> {
        self.urls_where(|o| o == TargetOutcome::Skipped)
    }

    /// Human-readable report of every non-empty bucket.
    pub fn summary(&self) -> String {
        let (ok_label, failed_label) = match self.mode {
            BroadcastMode::DryRun => ("Might succeed", "Might fail"),
            BroadcastMode::Live => ("Created", "Failed"),
        };
        let mut out = String::new();
        if self.mode == BroadcastMode::DryRun {
            out.push_str("Dry run: no issues were created.\n");
        }
        for (label, urls) in [
            (ok_label, self.succeeded_urls()),
            (failed_label, self.failed_urls()),
            ("Skipped", self.skipped_urls()),
            ("Not GitHub repositories", self.non_github_urls()),
        ] {
            if urls.is_empty() {
                continue;
            }
            let _ = writeln!(out, "{label} ({}):", urls.len());
            for url in urls {
                let _ = writeln!(out, "  {url}");
            }
        }
        if self.results.is_empty() {
            out.push_str("No targets to broadcast to.\n");
        }
        out
    }
}

/// Broadcast `issue` to every target, one at a time.
///
/// Non-GitHub URLs are recorded and never contacted. In live mode `confirm`
/// is asked once per GitHub target before creating; a declined target is
/// skipped. A failed call is terminal for its target only and is never
/// retried.
pub async fn broadcast<T, I, S, F>(
    tracker: &T,
    issue: &IssueContent,
    targets: I,
    mode: BroadcastMode,
    mut confirm: F,
) -> BroadcastOutcome
where
    T: IssueTracker,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
    F: FnMut(&str) -> bool,
{
    let mut results = Vec::new();
    for target in targets {
        let url = target.as_ref();
        let outcome = dispatch_one(tracker, issue, url, mode, &mut confirm).await;
        tracing::info!("broadcast {url}: {outcome:?}");
        results.push((url.to_owned(), outcome));
    }
    BroadcastOutcome { mode, results }
}

async fn dispatch_one<T, F>(
    tracker: &T,
    issue: &IssueContent,
    url: &str,
    mode: BroadcastMode,
    confirm: &mut F,
) -> TargetOutcome
where
    T: IssueTracker,
    F: FnMut(&str) -> bool,
{
    if !is_github_repo_url(url) {
        return TargetOutcome::NonGithub;
    }
    let Ok(repo) = RepoUrl::parse(url) else {
        return TargetOutcome::NonGithub;
    };

    match mode {
        BroadcastMode::DryRun => match tracker.probe_repo(&repo).await {
            Ok(()) => TargetOutcome::ProbeOk,
            Err(e) => {
                tracing::warn!("probe of {url} failed: {e:#}");
                TargetOutcome::ProbeFailed
            }
        },
        BroadcastMode::Live => {
            if !confirm(url) {
                return TargetOutcome::Skipped;
            }
            match tracker.create_issue(&repo, issue).await {
                Ok(()) => TargetOutcome::Created,
                Err(e) => {
                    tracing::warn!("creating issue in {url} failed: {e:#}");
                    TargetOutcome::CreateFailed
                }
            }
        }
    }
}
