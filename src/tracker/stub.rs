use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use anyhow::{Result, anyhow};

use crate::github::IssueContent;
use crate::url::{IssueRef, RepoUrl};

use super::interface::IssueTracker;

/// A call recorded by `StubTracker`, in the order it was made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerCall {
    FetchIssue(String),
    Probe(String),
    Create { repo: String, title: String },
}

/// A tracker that serves fixture data without any network calls.
///
/// Repositories are keyed by `owner/repo`. Probes succeed only for
/// repositories marked reachable; creates succeed unless marked failing.
#[derive(Default)]
pub struct StubTracker {
    pub issues: HashMap<String, IssueContent>,
    pub reachable: HashSet<String>,
    pub failing_creates: HashSet<String>,
    calls: Mutex<Vec<TrackerCall>>,
}

impl StubTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `content` for the issue at `url`.
    pub fn with_issue(mut self, url: &str, content: IssueContent) -> Self {
        let key = IssueRef::parse(url).map_or_else(|_| url.to_owned(), |i| i.to_string());
        self.issues.insert(key, content);
        self
    }

    pub fn with_reachable(mut self, repo: &str) -> Self {
        self.reachable.insert(repo.to_owned());
        self
    }

    pub fn with_failing_create(mut self, repo: &str) -> Self {
        self.failing_creates.insert(repo.to_owned());
        self
    }

    /// Every call made so far.
    pub fn calls(&self) -> Vec<TrackerCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Number of mutating calls made so far.
    pub fn create_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, TrackerCall::Create { .. }))
            .count()
    }

    fn record(&self, call: TrackerCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

impl IssueTracker for StubTracker {
    async fn fetch_issue(&self, issue: &IssueRef) -> Result<IssueContent> {
        let key = issue.to_string();
        self.record(TrackerCall::FetchIssue(key.clone()));
        self.issues
            .get(&key)
            .cloned()
            .ok_or_else(|| anyhow!("stub: no issue {key}"))
    }

    async fn probe_repo(&self, repo: &RepoUrl) -> Result<()> {
        let key = repo.to_string();
        self.record(TrackerCall::Probe(key.clone()));
        if self.reachable.contains(&key) {
            Ok(())
        } else {
            Err(anyhow!("stub: {key} unreachable"))
        }
    }

    async fn create_issue(&self, repo: &RepoUrl, content: &IssueContent) -> Result<()> {
        let key = repo.to_string();
        self.record(TrackerCall::Create {
            repo: key.clone(),
            title: content.title.clone(),
        });
        if self.failing_creates.contains(&key) {
            Err(anyhow!("stub: create rejected for {key}"))
        } else {
            Ok(())
        }
    }
}
