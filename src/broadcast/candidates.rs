use std::collections::BTreeSet;
use std::time::Duration;

use anyhow::{Context, Result};
use indexmap::IndexMap;

use crate::broadcast::resolve::{dedup_targets, selection_tokens};
use crate::config::{NestedCandidates, UserConfig};
use crate::error::SkpkgError;
use crate::url::RepoUrl;

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Name → URLs index built from nested group/repo candidates.
///
/// Group names map to every URL in the group; repo names map to their own
/// URL, so both can be selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateIndex {
    entries: IndexMap<String, Vec<String>>,
}

impl CandidateIndex {
    /// Within one source a group name wins over an equally named repo.
    pub fn from_nested(nested: &NestedCandidates) -> Self {
        let mut entries: IndexMap<String, Vec<String>> = IndexMap::new();
        for (group, repos) in nested {
            entries.insert(group.clone(), repos.values().cloned().collect());
        }
        for (name, url) in nested.values().flatten() {
            entries
                .entry(name.clone())
                .or_insert_with(|| vec![url.clone()]);
        }
        Self { entries }
    }

    /// Merge two sources; `primary` wins on key collision.
    ///
    /// An absent source is logged and otherwise ignored.
    pub fn merge(primary: Option<Self>, secondary: Option<Self>) -> Self {
        if primary.is_none() {
            tracing::warn!("no remote broadcast candidate database configured");
        }
        if secondary.is_none() {
            tracing::warn!("no broadcast_target_candidates in user config");
        }
        let mut merged = primary.unwrap_or_default();
        for (name, urls) in secondary.unwrap_or_default().entries {
            merged.entries.entry(name).or_insert(urls);
        }
        merged
    }

    /// Known names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve group and bare repo names into a deduplicated URL set.
    pub fn resolve(
        &self,
        selection: &str,
        exclude: Option<&RepoUrl>,
    ) -> Result<BTreeSet<String>, SkpkgError> {
        let tokens = selection_tokens(selection);
        if tokens.is_empty() {
            return Err(SkpkgError::EmptySelection);
        }
        let mut targets = BTreeSet::new();
        for token in tokens {
            let urls = self
                .entries
                .get(token)
                .ok_or_else(|| SkpkgError::UnknownTarget {
                    token: token.to_owned(),
                    known: self.names(),
                })?;
            targets.extend(urls.iter().cloned());
        }
        Ok(dedup_targets(targets, exclude))
    }
}

/// Download the candidate database at `url` (a JSON document).
pub async fn fetch_remote_candidates(url: &str) -> Result<NestedCandidates> {
    crate::github::client::install_crypto_provider();
    let client = reqwest::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .context("building HTTP client")?;
    let candidates = client
        .get(url)
        .send()
        .await
        .and_then(reqwest::Response::error_for_status)
        .with_context(|| format!("downloading broadcast candidates from {url}"))?
        .json::<NestedCandidates>()
        .await
        .with_context(|| format!("parsing broadcast candidates from {url}"))?;
    Ok(candidates)
}

/// Build the merged index from the remote database and the user config.
pub async fn load_candidate_index(config: &UserConfig) -> Result<CandidateIndex> {
    let remote = match config
        .broadcast_target_candidates_repo_url
        .as_deref()
        .filter(|u| !u.trim().is_empty())
    {
        Some(url) => Some(CandidateIndex::from_nested(
            &fetch_remote_candidates(url).await?,
        )),
        None => None,
    };
    let local = config
        .broadcast_target_candidates
        .as_ref()
        .map(CandidateIndex::from_nested);
    Ok(CandidateIndex::merge(remote, local))
}
