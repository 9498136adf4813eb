use std::collections::{BTreeSet, HashSet};

use crate::broadcast::repo_info::RepoInfo;
use crate::error::SkpkgError;
use crate::url::{RepoUrl, is_github_repo_url};

/// Split a comma-separated selection into trimmed, non-empty names.
pub(crate) fn selection_tokens(selection: &str) -> Vec<&str> {
    selection
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect()
}

/// Expand a selection of group names into a deduplicated set of URLs.
///
/// Every token must be a group name; bare repo names are rejected. URLs that
/// point at `exclude` (the issue's own repository) are dropped, and GitHub
/// URLs spelling the same repository differently collapse to one.
pub fn resolve_targets(
    selection: &str,
    info: &RepoInfo,
    exclude: Option<&RepoUrl>,
) -> Result<BTreeSet<String>, SkpkgError> {
    let tokens = selection_tokens(selection);
    if tokens.is_empty() {
        return Err(SkpkgError::EmptySelection);
    }

    let mut targets = BTreeSet::new();
    for token in tokens {
        let urls = info.group_urls(token).ok_or_else(|| SkpkgError::UnknownTarget {
            token: token.to_owned(),
            known: info.group_names(),
        })?;
        targets.extend(urls.map(str::to_owned));
    }

    Ok(dedup_targets(targets, exclude))
}

/// Drop the source repository and repeated spellings of one GitHub repository.
///
/// Only `https://github.com/<owner>/<repo>` URLs are compared, on their
/// lowercased owner/repo; the first spelling in set order is kept. Anything
/// else is left alone so the broadcaster can report it as non-GitHub.
pub(crate) fn dedup_targets(
    targets: BTreeSet<String>,
    source: Option<&RepoUrl>,
) -> BTreeSet<String> {
    let mut seen = HashSet::new();
    let mut kept = BTreeSet::new();
    for url in targets {
        let repo = if is_github_repo_url(&url) {
            RepoUrl::parse(&url).ok()
        } else {
            None
        };
        if let Some(repo) = repo {
            if source.is_some_and(|s| repo.same_repo(s)) {
                tracing::info!("skipping {url}: it hosts the issue being broadcast");
                continue;
            }
            if !seen.insert(repo.html_url().to_ascii_lowercase()) {
                tracing::info!("skipping {url}: same repository as an earlier target");
                continue;
            }
        }
        kept.insert(url);
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broadcast::repo_info::{GroupsMap, ReposMap};

    fn odd_even() -> RepoInfo {
        let groups: GroupsMap = [
            ("odd".to_owned(), vec!["r1".to_owned(), "r3".to_owned()]),
            ("even".to_owned(), vec!["r2".to_owned(), "r4".to_owned()]),
            ("all".to_owned(), vec!["r1".to_owned(), "r2".to_owned(), "r3".to_owned()]),
        ]
        .into_iter()
        .collect();
        let repos: ReposMap = (1..=4)
            .map(|i| (format!("r{i}"), format!("https://github.com/o/r{i}")))
            .collect();
        RepoInfo::new(groups, repos).unwrap()
    }

    fn set(urls: &[&str]) -> BTreeSet<String> {
        urls.iter().map(|u| (*u).to_owned()).collect()
    }

    #[test]
    fn tokens_are_trimmed_and_empty_ones_dropped() {
        assert_eq!(selection_tokens(" a, ,b ,,"), vec!["a", "b"]);
    }

    #[test]
    fn odd_group_resolves_to_its_repos() {
        let targets = resolve_targets("odd", &odd_even(), None).unwrap();
        assert_eq!(targets, set(&["https://github.com/o/r1", "https://github.com/o/r3"]));
    }

    #[test]
    fn overlapping_groups_are_deduplicated() {
        let targets = resolve_targets("odd, all", &odd_even(), None).unwrap();
        assert_eq!(
            targets,
            set(&[
                "https://github.com/o/r1",
                "https://github.com/o/r2",
                "https://github.com/o/r3",
            ])
        );
    }

    #[test]
    fn bare_repo_name_is_unknown() {
        let err = resolve_targets("odd, r2", &odd_even(), None).unwrap_err();
        match err {
            SkpkgError::UnknownTarget { token, known } => {
                assert_eq!(token, "r2");
                assert_eq!(known, vec!["all", "even", "odd"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_selection_is_rejected() {
        let err = resolve_targets(" , ", &odd_even(), None).unwrap_err();
        assert!(matches!(err, SkpkgError::EmptySelection));
    }

    #[test]
    fn source_repo_is_excluded() {
        let source = RepoUrl::parse("https://github.com/O/R1").unwrap();
        let targets = resolve_targets("odd", &odd_even(), Some(&source)).unwrap();
        assert_eq!(targets, set(&["https://github.com/o/r3"]));
    }

    #[test]
    fn spellings_of_one_repo_collapse() {
        let targets: BTreeSet<String> =
            set(&["https://github.com/o/a", "https://github.com/O/A/", "https://github.com/o/b"]);
        let kept = dedup_targets(targets, None);
        assert_eq!(kept, set(&["https://github.com/O/A/", "https://github.com/o/b"]));
    }

    #[test]
    fn mirror_on_another_host_is_not_the_source() {
        let source = RepoUrl::parse("https://github.com/o/origin").unwrap();
        let targets = set(&["https://gitlab.com/o/origin", "https://github.com/o/origin/"]);
        let kept = dedup_targets(targets, Some(&source));
        assert_eq!(kept, set(&["https://gitlab.com/o/origin"]));
    }
}
