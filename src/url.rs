use std::fmt;

use crate::error::SkpkgError;

/// Prefix every broadcastable repository URL must start with.
pub const GITHUB_PREFIX: &str = "https://github.com/";

const REPO_URL_FORMAT: &str = "https://<host>/<owner>/<repo>";
const ISSUE_URL_FORMAT: &str = "https://<host>/<owner>/<repo>/issues/<number>";

/// A validated reference to a hosted repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoUrl {
    pub owner: String,
    pub repo: String,
}

/// A validated reference to a single issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueRef {
    pub repo: RepoUrl,
    pub number: u64,
}

/// Split a URL into its path segments.
///
/// Accepts both `https://` and `http://` schemes. Query strings and fragments
/// are stripped, as are leading and trailing slashes. Returns `None` when the
/// URL has no scheme or no host.
fn path_segments(url: &str) -> Option<Vec<&str>> {
    let after_scheme = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))?;

    let (host, path) = after_scheme.split_once('/').unwrap_or((after_scheme, ""));
    if host.is_empty() {
        return None;
    }

    let path = path.split_once('?').map_or(path, |(p, _)| p);
    let path = path.split_once('#').map_or(path, |(p, _)| p);
    let path = path.trim_matches('/');
    if path.is_empty() {
        return Some(Vec::new());
    }
    Some(path.split('/').collect())
}

impl RepoUrl {
    /// Parse `https://<host>/<owner>/<repo>[/...]` into owner and repo.
    ///
    /// The host is not checked; a trailing `.git` on the repo is dropped.
    pub fn parse(url: &str) -> Result<Self, SkpkgError> {
        let malformed = || SkpkgError::MalformedUrl {
            input: url.to_owned(),
            expected: REPO_URL_FORMAT,
        };
        let segments = path_segments(url).ok_or_else(malformed)?;
        let (Some(owner), Some(repo)) = (segments.first(), segments.get(1)) else {
            return Err(malformed());
        };
        let repo = repo.strip_suffix(".git").unwrap_or(repo);
        if owner.is_empty() || repo.is_empty() {
            return Err(malformed());
        }
        Ok(Self {
            owner: (*owner).to_owned(),
            repo: repo.to_owned(),
        })
    }

    /// Canonical github.com URL for this repository.
    pub fn html_url(&self) -> String {
        format!("{GITHUB_PREFIX}{}/{}", self.owner, self.repo)
    }

    /// GitHub owner and repository names are case-insensitive.
    pub fn same_repo(&self, other: &RepoUrl) -> bool {
        self.owner.eq_ignore_ascii_case(&other.owner) && self.repo.eq_ignore_ascii_case(&other.repo)
    }
}

impl fmt::Display for RepoUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

impl IssueRef {
    /// Parse `https://<host>/<owner>/<repo>/issues/<number>`.
    pub fn parse(url: &str) -> Result<Self, SkpkgError> {
        let malformed = || SkpkgError::MalformedUrl {
            input: url.to_owned(),
            expected: ISSUE_URL_FORMAT,
        };
        let segments = path_segments(url).ok_or_else(malformed)?;
        if segments.len() < 4 || segments[..4].iter().any(|s| s.is_empty()) {
            return Err(malformed());
        }
        if segments[2] != "issues" {
            return Err(malformed());
        }
        let number = segments[3].parse::<u64>().map_err(|_| malformed())?;
        Ok(Self {
            repo: RepoUrl {
                owner: segments[0].to_owned(),
                repo: segments[1].to_owned(),
            },
            number,
        })
    }
}

impl fmt::Display for IssueRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.repo, self.number)
    }
}

/// Whether `url` is exactly `https://github.com/<owner>/<repo>`.
///
/// A single trailing slash is tolerated. Anything with extra path segments,
/// another host or scheme is rejected.
pub fn is_github_repo_url(url: &str) -> bool {
    let Some(rest) = url.strip_prefix(GITHUB_PREFIX) else {
        return false;
    };
    let rest = rest.strip_suffix('/').unwrap_or(rest);
    let mut parts = rest.split('/');
    matches!(
        (parts.next(), parts.next(), parts.next()),
        (Some(owner), Some(repo), None) if !owner.is_empty() && !repo.is_empty()
    )
}
