//! PyPI JSON API lookups used by the conda-forge update.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::SkpkgError;

pub const PYPI_BASE_URL: &str = "https://pypi.org/pypi";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct ProjectResponse {
    #[serde(default)]
    releases: HashMap<String, Vec<ReleaseFile>>,
}

#[derive(Debug, Deserialize)]
struct ReleaseFile {
    packagetype: String,
    digests: Digests,
}

#[derive(Debug, Deserialize)]
struct Digests {
    sha256: String,
}

/// A stable release together with its sdist checksum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    pub version: String,
    pub sha256: String,
}

// ---------------------------------------------------------------------------
// Version ordering
// ---------------------------------------------------------------------------

const SEPARATORS: [char; 3] = ['.', '-', '_'];

const PRE_TAGS: [&str; 9] = ["a", "b", "c", "rc", "alpha", "beta", "pre", "preview", "dev"];

/// The subset of PEP 440 needed to pick the newest stable release.
///
/// Equality follows the ordering, so `1.0 == 1.0.0`.
#[derive(Debug, Clone)]
pub struct PyVersion {
    epoch: u64,
    release: Vec<u64>,
    post: Option<u64>,
    prerelease: bool,
}

impl PyVersion {
    /// Parse a version string; `None` for anything that is not PEP 440-ish.
    pub fn parse(input: &str) -> Option<Self> {
        let s = input.trim().to_ascii_lowercase();
        let s = s.strip_prefix('v').unwrap_or(&s);
        let (epoch, rest) = match s.split_once('!') {
            Some((e, rest)) => (e.parse().ok()?, rest),
            None => (0, s),
        };

        let split = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let (release_part, suffix) = rest.split_at(split);
        let release: Vec<u64> = release_part
            .trim_end_matches('.')
            .split('.')
            .map(str::parse)
            .collect::<Result<_, _>>()
            .ok()?;

        let mut suffix = suffix.trim_start_matches(SEPARATORS);
        let mut post = None;
        if let Some(rest) = suffix.strip_prefix("post") {
            let rest = rest.trim_start_matches(SEPARATORS);
            let digits = rest
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(rest.len());
            // `1.0.post` is an implicit post0.
            post = Some(if digits == 0 { 0 } else { rest[..digits].parse().ok()? });
            suffix = rest[digits..].trim_start_matches(SEPARATORS);
        }

        // Anything left must be a pre-release or dev tag, e.g. `rc1` or
        // the `.dev0` of `1.0.post1.dev0`.
        let prerelease = !suffix.is_empty();
        if prerelease && !PRE_TAGS.iter().any(|tag| suffix.starts_with(tag)) {
            return None;
        }

        Some(Self {
            epoch,
            release,
            post,
            prerelease,
        })
    }

    pub fn is_prerelease(&self) -> bool {
        self.prerelease
    }

    /// Release segments without trailing zeros, so `1.0` == `1.0.0`.
    fn normalized_release(&self) -> &[u64] {
        let end = self
            .release
            .iter()
            .rposition(|&n| n != 0)
            .map_or(0, |i| i + 1);
        &self.release[..end]
    }
}

impl PartialEq for PyVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PyVersion {}

impl PartialOrd for PyVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PyVersion {
    /// Pre-releases are filtered out before sorting, so they only break ties.
    fn cmp(&self, other: &Self) -> Ordering {
        self.epoch
            .cmp(&other.epoch)
            .then_with(|| self.normalized_release().cmp(other.normalized_release()))
            .then_with(|| other.prerelease.cmp(&self.prerelease))
            .then_with(|| self.post.cmp(&other.post))
    }
}

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

fn http_client() -> Result<reqwest::Client> {
    crate::github::client::install_crypto_provider();
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .context("building HTTP client")
}

async fn fetch_project(base_url: &str, package: &str) -> Result<Option<ProjectResponse>> {
    let url = format!("{}/{package}/json", base_url.trim_end_matches('/'));
    tracing::debug!("GET {url}");
    let response = http_client()?
        .get(&url)
        .send()
        .await
        .with_context(|| format!("requesting {url}"))?;
    if response.status() != reqwest::StatusCode::OK {
        tracing::debug!("{url} answered {}", response.status());
        return Ok(None);
    }
    let project = response
        .json::<ProjectResponse>()
        .await
        .with_context(|| format!("parsing {url}"))?;
    Ok(Some(project))
}

/// Newest stable releases (at most `count`) that ship an sdist, newest first.
pub async fn latest_releases(base_url: &str, package: &str, count: usize) -> Result<Vec<Release>> {
    let project = fetch_project(base_url, package)
        .await?
        .ok_or_else(|| SkpkgError::PackageNotFound {
            name: package.to_owned(),
        })?;
    Ok(stable_releases(project, count))
}

fn stable_releases(project: ProjectResponse, count: usize) -> Vec<Release> {
    let mut versions: Vec<(PyVersion, String, Vec<ReleaseFile>)> = project
        .releases
        .into_iter()
        .filter_map(|(raw, files)| {
            let parsed = PyVersion::parse(&raw)?;
            (!parsed.is_prerelease()).then_some((parsed, raw, files))
        })
        .collect();
    versions.sort_by(|a, b| b.0.cmp(&a.0));

    versions
        .into_iter()
        .take(count)
        .filter_map(|(_, version, files)| {
            let sdist = files.into_iter().find(|f| f.packagetype == "sdist")?;
            Some(Release {
                version,
                sha256: sdist.digests.sha256,
            })
        })
        .collect()
}
