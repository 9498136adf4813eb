use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced to the operator with a corrective instruction.
///
/// Per-target broadcast failures are not errors; they are recorded as
/// [`crate::broadcast::TargetOutcome`] values instead.
#[derive(Debug, Error)]
pub enum SkpkgError {
    #[error("malformed URL \"{input}\": expected {expected}")]
    MalformedUrl { input: String, expected: &'static str },

    #[error("invalid issue URL \"{input}\": {hint}")]
    InvalidIssueUrl { input: String, hint: &'static str },

    #[error("issue not found at {url}. Check that the issue exists and is publicly readable.")]
    IssueNotFound { url: String },

    #[error(
        "\"{input}\" is not a GitHub repository URL. \
         Use the form https://github.com/<owner>/<repo> or a local directory path."
    )]
    InvalidRepoInfoUrl { input: String },

    #[error(
        "no groups.(json|yaml|yml) and repos.(json|yaml|yml) pair found in {location}. \
         Add both files at the top level."
    )]
    RepoInfoFilesMissing { location: String },

    #[error("directory {} does not exist", path.display())]
    DirectoryNotFound { path: PathBuf },

    #[error(
        "no repository info found in the current directory and no 'url_to_repo_info' \
         in your user config. Pass --url-to-repo-info or set 'url_to_repo_info' in ~/.skpkgrc."
    )]
    RepoInfoLocationMissing,

    #[error("failed to parse {}: {message}", path.display())]
    RepoInfoParse { path: PathBuf, message: String },

    #[error("failed to clone {url}: {stderr}")]
    CloneFailed { url: String, stderr: String },

    #[error(
        "repo \"{repo}\" is listed in a group but missing from repos file; known repos: {}",
        known.join(", ")
    )]
    DanglingRepoReference { repo: String, known: Vec<String> },

    #[error("unknown target \"{token}\"; known names: {}", known.join(", "))]
    UnknownTarget { token: String, known: Vec<String> },

    #[error("no target names given. Pass a comma-separated list of group names.")]
    EmptySelection,

    #[error(
        "no GitHub token found. Set GITHUB_TOKEN (or GH_TOKEN), \
         or run `gh auth login`."
    )]
    MissingToken,

    #[error("configuration file {} is not found. Please try again after running 'touch {}'.", path.display(), path.display())]
    ConfigNotFound { path: PathBuf },

    #[error("no '{key}' is found in your user config. Please set '{key}' in ~/.skpkgrc.")]
    MissingConfigKey { key: String },

    #[error("news template {} is missing. Add it before adding news items.", path.display())]
    NewsTemplateMissing { path: PathBuf },

    #[error("no feedstocks found in {}. Please ensure *-feedstock directories exist there.", path.display())]
    NoFeedstocks { path: PathBuf },

    #[error("no matching package found for {name} on PyPI. Please check the name at https://pypi.org/project/")]
    PackageNotFound { name: String },

    #[error("`{command}` failed: {reason}")]
    CommandFailed { command: String, reason: String },
}
