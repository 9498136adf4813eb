use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::de::DeserializeOwned;

use crate::config::UserConfig;
use crate::error::SkpkgError;
use crate::git;
use crate::url::is_github_repo_url;

/// Group name → repo names.
pub type GroupsMap = IndexMap<String, Vec<String>>;

/// Repo name → repository URL.
pub type ReposMap = IndexMap<String, String>;

const GROUPS_STEM: &str = "groups";
const REPOS_STEM: &str = "repos";

/// Tried in this order for each of the two files.
const EXTENSIONS: [&str; 3] = ["json", "yaml", "yml"];

/// Validated groups/repos pair.
///
/// Every repo name listed in a group is guaranteed to be a key of the repos
/// map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoInfo {
    groups: GroupsMap,
    repos: ReposMap,
}

impl RepoInfo {
    pub fn new(groups: GroupsMap, repos: ReposMap) -> Result<Self, SkpkgError> {
        let dangling = groups
            .values()
            .flatten()
            .find(|name| !repos.contains_key(name.as_str()));
        if let Some(repo) = dangling {
            let mut known: Vec<String> = repos.keys().cloned().collect();
            known.sort();
            return Err(SkpkgError::DanglingRepoReference {
                repo: repo.clone(),
                known,
            });
        }
        Ok(Self { groups, repos })
    }

    pub fn groups(&self) -> &GroupsMap {
        &self.groups
    }

    pub fn repos(&self) -> &ReposMap {
        &self.repos
    }

    /// Group names, sorted, for error messages.
    pub fn group_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.groups.keys().cloned().collect();
        names.sort();
        names
    }

    /// URLs of every repo in `group`, in file order.
    pub fn group_urls(&self, group: &str) -> Option<impl Iterator<Item = &str>> {
        let members = self.groups.get(group)?;
        Some(
            members
                .iter()
                .filter_map(|name| self.repos.get(name).map(String::as_str)),
        )
    }
}

/// Load and validate the groups/repos pair.
///
/// Resolution:
/// 1. `location` is an `http(s)://` URL: it must be a GitHub repository URL;
///    the repository is shallow-cloned to a scratch directory and searched.
/// 2. `location` is any other non-empty string: a local directory.
/// 3. `location` is absent: the current working directory, then the
///    `url_to_repo_info` entry of the user config.
pub fn load_repo_maps(location: Option<&str>, config: &UserConfig) -> Result<RepoInfo, SkpkgError> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    load_repo_maps_in(location, config, &cwd)
}

/// `load_repo_maps` with an explicit working directory.
pub fn load_repo_maps_in(
    location: Option<&str>,
    config: &UserConfig,
    cwd: &Path,
) -> Result<RepoInfo, SkpkgError> {
    let location = location.map(str::trim).filter(|s| !s.is_empty());

    let Some(location) = location else {
        if let Some(files) = find_file_pair(cwd) {
            tracing::debug!("using repo info from {}", cwd.display());
            return files.load();
        }
        let Some(fallback) = config.repo_info_location() else {
            return Err(SkpkgError::RepoInfoLocationMissing);
        };
        tracing::debug!("using url_to_repo_info from user config: {fallback}");
        return load_repo_maps_in(Some(fallback), config, cwd);
    };

    if location.starts_with("https://") || location.starts_with("http://") {
        return load_from_remote(location);
    }

    let dir = crate::config::loader::expand_tilde(location);
    let dir = if dir.is_relative() { cwd.join(dir) } else { dir };
    load_from_dir(&dir)
}

/// Load the pair from a local directory.
pub fn load_from_dir(dir: &Path) -> Result<RepoInfo, SkpkgError> {
    if !dir.is_dir() {
        return Err(SkpkgError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }
    find_file_pair(dir)
        .ok_or_else(|| SkpkgError::RepoInfoFilesMissing {
            location: dir.display().to_string(),
        })?
        .load()
}

fn load_from_remote(url: &str) -> Result<RepoInfo, SkpkgError> {
    if !is_github_repo_url(url) {
        return Err(SkpkgError::InvalidRepoInfoUrl {
            input: url.to_owned(),
        });
    }
    let scratch = tempfile::tempdir().map_err(|e| SkpkgError::CloneFailed {
        url: url.to_owned(),
        stderr: format!("cannot create scratch directory: {e}"),
    })?;
    let checkout = scratch.path().join("repo-info");
    git::clone_shallow(url, &checkout)?;

    // `scratch` is removed on drop, after the files have been parsed.
    find_file_pair(&checkout)
        .ok_or_else(|| SkpkgError::RepoInfoFilesMissing {
            location: url.to_owned(),
        })?
        .load()
}

struct FilePair {
    groups: PathBuf,
    repos: PathBuf,
}

impl FilePair {
    fn load(&self) -> Result<RepoInfo, SkpkgError> {
        let groups: GroupsMap = parse_file(&self.groups)?;
        let repos: ReposMap = parse_file(&self.repos)?;
        RepoInfo::new(groups, repos)
    }
}

/// Each file is located independently, so mixed encodings are fine.
fn find_file_pair(dir: &Path) -> Option<FilePair> {
    Some(FilePair {
        groups: find_file(dir, GROUPS_STEM)?,
        repos: find_file(dir, REPOS_STEM)?,
    })
}

fn find_file(dir: &Path, stem: &str) -> Option<PathBuf> {
    EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{stem}.{ext}")))
        .find(|path| path.is_file())
}

fn parse_file<T: DeserializeOwned>(path: &Path) -> Result<T, SkpkgError> {
    let parse_err = |message: String| SkpkgError::RepoInfoParse {
        path: path.to_path_buf(),
        message,
    };
    let contents = std::fs::read_to_string(path).map_err(|e| parse_err(e.to_string()))?;
    let is_json = path.extension().is_some_and(|ext| ext == "json");
    if is_json {
        serde_json::from_str(&contents).map_err(|e| parse_err(e.to_string()))
    } else {
        serde_yaml::from_str(&contents).map_err(|e| parse_err(e.to_string()))
    }
}
