use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::SkpkgError;

/// Group name → (repo name → repository URL), as stored under
/// `broadcast_target_candidates`.
pub type NestedCandidates = IndexMap<String, IndexMap<String, String>>;

// ---------------------------------------------------------------------------
// User config (~/.skpkgrc)
// ---------------------------------------------------------------------------

/// Per-user settings, read once per invocation and passed to each command.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    /// URL or directory holding `groups.*` and `repos.*`.
    pub url_to_repo_info: Option<String>,
    pub broadcast_target_candidates: Option<NestedCandidates>,
    /// Raw URL of a JSON document shaped like `broadcast_target_candidates`.
    pub broadcast_target_candidates_repo_url: Option<String>,
    /// Directory containing local `*-feedstock` clones.
    pub feedstock_path: Option<PathBuf>,
    /// REST API base URL; defaults to `https://api.github.com`.
    pub github_api_url: Option<String>,
    /// Everything else (cookiecutter defaults and so on).
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_json::Value>,
    /// File the config was read from, `None` when no file exists.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl UserConfig {
    /// `url_to_repo_info`, ignoring empty strings.
    pub fn repo_info_location(&self) -> Option<&str> {
        self.url_to_repo_info
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// `feedstock_path`, or an error telling the operator how to set it.
    pub fn feedstock_path(&self, expected_file: &Path) -> Result<&Path, SkpkgError> {
        if self.source.is_none() {
            return Err(SkpkgError::ConfigNotFound {
                path: expected_file.to_path_buf(),
            });
        }
        self.feedstock_path
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| SkpkgError::MissingConfigKey {
                key: "feedstock_path".to_owned(),
            })
    }
}

// ---------------------------------------------------------------------------
// Project config (./.skpkgrc)
// ---------------------------------------------------------------------------

/// Per-project cookiecutter overrides.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct ProjectConfig {
    pub values: IndexMap<String, serde_json::Value>,
}

impl ProjectConfig {
    /// Render `key=value` pairs for cookiecutter's extra context.
    ///
    /// Only string values are passed; list-like strings (`[...]`) are left
    /// to the template's own defaults.
    pub fn extra_context(&self) -> Vec<String> {
        self.values
            .iter()
            .filter_map(|(key, value)| {
                let value = value.as_str()?;
                if value.starts_with('[') && value.ends_with(']') {
                    return None;
                }
                Some(format!("{key}={value}"))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_user_config_keys() {
        let json = r#"{
            "url_to_repo_info": "https://github.com/org/repo-info",
            "feedstock_path": "/home/me/feedstocks",
            "broadcast_target_candidates": {
                "group1": {"repo1": "https://github.com/o/repo1"}
            },
            "username": "me"
        }"#;
        let config: UserConfig = serde_json::from_str(json).unwrap();
        assert_eq!(
            config.repo_info_location(),
            Some("https://github.com/org/repo-info")
        );
        assert_eq!(config.feedstock_path, Some(PathBuf::from("/home/me/feedstocks")));
        let candidates = config.broadcast_target_candidates.unwrap();
        assert_eq!(candidates["group1"]["repo1"], "https://github.com/o/repo1");
        assert_eq!(config.extra["username"], "me");
    }

    #[test]
    fn blank_repo_info_location_is_none() {
        let config: UserConfig = serde_json::from_str(r#"{"url_to_repo_info": "  "}"#).unwrap();
        assert_eq!(config.repo_info_location(), None);
    }

    #[test]
    fn feedstock_path_requires_config_file() {
        let config = UserConfig::default();
        let err = config.feedstock_path(Path::new("/h/.skpkgrc")).unwrap_err();
        assert!(matches!(err, SkpkgError::ConfigNotFound { .. }));

        let config = UserConfig {
            source: Some(PathBuf::from("/h/.skpkgrc")),
            ..UserConfig::default()
        };
        let err = config.feedstock_path(Path::new("/h/.skpkgrc")).unwrap_err();
        assert!(matches!(err, SkpkgError::MissingConfigKey { key } if key == "feedstock_path"));
    }

    #[test]
    fn extra_context_skips_lists_and_non_strings() {
        let json = r#"{
            "maintainer_name": "Alice",
            "keywords": "[a, b]",
            "year": 2025
        }"#;
        let config: ProjectConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.extra_context(), vec!["maintainer_name=Alice".to_owned()]);
    }
}
