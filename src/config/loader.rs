use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::types::{ProjectConfig, UserConfig};

/// File name of both the user-level and the project-level config.
pub const CONFIG_FILE_NAME: &str = ".skpkgrc";

/// Environment variable overriding the user config location.
pub const CONFIG_FILE_ENV: &str = "SKPKG_CONFIG_FILE";

/// Environment variable overriding `github_api_url`.
pub const GITHUB_API_URL_ENV: &str = "SKPKG_GITHUB_API_URL";

/// Where the user config is expected.
///
/// Priority:
/// 1. `$SKPKG_CONFIG_FILE`
/// 2. `~/.skpkgrc`
pub fn user_config_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_FILE_ENV)
        && !path.is_empty()
    {
        return expand_tilde(&path);
    }
    home_dir().map_or_else(
        || PathBuf::from(CONFIG_FILE_NAME),
        |home| home.join(CONFIG_FILE_NAME),
    )
}

/// Discover and load the user config.
///
/// A missing file yields `UserConfig::default()`; commands that need a
/// particular key report the absence themselves.
pub fn load_user_config() -> Result<UserConfig> {
    let path = user_config_path();
    let mut config = if path.is_file() {
        load_user_config_from(&path)?
    } else {
        tracing::debug!("no user config at {}", path.display());
        UserConfig::default()
    };

    if let Ok(api_url) = std::env::var(GITHUB_API_URL_ENV)
        && !api_url.is_empty()
    {
        config.github_api_url = Some(api_url);
    }
    Ok(config)
}

/// Load the user config from an explicit path.
pub fn load_user_config_from(path: &Path) -> Result<UserConfig> {
    let contents =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    // `touch ~/.skpkgrc` is the documented way to create the file.
    let mut config: UserConfig = if contents.trim().is_empty() {
        UserConfig::default()
    } else {
        serde_json::from_str(&contents)
            .with_context(|| format!("parsing JSON from {}", path.display()))?
    };
    config.source = Some(path.to_path_buf());
    Ok(config)
}

/// Load `./.skpkgrc` from `dir`, if present.
pub fn load_project_config(dir: &Path) -> Result<Option<ProjectConfig>> {
    let path = dir.join(CONFIG_FILE_NAME);
    if !path.is_file() {
        return Ok(None);
    }
    let contents =
        std::fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
    let config: ProjectConfig = serde_json::from_str(&contents)
        .with_context(|| format!("parsing JSON from {}", path.display()))?;
    Ok(Some(config))
}

fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(PathBuf::from)
}

/// Expand a leading `~/` against `$HOME`.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(path)
}
