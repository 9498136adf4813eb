use std::process::Command;

use anyhow::{Context, Result, bail};

use crate::error::SkpkgError;

/// Resolve the token used for issue creation.
///
/// Priority:
/// 1. `GITHUB_TOKEN` environment variable
/// 2. `GH_TOKEN` environment variable
/// 3. `gh auth token` (gh CLI)
pub fn resolve_token() -> Result<String, SkpkgError> {
    for var in ["GITHUB_TOKEN", "GH_TOKEN"] {
        if let Ok(token) = std::env::var(var)
            && !token.trim().is_empty()
        {
            tracing::debug!("using GitHub token from {var}");
            return Ok(token.trim().to_owned());
        }
    }

    match token_from_gh_cli() {
        Ok(token) => Ok(token),
        Err(e) => {
            tracing::debug!("gh CLI token lookup failed: {e:#}");
            Err(SkpkgError::MissingToken)
        }
    }
}

fn token_from_gh_cli() -> Result<String> {
    let output = Command::new("gh")
        .args(["auth", "token"])
        .output()
        .context("failed to run `gh auth token`")?;

    if !output.status.success() {
        bail!("gh auth token exited with non-zero status");
    }

    let token = String::from_utf8(output.stdout)
        .context("gh auth token produced non-UTF-8 output")?
        .trim()
        .to_owned();

    if token.is_empty() {
        bail!("gh auth token returned empty string");
    }

    Ok(token)
}

/// Login of the authenticated GitHub user, via `gh api user`.
pub fn github_username() -> Result<String, SkpkgError> {
    let failed = |reason: String| SkpkgError::CommandFailed {
        command: "gh api user --jq .login".to_owned(),
        reason: format!(
            "{reason}. Please make sure your local machine is authenticated with GitHub \
             (`gh auth login`)."
        ),
    };
    let output = Command::new("gh")
        .args(["api", "user", "--jq", ".login"])
        .output()
        .map_err(|e| failed(e.to_string()))?;
    if !output.status.success() {
        return Err(failed(
            String::from_utf8_lossy(&output.stderr).trim().to_owned(),
        ));
    }
    let login = String::from_utf8_lossy(&output.stdout).trim().to_owned();
    if login.is_empty() {
        return Err(failed("empty login".to_owned()));
    }
    Ok(login)
}
