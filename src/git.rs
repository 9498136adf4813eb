use std::path::Path;
use std::process::Command;

use crate::error::SkpkgError;

/// Name of the branch checked out in `path`.
pub fn current_branch(path: &Path) -> Result<String, SkpkgError> {
    let failed = |reason: String| SkpkgError::CommandFailed {
        command: "git rev-parse --abbrev-ref HEAD".to_owned(),
        reason,
    };
    let output = Command::new("git")
        .args(["rev-parse", "--abbrev-ref", "HEAD"])
        .current_dir(path)
        .output()
        .map_err(|e| failed(format!("{e}. Is git installed?")))?;
    if !output.status.success() {
        return Err(failed(
            String::from_utf8_lossy(&output.stderr).trim().to_owned(),
        ));
    }
    let branch = String::from_utf8_lossy(&output.stdout).trim().to_owned();
    if branch.is_empty() {
        return Err(failed("no branch name reported".to_owned()));
    }
    Ok(branch)
}

/// Shallow-clone `url` into `dest`, which must not exist or be empty.
pub fn clone_shallow(url: &str, dest: &Path) -> Result<(), SkpkgError> {
    tracing::debug!("cloning {url} into {}", dest.display());
    let output = Command::new("git")
        .args(["clone", "--depth", "1", "--quiet", url])
        .arg(dest)
        // Never prompt for credentials; a private repo simply fails.
        .env("GIT_TERMINAL_PROMPT", "0")
        .output()
        .map_err(|e| SkpkgError::CloneFailed {
            url: url.to_owned(),
            stderr: format!("{e}. Is git installed?"),
        })?;
    if !output.status.success() {
        return Err(SkpkgError::CloneFailed {
            url: url.to_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
        });
    }
    Ok(())
}
