use std::path::Path;
use std::process::Command;

use crate::error::SkpkgError;

/// Run `program args...` in `cwd`, streaming its output to the terminal.
///
/// A missing binary or a non-zero exit becomes `CommandFailed` carrying
/// `hint` so the operator knows what to fix.
pub fn run(program: &str, args: &[&str], cwd: Option<&Path>, hint: &str) -> Result<(), SkpkgError> {
    let shown = std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ");
    tracing::debug!("running `{shown}`");

    let mut cmd = Command::new(program);
    cmd.args(args);
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }
    let status = cmd.status().map_err(|e| SkpkgError::CommandFailed {
        command: shown.clone(),
        reason: format!("{e}. {hint}"),
    })?;

    if status.success() {
        Ok(())
    } else {
        Err(SkpkgError::CommandFailed {
            command: shown,
            reason: format!("exited with {status}. {hint}"),
        })
    }
}
