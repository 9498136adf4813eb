use std::collections::BTreeSet;
use std::io::IsTerminal;

use anyhow::{Result, bail};
use dialoguer::Confirm;

use crate::broadcast::{
    self, BroadcastMode, BroadcastOutcome, fetch_issue, load_candidate_index, load_repo_maps,
    resolve_targets,
};
use crate::config::UserConfig;
use crate::github::GitHubClient;
use crate::github::auth::resolve_token;
use crate::tracker::{GitHubTracker, IssueTracker};

/// Options of the `broadcast` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastArgs {
    pub issue_url: String,
    pub selection: String,
    pub url_to_repo_info: Option<String>,
    pub dry_run: bool,
    /// Resolve names against the merged candidate index instead of the
    /// groups/repos files.
    pub candidates: bool,
    /// Create without asking for each repository.
    pub yes: bool,
}

/// Fetch the issue, resolve targets and fan out through `tracker`.
pub async fn broadcast_with<T, F>(
    tracker: &T,
    args: &BroadcastArgs,
    config: &UserConfig,
    confirm: F,
) -> Result<BroadcastOutcome>
where
    T: IssueTracker,
    F: FnMut(&str) -> bool,
{
    let issue = fetch_issue(tracker, &args.issue_url).await?;

    let targets: BTreeSet<String> = if args.candidates {
        load_candidate_index(config)
            .await?
            .resolve(&args.selection, Some(&issue.source_repo))?
    } else {
        let info = load_repo_maps(args.url_to_repo_info.as_deref(), config)?;
        resolve_targets(&args.selection, &info, Some(&issue.source_repo))?
    };
    tracing::debug!("{} target(s) after excluding {}", targets.len(), issue.source_repo_url());

    let mode = BroadcastMode::from_dry_run(args.dry_run);
    Ok(broadcast::broadcast(tracker, &issue.content, &targets, mode, confirm).await)
}

fn confirm_prompt(url: &str) -> bool {
    Confirm::new()
        .with_prompt(format!("Create the issue in {url}?"))
        .default(false)
        .interact()
        .unwrap_or_else(|e| {
            tracing::warn!("confirmation for {url} failed, skipping it: {e}");
            false
        })
}

/// A live run without `--yes` prompts once per repository on the terminal.
fn ensure_can_confirm(args: &BroadcastArgs, interactive: bool) -> Result<()> {
    if !args.dry_run && !args.yes && !interactive {
        bail!(
            "a live broadcast asks for confirmation on a terminal, but none is attached. \
             Pass --yes to create the issues without prompting."
        );
    }
    Ok(())
}

/// Entry point of `package broadcast`.
pub async fn run(args: &BroadcastArgs, config: &UserConfig) -> Result<()> {
    ensure_can_confirm(args, std::io::stderr().is_terminal())?;
    // Dry runs only read, so a missing token is not fatal there.
    let token = if args.dry_run {
        resolve_token().ok()
    } else {
        Some(resolve_token()?)
    };
    let client = GitHubClient::new(config.github_api_url.as_deref(), token)?;
    let tracker = GitHubTracker::new(client);

    let outcome = if args.yes {
        broadcast_with(&tracker, args, config, |_| true).await?
    } else {
        broadcast_with(&tracker, args, config, confirm_prompt).await?
    };
    print!("{}", outcome.summary());
    Ok(())
}
