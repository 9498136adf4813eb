use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dialoguer::{Select, theme::ColorfulTheme};

use crate::actions::local;
use crate::config::{UserConfig, user_config_path};
use crate::error::SkpkgError;
use crate::github::auth::github_username;
use crate::pypi::{self, PYPI_BASE_URL, Release};

const FEEDSTOCK_SUFFIX: &str = "-feedstock";
const META_YAML: &str = "recipe/meta.yaml";

/// A local clone of a conda-forge feedstock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedstock {
    /// PyPI package name (directory name without `-feedstock`).
    pub package: String,
    pub dir: PathBuf,
}

impl Feedstock {
    pub fn meta_yaml(&self) -> PathBuf {
        self.dir.join(META_YAML)
    }
}

/// `*-feedstock` directories under `root`, sorted by name.
pub fn list_feedstocks(root: &Path) -> Result<Vec<Feedstock>> {
    let entries =
        std::fs::read_dir(root).with_context(|| format!("reading {}", root.display()))?;
    let mut feedstocks = Vec::new();
    for entry in entries {
        let path = entry.with_context(|| format!("listing {}", root.display()))?.path();
        if !path.is_dir() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if let Some(package) = name.strip_suffix(FEEDSTOCK_SUFFIX)
            && !package.is_empty()
        {
            feedstocks.push(Feedstock {
                package: package.to_owned(),
                dir: path.clone(),
            });
        }
    }
    if feedstocks.is_empty() {
        return Err(SkpkgError::NoFeedstocks {
            path: root.to_path_buf(),
        }
        .into());
    }
    feedstocks.sort_by(|a, b| a.package.cmp(&b.package));
    Ok(feedstocks)
}

/// Rewrite the version and checksum lines of a recipe; other lines are kept.
pub fn update_meta_yaml(contents: &str, version: &str, sha256: &str) -> String {
    contents
        .split_inclusive('\n')
        .map(|line| {
            let newline = if line.ends_with('\n') { "\n" } else { "" };
            if line.contains("{%- set version =") {
                format!("{{%- set version = \"{version}\" -%}}{newline}")
            } else if line.contains("{% set version =") {
                format!("{{% set version = \"{version}\" %}}{newline}")
            } else if let Some(idx) = line.find("sha256:") {
                format!("{}sha256: {sha256}{newline}", &line[..idx])
            } else {
                line.to_owned()
            }
        })
        .collect()
}

/// One step of the release pull request flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseStep {
    Run { program: &'static str, args: Vec<String> },
    RewriteRecipe,
}

fn git(args: &[&str]) -> ReleaseStep {
    ReleaseStep::Run {
        program: "git",
        args: args.iter().map(|s| (*s).to_owned()).collect(),
    }
}

fn gh(args: &[&str]) -> ReleaseStep {
    ReleaseStep::Run {
        program: "gh",
        args: args.iter().map(|s| (*s).to_owned()).collect(),
    }
}

/// Steps that branch off `main`, bump the recipe and open a PR from
/// `<username>:<version>` against the conda-forge feedstock.
pub fn release_steps(package: &str, version: &str, username: &str) -> Vec<ReleaseStep> {
    vec![
        git(&["stash"]),
        git(&["checkout", "main"]),
        git(&["pull", "upstream", "main"]),
        git(&["checkout", "-b", version]),
        ReleaseStep::RewriteRecipe,
        git(&["add", META_YAML]),
        git(&["commit", "-m", &format!("release: update to {version}")]),
        git(&["push", "origin", version]),
        gh(&["repo", "set-default", &format!("conda-forge/{package}{FEEDSTOCK_SUFFIX}")]),
        gh(&[
            "pr",
            "create",
            "--base",
            "main",
            "--head",
            &format!("{username}:{version}"),
            "--title",
            &format!("Release {version}"),
        ]),
    ]
}

fn rewrite_recipe(feedstock: &Feedstock, release: &Release) -> Result<()> {
    let path = feedstock.meta_yaml();
    let contents =
        std::fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
    std::fs::write(&path, update_meta_yaml(&contents, &release.version, &release.sha256))
        .with_context(|| format!("writing {}", path.display()))?;
    tracing::debug!("updated {} to {}", path.display(), release.version);
    Ok(())
}

fn execute(feedstock: &Feedstock, release: &Release, username: &str) -> Result<()> {
    for step in release_steps(&feedstock.package, &release.version, username) {
        match step {
            ReleaseStep::Run { program, args } => {
                let args: Vec<&str> = args.iter().map(String::as_str).collect();
                local::run(
                    program,
                    &args,
                    Some(&feedstock.dir),
                    "Check the feedstock's git remotes (origin and upstream) and `gh auth status`.",
                )?;
            }
            ReleaseStep::RewriteRecipe => rewrite_recipe(feedstock, release)?,
        }
    }
    Ok(())
}

/// Offer every local feedstock with its newest PyPI release, then open a
/// release PR for the one the operator picks.
pub async fn run(config: &UserConfig) -> Result<()> {
    let root = config.feedstock_path(&user_config_path())?;
    let feedstocks = list_feedstocks(root)?;

    let mut candidates = Vec::with_capacity(feedstocks.len());
    for feedstock in feedstocks {
        let release = pypi::latest_releases(PYPI_BASE_URL, &feedstock.package, 1)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| SkpkgError::PackageNotFound {
                name: feedstock.package.clone(),
            })?;
        candidates.push((feedstock, release));
    }

    let labels: Vec<String> = candidates
        .iter()
        .map(|(f, r)| {
            let short: String = r.sha256.chars().take(5).collect();
            format!("{}, {}, SHA256: {short}..", f.package, r.version)
        })
        .collect();
    let choice = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Feedstock to update")
        .items(&labels)
        .default(0)
        .interact()?;
    let (feedstock, release) = &candidates[choice];

    let username = github_username()?;
    execute(feedstock, release, &username)?;
    println!(
        "Opened a pull request updating {} to {}.",
        feedstock.package, release.version
    );
    Ok(())
}
