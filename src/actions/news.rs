use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::error::SkpkgError;

pub const NEWS_DIR: &str = "news";
pub const TEMPLATE_FILE: &str = "TEMPLATE.rst";

const PLACEHOLDER: &str = "* <news item>";

/// Changelog section a news item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewsKind {
    Added,
    Changed,
    Deprecated,
    Removed,
    Fixed,
    Security,
}

impl NewsKind {
    pub fn header(self) -> &'static str {
        match self {
            Self::Added => "**Added:**",
            Self::Changed => "**Changed:**",
            Self::Deprecated => "**Deprecated:**",
            Self::Removed => "**Removed:**",
            Self::Fixed => "**Fixed:**",
            Self::Security => "**Security:**",
        }
    }
}

/// What to write into the branch's news file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewsEntry {
    Item { kind: NewsKind, message: String },
    /// Explains why the change needs no news item.
    NoNews { message: String },
}

/// Insert `message` directly below `kind`'s header, above earlier items.
///
/// Blank lines and the template placeholder following the header are
/// consumed; a blank line is kept before the next header.
pub fn insert_news_item(lines: &[String], kind: NewsKind, message: &str) -> Vec<String> {
    let header = kind.header();
    let mut out = Vec::with_capacity(lines.len() + 3);
    let mut i = 0;
    while i < lines.len() {
        out.push(lines[i].clone());
        if lines[i].trim() == header {
            let mut j = i + 1;
            while j < lines.len() && matches!(lines[j].trim(), "" | PLACEHOLDER) {
                j += 1;
            }
            out.push("\n".to_owned());
            out.push(format!("* {message}\n"));
            if j >= lines.len() || lines[j].trim().starts_with("**") {
                out.push("\n".to_owned());
            }
            i = j;
            continue;
        }
        i += 1;
    }
    out
}

/// Replace the first placeholder with a "no news" explanation.
pub fn insert_no_news_item(lines: &[String], message: &str) -> Vec<String> {
    let mut replaced = false;
    lines
        .iter()
        .map(|line| {
            if !replaced && line.trim() == PLACEHOLDER {
                replaced = true;
                format!("* No news added: {message}\n")
            } else {
                line.clone()
            }
        })
        .collect()
}

/// Branch names may contain `/`; news files live flat in `news/`.
fn news_file_name(branch: &str) -> String {
    format!("{}.rst", branch.replace('/', "-").trim_matches('-'))
}

/// Append `entry` to `news/<branch>.rst` under `root`, creating the file from
/// the template when needed. Returns the path written.
pub fn add_news(root: &Path, branch: &str, entry: &NewsEntry) -> Result<PathBuf> {
    let news_dir = root.join(NEWS_DIR);
    let path = news_dir.join(news_file_name(branch));
    if !path.exists() {
        let template = news_dir.join(TEMPLATE_FILE);
        if !template.is_file() {
            return Err(SkpkgError::NewsTemplateMissing { path: template }.into());
        }
        std::fs::copy(&template, &path)
            .with_context(|| format!("copying {} to {}", template.display(), path.display()))?;
    }

    let contents =
        std::fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
    let lines: Vec<String> = contents.split_inclusive('\n').map(str::to_owned).collect();
    let updated = match entry {
        NewsEntry::Item { kind, message } => insert_news_item(&lines, *kind, message),
        NewsEntry::NoNews { message } => insert_no_news_item(&lines, message),
    };
    std::fs::write(&path, updated.concat())
        .with_context(|| format!("writing {}", path.display()))?;
    tracing::debug!("updated {}", path.display());
    Ok(path)
}
