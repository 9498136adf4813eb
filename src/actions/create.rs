use std::path::Path;

use anyhow::Result;
use clap::ValueEnum;

use crate::actions::local;
use crate::config::{ProjectConfig, UserConfig};

/// Upstream template repository; the other kinds add a suffix.
pub const TEMPLATE_BASE_URL: &str = "https://github.com/scikit-package/scikit-package";

/// Kind of project to scaffold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProjectKind {
    /// Workspace package.
    Workspace,
    /// System package.
    System,
    /// Public package.
    Public,
    /// conda-forge recipe meta.yaml.
    CondaForge,
    /// LaTeX manuscript project.
    Manuscript,
}

impl ProjectKind {
    pub fn template_url(self) -> String {
        let suffix = match self {
            Self::Public => "",
            Self::Workspace => "-workspace",
            Self::System => "-system",
            Self::CondaForge => "-conda-forge",
            Self::Manuscript => "-manuscript",
        };
        format!("{TEMPLATE_BASE_URL}{suffix}")
    }
}

/// Arguments passed to `cookiecutter` after the program name.
pub fn cookiecutter_args(
    kind: ProjectKind,
    project: Option<&ProjectConfig>,
    user: &UserConfig,
) -> Vec<String> {
    let mut args = vec![kind.template_url()];
    if let Some(project) = project {
        args.extend(project.extra_context());
    }
    if let Some(path) = &user.source {
        args.push("--config-file".to_owned());
        args.push(path.display().to_string());
    }
    args
}

/// Materialize a new project in `cwd` from the template for `kind`.
pub fn run(kind: ProjectKind, project: Option<&ProjectConfig>, user: &UserConfig, cwd: &Path) -> Result<()> {
    let args = cookiecutter_args(kind, project, user);
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    local::run(
        "cookiecutter",
        &args,
        Some(cwd),
        "Install cookiecutter with `pip install cookiecutter` and try again.",
    )?;
    Ok(())
}
