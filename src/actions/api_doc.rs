use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Output directory, relative to the project root.
pub const API_DIR: &str = "doc/source/api";

const SKIP_DIRS: [&str; 5] = ["tests", "__pycache__", ".mypy_cache", ".pytest_cache", ".git"];
const SKIP_MODULES: [&str; 2] = ["__init__", "version"];

/// Import name and source directory of the package rooted at `project_root`.
///
/// The import name is the directory name; `a.b-c` lives in `src/a/b_c`.
pub fn detect_package(project_root: &Path) -> Result<(String, PathBuf)> {
    let import_name = project_root
        .file_name()
        .context("project root has no directory name")?
        .to_string_lossy()
        .into_owned();
    let module_path = project_root
        .join("src")
        .join(import_name.replace('.', "/").replace('-', "_"));
    Ok((import_name, module_path))
}

fn automodule(name: &str) -> String {
    format!(
        ".. automodule:: {name}\n    :members:\n    :undoc-members:\n    :show-inheritance:\n"
    )
}

/// Sorted directory entries, so regenerated files are stable.
fn sorted_children(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut children = std::fs::read_dir(dir)
        .with_context(|| format!("reading {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()
        .with_context(|| format!("listing {}", dir.display()))?;
    children.sort();
    Ok(children)
}

/// RST page for one package plus the subpackages to recurse into.
pub fn render_package(package_name: &str, package_dir: &Path) -> Result<(String, Vec<(String, PathBuf)>)> {
    let title = format!("{} package", package_name.replace('_', "-"));
    let mut page = format!(
        ":tocdepth: -1\n\n{title}\n{}\n\n{}",
        "=".repeat(format!("{package_name} package").len()),
        automodule(package_name)
    );

    let children = sorted_children(package_dir)?;
    let subpackages: Vec<(String, PathBuf)> = children
        .iter()
        .filter(|p| p.is_dir())
        .filter_map(|p| {
            let name = p.file_name()?.to_string_lossy().into_owned();
            (!SKIP_DIRS.contains(&name.as_str())).then(|| (format!("{package_name}.{name}"), p.clone()))
        })
        .collect();
    let submodules: Vec<String> = children
        .iter()
        .filter(|p| p.is_file() && p.extension().is_some_and(|e| e == "py"))
        .filter_map(|p| {
            let stem = p.file_stem()?.to_string_lossy().into_owned();
            (!SKIP_MODULES.contains(&stem.as_str())).then(|| format!("{package_name}.{stem}"))
        })
        .collect();

    if !subpackages.is_empty() {
        page.push_str("\nSubpackages\n-----------\n\n.. toctree::\n    :titlesonly:\n\n");
        for (name, _) in &subpackages {
            let _ = writeln!(page, "    {name}");
        }
    }
    if !submodules.is_empty() {
        page.push_str("\nSubmodules\n----------\n");
    }
    for module in &submodules {
        let heading = format!("{module} module");
        let _ = write!(
            page,
            "\n{heading}\n{}\n\n{}",
            "^".repeat(heading.len()),
            automodule(module)
        );
    }

    let page = format!("{}\n", page.trim_end());
    Ok((page, subpackages))
}

/// Write `<package>.rst` for the package and every subpackage into `api_dir`.
pub fn generate(package_name: &str, package_dir: &Path, api_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    let mut pending = vec![(package_name.to_owned(), package_dir.to_path_buf())];
    while let Some((name, dir)) = pending.pop() {
        let (page, subpackages) = render_package(&name, &dir)?;
        let file = api_dir.join(format!("{name}.rst"));
        std::fs::write(&file, page).with_context(|| format!("writing {}", file.display()))?;
        written.push(file);
        pending.extend(subpackages.into_iter().rev());
    }
    Ok(written)
}

/// Recreate `doc/source/api` under `project_root` from the package sources.
pub fn build(project_root: &Path) -> Result<Vec<PathBuf>> {
    let (import_name, module_path) = detect_package(project_root)?;
    if !module_path.is_dir() {
        anyhow::bail!(
            "package sources not found at {}. Run this from the project root.",
            module_path.display()
        );
    }
    let api_dir = project_root.join(API_DIR);
    if api_dir.exists() {
        std::fs::remove_dir_all(&api_dir)
            .with_context(|| format!("removing {}", api_dir.display()))?;
    }
    std::fs::create_dir_all(&api_dir).with_context(|| format!("creating {}", api_dir.display()))?;
    generate(&import_name, &module_path, &api_dir)
}
