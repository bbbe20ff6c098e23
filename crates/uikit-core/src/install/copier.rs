//! Writing resolved component files into a project

use crate::registry::ComponentFile;
use anyhow::{Context, Result};
use std::path::{Component, Path, PathBuf};
use tokio::fs;

/// What happened to each file during an install
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallReport {
    /// Paths written (relative to the target directory)
    pub written: Vec<String>,
    /// Paths left alone because they already existed
    pub skipped: Vec<String>,
}

/// Turn a registry file path into a relative path that stays inside the target
fn relative_install_path(path: &str) -> Result<PathBuf> {
    let relative = Path::new(path);
    if path.is_empty() {
        anyhow::bail!("Component file has an empty path");
    }

    let mut clean = PathBuf::new();
    for part in relative.components() {
        match part {
            Component::Normal(segment) => clean.push(segment),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                anyhow::bail!("Refusing to install outside the project: {}", path)
            }
        }
    }
    Ok(clean)
}

/// Paths among `files` that already exist under `target_dir`
pub async fn existing_files(target_dir: &Path, files: &[ComponentFile]) -> Result<Vec<String>> {
    let mut existing = Vec::new();
    for file in files {
        let target_path = target_dir.join(relative_install_path(&file.path)?);
        if fs::try_exists(&target_path).await.unwrap_or(false) {
            existing.push(file.path.clone());
        }
    }
    Ok(existing)
}

/// Write component files under `target_dir`, creating parent directories.
/// Existing files are skipped unless `overwrite` is set.
pub async fn install_files(
    target_dir: &Path,
    files: &[ComponentFile],
    overwrite: bool,
) -> Result<InstallReport> {
    // Ensure target directory exists
    fs::create_dir_all(target_dir)
        .await
        .with_context(|| format!("Failed to create target directory: {}", target_dir.display()))?;

    let mut report = InstallReport::default();

    for file in files {
        let target_path = target_dir.join(relative_install_path(&file.path)?);

        if !overwrite && fs::try_exists(&target_path).await.unwrap_or(false) {
            tracing::warn!(path = %file.path, "file exists, skipping");
            report.skipped.push(file.path.clone());
            continue;
        }

        if let Some(parent) = target_path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        fs::write(&target_path, &file.content)
            .await
            .with_context(|| format!("Failed to write file: {}", target_path.display()))?;
        tracing::debug!(path = %file.path, file_type = %file.file_type, "wrote file");

        report.written.push(file.path.clone());
    }

    Ok(report)
}
