//! Installing resolved components into a project
//!
//! This module provides:
//! - File writing with overwrite control (copier)
//! - npm package installation via the detected package manager

pub mod copier;
pub mod package_manager;

use std::path::PathBuf;

pub use copier::{existing_files, install_files, InstallReport};
pub use package_manager::PackageManager;

/// Options for an `add` run
#[derive(Debug, Clone, Default)]
pub struct InstallOptions {
    /// Project root to install into (defaults to the current directory)
    pub cwd: Option<PathBuf>,

    /// Replace files that already exist
    pub overwrite: bool,

    /// Do not run the package manager
    pub skip_install: bool,

    /// Auto-confirm all prompts (non-interactive mode)
    pub yes: bool,

    /// Package manager to use instead of detecting one
    pub package_manager: Option<PackageManager>,
}

impl InstallOptions {
    /// Resolve the target directory, falling back to the current directory
    pub fn target_dir(&self) -> anyhow::Result<PathBuf> {
        match &self.cwd {
            Some(dir) => Ok(dir.clone()),
            None => std::env::current_dir().map_err(Into::into),
        }
    }
}
