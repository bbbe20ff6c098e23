//! uikit Core - component registry library for the `uikit` CLI
//!
//! This library provides the functionality behind adding UI components to a
//! project: a registry of component sources, transitive dependency
//! resolution, and installation of files and npm packages.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Registry** - Loading, validating and caching the registry; dependency
//!   resolution; a standalone validator for CI
//! - **Layer 2: Installation** - Writing resolved files and running the package manager
//! - **Layer 3: CLI/TUI Interface** - Optional cliclack-based prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based TUI prompts module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use uikit_core::{ComponentResolver, RegistryLoader};
//!
//! let resolver = ComponentResolver::new(RegistryLoader::bundled());
//! let deps = resolver.get_component_dependencies("form").await?;
//! let files = resolver.get_all_component_files("form").await?;
//! ```

pub mod error;
pub mod install;
pub mod registry;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use error::RegistryError;
pub use install::{install_files, InstallOptions, InstallReport, PackageManager};
pub use registry::{
    ComponentFile, ComponentResolver, Registry, RegistryComponent, RegistryLoader,
    RegistrySource,
};

#[cfg(feature = "tui")]
pub use tui::run;
