//! Component registry: document types, loading, resolution and validation
//!
//! This module provides:
//! - Registry document types (Registry, RegistryComponent, ComponentFile)
//! - A cached loader over a file on disk or the bundled document
//! - Transitive dependency resolution with cycle detection
//! - A standalone validator for CI checks of a registry document

pub mod graph;
pub mod loader;
pub mod resolver;
pub mod schema;
pub mod types;
pub mod validator;

pub use graph::DependencyGraph;
pub use loader::{
    parse_document, registry_from_value, DocumentFormat, RegistryLoader, RegistrySource,
    REGISTRY_ENV,
};
pub use resolver::{
    ComponentResolver, DependencyValidation, Popularity, RegistryStats, Resolution, SearchResult,
};
pub use types::{
    ComponentFile, ComponentMetadata, FileType, PrimaryFile, Registry, RegistryComponent,
    UtilEntry,
};
pub use validator::{
    lint_registry, validate_component_file, validate_component_metadata,
    validate_npm_dependencies, validate_registry, validate_registry_component, LintReport,
    ValidationResult,
};
