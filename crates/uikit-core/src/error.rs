//! Typed errors raised while loading the component registry

use std::path::PathBuf;
use thiserror::Error;

/// Failures surfaced by the registry loader.
///
/// The resolver never constructs these itself; it only propagates what the
/// loader returned.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The backing document does not exist
    #[error("Registry not found at {}", .path.display())]
    NotFound { path: PathBuf },

    /// The backing document exists but could not be parsed
    #[error("Failed to parse registry {source_name}: {message}")]
    InvalidFormat { source_name: String, message: String },

    /// The document parsed but failed structural validation
    #[error("Invalid registry: {message}")]
    InvalidProject { message: String },

    /// The document exists but could not be read
    #[error("Failed to read registry {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RegistryError {
    pub(crate) fn invalid_project(message: impl Into<String>) -> Self {
        Self::InvalidProject {
            message: message.into(),
        }
    }

    /// True for structural validation failures
    pub fn is_invalid_project(&self) -> bool {
        matches!(self, Self::InvalidProject { .. })
    }
}

pub type Result<T> = std::result::Result<T, RegistryError>;
