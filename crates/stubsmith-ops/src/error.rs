//! Error types for the operations layer.

use std::path::PathBuf;
use thiserror::Error;

use crate::scanner::ScanError;

/// Result type for operations.
pub type OpsResult<T> = Result<T, OpsError>;

/// Errors that can occur during operations.
#[derive(Debug, Error)]
pub enum OpsError {
    /// The source file to scan does not exist.
    #[error("Source file '{}' not found", path.display())]
    SourceNotFound { path: PathBuf },

    /// The source file could not be scanned, usually because it is not
    /// valid Python.
    #[error("Error parsing {}: {source}", path.display())]
    Scan {
        path: PathBuf,
        #[source]
        source: ScanError,
    },

    /// Reading, writing or copying a specific file failed.
    #[error("{}: {source}", path.display())]
    FileIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Template id not in the known set.
    #[error("Invalid template: {id}. Available templates: {}", available.join(", "))]
    UnknownTemplate { id: String, available: Vec<String> },

    /// Template id is known but its directory is not on disk.
    #[error("Template not found: {}", path.display())]
    TemplateMissing { path: PathBuf },

    /// The project destination is already taken.
    #[error("Directory already exists: {}", path.display())]
    DestinationExists { path: PathBuf },

    /// The source file stem cannot be used in a Python `import`.
    #[error("Cannot import '{name}' as a Python module; rename the source file")]
    InvalidModuleName { name: String },

    /// Project names must be a single path component.
    #[error("Invalid project name: '{name}'")]
    InvalidProjectName { name: String },

    /// Rendering the test module template failed.
    #[error("Template rendering failed: {0}")]
    Render(#[from] askama::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl OpsError {
    /// Attach a path to an IO failure.
    pub fn file_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileIo {
            path: path.into(),
            source,
        }
    }
}
