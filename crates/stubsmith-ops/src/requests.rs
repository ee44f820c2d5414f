//! Request DTOs for operations.
//!
//! Each request type encapsulates all the parameters needed for an operation,
//! making it easy to call from the CLI or programmatically.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::scaffold::ProjectTemplate;

/// Request to scan one Python source file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanRequest {
    /// File to scan.
    pub source: PathBuf,
}

impl ScanRequest {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

/// Request to generate a pytest stub module for a source file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateTestsRequest {
    /// File to scan.
    pub source: PathBuf,

    /// Where to write the stubs. Defaults to `<tests_dir>/test_<basename>`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,

    /// Emit FastAPI client scaffolding even without detected routes.
    #[serde(default)]
    pub fastapi: bool,
}

impl GenerateTestsRequest {
    /// Create a request for a source file.
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            output: None,
            fastapi: false,
        }
    }

    /// Set the output path.
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    /// Force FastAPI scaffolding.
    pub fn fastapi(mut self) -> Self {
        self.fastapi = true;
        self
    }
}

/// Request to create a project from a template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitProjectRequest {
    /// Name of the new project directory.
    pub name: String,

    /// Template to copy.
    pub template: ProjectTemplate,

    /// Directory the project is created in.
    pub parent: PathBuf,
}

impl InitProjectRequest {
    /// Create a request that initializes `name` in the current directory.
    pub fn new(name: impl Into<String>, template: ProjectTemplate) -> Self {
        Self {
            name: name.into(),
            template,
            parent: PathBuf::from("."),
        }
    }

    /// Create the project under `parent` instead.
    pub fn in_dir(mut self, parent: impl Into<PathBuf>) -> Self {
        self.parent = parent.into();
        self
    }
}
