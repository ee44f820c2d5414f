//! Response DTOs for operations.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use stubsmith_core::SourceCatalogue;

use crate::scaffold::ProjectTemplate;

/// Response from a scan operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResponse {
    /// The scanned file.
    pub path: PathBuf,

    /// What was found in it.
    pub catalogue: SourceCatalogue,
}

/// Response from a test generation operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateTestsResponse {
    /// Where the stub module was written.
    pub output_path: PathBuf,

    /// Catalogue the stubs were generated from.
    pub catalogue: SourceCatalogue,

    /// Size of the written module.
    pub bytes_written: usize,
}

impl GenerateTestsResponse {
    /// Number of placeholder tests emitted, class methods included.
    pub fn test_count(&self) -> usize {
        let method_tests: usize = self
            .catalogue
            .classes
            .iter()
            .map(|c| c.methods.iter().filter(|m| m.is_public()).count())
            .sum();
        self.catalogue.callable_count() + method_tests
    }
}

/// Response from a project initialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitProjectResponse {
    /// The created project directory.
    pub project_dir: PathBuf,

    /// Template it was created from.
    pub template: ProjectTemplate,

    /// Number of files copied.
    pub files_copied: usize,

    /// Commands to run next.
    pub next_steps: Vec<String>,
}

/// A template and whether it can be used.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateInfo {
    pub template: ProjectTemplate,
    /// On-disk location; `None` for the embedded templates.
    pub path: Option<PathBuf>,
    pub available: bool,
}
