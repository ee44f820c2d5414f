//! OpsContext - The main service for executing operations.
//!
//! The OpsContext holds configuration and provides methods for all stubsmith
//! operations. Every operation is synchronous and touches the filesystem only
//! through the paths in its request.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::Config;
use crate::emit::{is_importable_module, render_test_module, EmitOptions};
use crate::error::{OpsError, OpsResult};
use crate::requests::*;
use crate::responses::*;
use crate::scaffold::{create_project, ProjectTemplate};
use crate::scanner::scan_source;

/// The main operations context.
#[derive(Debug, Clone)]
pub struct OpsContext {
    /// Configuration for operations.
    pub config: Config,
}

impl OpsContext {
    /// Create a new OpsContext with the given configuration.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Create a new OpsContext with the loaded configuration.
    pub fn default_config() -> OpsResult<Self> {
        Ok(Self::new(Config::load()?))
    }

    // =========================================================================
    // Scanning
    // =========================================================================

    /// Read and scan one source file.
    pub fn scan(&self, request: ScanRequest) -> OpsResult<ScanResponse> {
        let source = read_source(&request.source)?;
        let catalogue = scan_source(&source).map_err(|e| OpsError::Scan {
            path: request.source.clone(),
            source: e,
        })?;

        debug!(
            path = %request.source.display(),
            functions = catalogue.functions.len(),
            classes = catalogue.classes.len(),
            routes = catalogue.routes.len(),
            "Scanned source"
        );

        Ok(ScanResponse {
            path: request.source,
            catalogue,
        })
    }

    // =========================================================================
    // Test generation
    // =========================================================================

    /// Scan a source file and write a pytest stub module for it.
    ///
    /// Nothing is written when the source cannot be read or parsed, or when
    /// its file stem is not an importable module name.
    pub fn generate_tests(&self, request: GenerateTestsRequest) -> OpsResult<GenerateTestsResponse> {
        let output_path = request
            .output
            .clone()
            .unwrap_or_else(|| self.default_output_path(&request.source));

        let scanned = self.scan(ScanRequest::new(&request.source))?;

        let module = request
            .source
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "module".to_string());
        if !is_importable_module(&module) {
            return Err(OpsError::InvalidModuleName { name: module });
        }
        let source_name = request
            .source
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| module.clone());
        let options = EmitOptions::new(module, source_name).with_fastapi(request.fastapi);
        let content = render_test_module(&scanned.catalogue, &options)?;

        // Ensure parent directory exists
        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| OpsError::file_io(parent, e))?;
        }
        std::fs::write(&output_path, &content).map_err(|e| OpsError::file_io(&output_path, e))?;

        info!(
            source = %request.source.display(),
            output = %output_path.display(),
            bytes = content.len(),
            "Generated test module"
        );

        Ok(GenerateTestsResponse {
            output_path,
            catalogue: scanned.catalogue,
            bytes_written: content.len(),
        })
    }

    /// `<tests_dir>/test_<basename>`.
    pub fn default_output_path(&self, source: &Path) -> PathBuf {
        let basename = source
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        self.config.tests_dir.join(format!("test_{}", basename))
    }

    // =========================================================================
    // Project scaffolding
    // =========================================================================

    /// Create a new project directory from a template.
    pub fn init_project(&self, request: InitProjectRequest) -> OpsResult<InitProjectResponse> {
        let (project_dir, files_copied) = create_project(
            self.config.template_source(),
            request.template,
            &request.name,
            &request.parent,
        )?;

        Ok(InitProjectResponse {
            project_dir,
            template: request.template,
            files_copied,
            next_steps: request.template.next_steps(&request.name),
        })
    }

    /// List the known templates and whether each is available.
    pub fn templates(&self) -> Vec<TemplateInfo> {
        let source = self.config.template_source();
        ProjectTemplate::ALL
            .iter()
            .map(|&template| TemplateInfo {
                template,
                path: self.config.templates_dir.as_ref().map(|root| template.dir(root)),
                available: template.is_available(source),
            })
            .collect()
    }
}

fn read_source(path: &Path) -> OpsResult<String> {
    if !path.exists() {
        return Err(OpsError::SourceNotFound {
            path: path.to_path_buf(),
        });
    }
    std::fs::read_to_string(path).map_err(|e| OpsError::file_io(path, e))
}
