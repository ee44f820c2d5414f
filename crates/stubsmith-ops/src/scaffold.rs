//! FastAPI project scaffolding.
//!
//! A project template is a directory tree named after its id. The three
//! trees under `assets/templates/` are compiled into the binary; a templates
//! directory on disk can replace them. Initializing a project copies one tree
//! into a new directory and nothing else.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use rust_embed::RustEmbed;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::{OpsError, OpsResult};

/// Project templates compiled into the binary.
#[derive(RustEmbed)]
#[folder = "assets/templates/"]
struct BundledTemplates;

/// Where template trees are read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateSource<'a> {
    /// The trees embedded at build time.
    Bundled,
    /// A directory holding one sub-directory per template id.
    Directory(&'a Path),
}

impl fmt::Display for TemplateSource<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateSource::Bundled => f.write_str("bundled"),
            TemplateSource::Directory(root) => write!(f, "{}", root.display()),
        }
    }
}

/// The bundled project templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectTemplate {
    HelloWorld,
    IntermediateApi,
    ProductionReady,
}

impl ProjectTemplate {
    pub const ALL: [ProjectTemplate; 3] = [
        ProjectTemplate::HelloWorld,
        ProjectTemplate::IntermediateApi,
        ProjectTemplate::ProductionReady,
    ];

    /// Identifier used on the command line and as the directory name.
    pub fn id(&self) -> &'static str {
        match self {
            ProjectTemplate::HelloWorld => "hello-world",
            ProjectTemplate::IntermediateApi => "intermediate-api",
            ProjectTemplate::ProductionReady => "production-ready",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ProjectTemplate::HelloWorld => "Basic FastAPI starter",
            ProjectTemplate::IntermediateApi => "API with database integration",
            ProjectTemplate::ProductionReady => "Full-featured production app",
        }
    }

    /// Location of this template under a templates root.
    pub fn dir(&self, templates_root: &Path) -> PathBuf {
        templates_root.join(self.id())
    }

    /// Whether `source` has a tree for this template.
    pub fn is_available(&self, source: TemplateSource<'_>) -> bool {
        match source {
            TemplateSource::Bundled => {
                let prefix = format!("{}/", self.id());
                BundledTemplates::iter().any(|path| path.starts_with(&prefix))
            }
            TemplateSource::Directory(root) => self.dir(root).is_dir(),
        }
    }

    /// Shell steps to get a freshly created project running.
    pub fn next_steps(&self, project_name: &str) -> Vec<String> {
        let mut steps = vec![
            format!("cd {}", project_name),
            "python -m venv venv".to_string(),
            "source venv/bin/activate  # On Windows: venv\\Scripts\\activate".to_string(),
            "pip install -r requirements.txt".to_string(),
        ];
        if *self == ProjectTemplate::ProductionReady {
            steps.push("cp .env.example .env".to_string());
            steps.push("Edit .env and set your SECRET_KEY".to_string());
        }
        steps.push("fastapi dev main.py".to_string());
        steps
    }
}

impl fmt::Display for ProjectTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ProjectTemplate {
    type Err = OpsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.id() == s)
            .ok_or_else(|| OpsError::UnknownTemplate {
                id: s.to_string(),
                available: Self::ALL.iter().map(|t| t.id().to_string()).collect(),
            })
    }
}

/// Copy `template` from `source` into `parent/project_name`.
///
/// Returns the created directory and the number of files copied. Fails
/// without touching the filesystem if the destination already exists.
pub fn create_project(
    source: TemplateSource<'_>,
    template: ProjectTemplate,
    project_name: &str,
    parent: &Path,
) -> OpsResult<(PathBuf, usize)> {
    validate_project_name(project_name)?;

    if !template.is_available(source) {
        let path = match source {
            TemplateSource::Bundled => PathBuf::from(template.id()),
            TemplateSource::Directory(root) => template.dir(root),
        };
        return Err(OpsError::TemplateMissing { path });
    }

    let destination = parent.join(project_name);
    if destination.exists() {
        return Err(OpsError::DestinationExists { path: destination });
    }

    info!(
        template = %template,
        source = %source,
        destination = %destination.display(),
        "Creating project"
    );
    let copied = match source {
        TemplateSource::Bundled => copy_bundled(template, &destination)?,
        TemplateSource::Directory(root) => copy_tree(&template.dir(root), &destination)?,
    };
    Ok((destination, copied))
}

fn validate_project_name(name: &str) -> OpsResult<()> {
    let invalid = name.trim().is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\']);
    if invalid {
        return Err(OpsError::InvalidProjectName {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Recursively copy `source` into `destination`, which must not exist yet.
fn copy_tree(source: &Path, destination: &Path) -> OpsResult<usize> {
    let mut copied = 0;
    for entry in WalkDir::new(source)
        .into_iter()
        .filter_entry(|e| !is_build_artifact(&e.file_name().to_string_lossy()))
    {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(source).to_path_buf();
            OpsError::file_io(path, e.into())
        })?;

        let relative = entry
            .path()
            .strip_prefix(source)
            .unwrap_or(entry.path());
        let target = destination.join(relative);

        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target).map_err(|e| OpsError::file_io(&target, e))?;
        } else {
            std::fs::copy(entry.path(), &target).map_err(|e| OpsError::file_io(&target, e))?;
            debug!(file = %relative.display(), "Copied");
            copied += 1;
        }
    }
    Ok(copied)
}

/// Write the embedded files of `template` under `destination`.
fn copy_bundled(template: ProjectTemplate, destination: &Path) -> OpsResult<usize> {
    std::fs::create_dir_all(destination).map_err(|e| OpsError::file_io(destination, e))?;

    let prefix = format!("{}/", template.id());
    let mut copied = 0;
    for path in BundledTemplates::iter() {
        let Some(relative) = path.strip_prefix(prefix.as_str()) else {
            continue;
        };
        if relative.split('/').any(is_build_artifact) {
            continue;
        }
        let Some(file) = BundledTemplates::get(&path) else {
            continue;
        };

        let target = destination.join(relative);
        if let Some(dir) = target.parent() {
            std::fs::create_dir_all(dir).map_err(|e| OpsError::file_io(dir, e))?;
        }
        std::fs::write(&target, file.data.as_ref()).map_err(|e| OpsError::file_io(&target, e))?;
        debug!(file = relative, "Copied");
        copied += 1;
    }
    Ok(copied)
}

/// Interpreter cache output.
fn is_build_artifact(name: &str) -> bool {
    name == "__pycache__" || name.ends_with(".pyc")
}
