//! Configuration for the operations layer.
//!
//! Precedence, lowest to highest: built-in defaults, the JSON config file in
//! the platform config directory, environment variables (a `.env` file in the
//! working directory is loaded first). Only the file layer is ever saved.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{OpsError, OpsResult};
use crate::scaffold::TemplateSource;

/// Value of `templates-dir` that selects the embedded templates.
const BUNDLED: &str = "bundled";

/// Configuration for stubsmith operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory generated test modules go to when no output path is given.
    #[serde(default = "default_tests_dir")]
    pub tests_dir: PathBuf,

    /// Directory holding one sub-directory per project template. `None`
    /// uses the templates embedded in the binary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub templates_dir: Option<PathBuf>,
}

fn default_tests_dir() -> PathBuf {
    PathBuf::from("tests")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tests_dir: default_tests_dir(),
            templates_dir: None,
        }
    }
}

impl Config {
    /// Load configuration from disk with environment overrides.
    pub fn load() -> OpsResult<Self> {
        // Load .env file if present (silently ignore if missing)
        let _ = dotenvy::dotenv();

        Ok(Self::load_file()?.with_env_overrides())
    }

    /// Load only the saved config file, falling back to defaults.
    ///
    /// Use this when the result will be saved again, so environment
    /// overrides never end up in the file.
    pub fn load_file() -> OpsResult<Self> {
        match Self::config_file_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    fn load_from(path: &Path) -> OpsResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| OpsError::file_io(path, e))?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn with_env_overrides(self) -> Self {
        Self {
            tests_dir: std::env::var("STUBSMITH_TESTS_DIR")
                .map(PathBuf::from)
                .unwrap_or(self.tests_dir),
            templates_dir: std::env::var("STUBSMITH_TEMPLATES_DIR")
                .ok()
                .map(PathBuf::from)
                .or(self.templates_dir),
        }
    }

    /// Save configuration to disk.
    pub fn save(&self) -> OpsResult<()> {
        if let Some(path) = Self::config_file_path() {
            self.save_to(&path)?;
        }
        Ok(())
    }

    fn save_to(&self, path: &Path) -> OpsResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| OpsError::file_io(parent, e))?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents).map_err(|e| OpsError::file_io(path, e))
    }

    /// Where project templates are read from.
    pub fn template_source(&self) -> TemplateSource<'_> {
        match &self.templates_dir {
            Some(dir) => TemplateSource::Directory(dir),
            None => TemplateSource::Bundled,
        }
    }

    /// Get the path to the configuration file.
    pub fn config_file_path() -> Option<PathBuf> {
        ProjectDirs::from("dev", "stubsmith", "stubsmith")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Valid keys for [`Config::get`] and [`Config::set`].
    pub fn keys() -> &'static [&'static str] {
        &["tests-dir", "templates-dir"]
    }

    /// Get a configuration value by key.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "tests-dir" => Some(self.tests_dir.display().to_string()),
            "templates-dir" => Some(self.template_source().to_string()),
            _ => None,
        }
    }

    /// Set a configuration value by key.
    pub fn set(&mut self, key: &str, value: &str) -> OpsResult<()> {
        if value.trim().is_empty() {
            return Err(OpsError::Config(format!("Empty value for {}", key)));
        }
        match key {
            "tests-dir" => self.tests_dir = PathBuf::from(value),
            "templates-dir" if value == BUNDLED => self.templates_dir = None,
            "templates-dir" => self.templates_dir = Some(PathBuf::from(value)),
            _ => {
                return Err(OpsError::Config(format!(
                    "Unknown config key: {}. Valid keys: {}",
                    key,
                    Self::keys().join(", ")
                )));
            }
        }
        Ok(())
    }
}
