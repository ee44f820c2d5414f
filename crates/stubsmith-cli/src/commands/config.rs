//! Config command implementation.
//!
//! Manages CLI configuration.

use anyhow::{Context, Result};
use stubsmith_ops::Config;

/// Show current configuration.
pub fn show(config: &Config) {
    println!("Stubsmith Configuration");
    println!("{:-<40}", "");
    println!("Tests Directory:     {}", config.tests_dir.display());
    println!("Templates:           {}", config.template_source());

    if let Some(config_path) = Config::config_file_path() {
        println!("\nConfig file: {}", config_path.display());
    }
}

/// Set a configuration value.
pub fn set(config: &mut Config, key: &str, value: &str) -> Result<()> {
    config.set(key, value)?;
    config
        .save()
        .with_context(|| format!("Failed to save {}", key))?;
    println!("Set {} to: {}", key, value);
    Ok(())
}

/// Get a configuration value.
pub fn get(config: &Config, key: &str) -> Result<()> {
    let Some(value) = config.get(key) else {
        anyhow::bail!(
            "Unknown config key: {}. Valid keys: {}",
            key,
            Config::keys().join(", ")
        );
    };
    println!("{}", value);
    Ok(())
}

/// Reset configuration to defaults.
pub fn reset() -> Result<()> {
    let config = Config::default();
    config.save()?;
    println!("Configuration reset to defaults");
    Ok(())
}
