//! Configuration management following XDG Base Directory specification.

mod report;
mod signals;

pub use report::ReportConfig;
pub use signals::SignalsConfig;

use anyhow::Context;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Application name for XDG directories.
const APP_NAME: &str = "sigreport";

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Config {
    pub report: ReportConfig,
    pub signals: SignalsConfig,
}

#[cfg(unix)]
impl Config {
    /// Build installation settings from this configuration.
    ///
    /// A relative report path is made absolute here so that a later change
    /// of working directory does not move the report.
    pub fn to_settings(&self) -> anyhow::Result<sigreport_core::Settings> {
        let report_path = std::path::absolute(&self.report.path).with_context(|| {
            format!(
                "Failed to resolve report path: {}",
                self.report.path.display()
            )
        })?;

        Ok(sigreport_core::Settings {
            report_path,
            signals: self.signals.signal_set()?,
            alt_stack_size: self.signals.alt_stack_size(),
        })
    }
}

/// Get the XDG config directory for this application.
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(APP_NAME))
}

/// Get the path to the config file.
pub fn config_file_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join("sigreport.toml"))
}

/// Load configuration from file, or return defaults if not found.
pub fn load_config() -> Config {
    let Some(config_path) = config_file_path() else {
        return Config::default();
    };

    if !config_path.exists() {
        return Config::default();
    }

    load_config_from_path(&config_path)
}

/// Load configuration from a specific path.
pub fn load_config_from_path(path: &Path) -> Config {
    if !path.exists() {
        log::warn!("Config file not found: {:?}", path);
        return Config::default();
    }

    match fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Failed to parse config file {:?}: {}", path, e);
                Config::default()
            }
        },
        Err(e) => {
            log::warn!("Failed to read config file: {}", e);
            Config::default()
        }
    }
}

/// Generate default configuration as a TOML string with comments.
pub fn generate_default_config() -> anyhow::Result<String> {
    let toml_content = toml::to_string_pretty(&Config::default())
        .context("Failed to serialize default config")?;

    let header = r#"# sigreport configuration file
#
# report.path            crash report location (relative to the startup directory)
# signals.monitored      signals that produce a report
# signals.alt_stack      run the handler on a dedicated stack

"#;

    Ok(format!("{}{}", header, toml_content))
}

/// Write a default configuration file.
///
/// Uses `path` when given, otherwise the XDG config location. Returns the
/// path where the config was written.
pub fn init_config(path: Option<&Path>, force: bool) -> anyhow::Result<PathBuf> {
    let config_path = match path {
        Some(path) => path.to_path_buf(),
        None => config_file_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?,
    };

    if config_path.exists() && !force {
        anyhow::bail!(
            "Configuration file already exists at: {}\nUse --force to overwrite.",
            config_path.display()
        );
    }

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(&config_path, generate_default_config()?)?;

    Ok(config_path)
}

/// Render the JSON schema for the configuration file.
pub fn generate_schema() -> anyhow::Result<String> {
    let schema = schemars::schema_for!(Config);
    serde_json::to_string_pretty(&schema).context("Failed to serialize schema")
}
