//! Crash report configuration.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Crash report configuration.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ReportConfig {
    /// Report file location. Relative paths are resolved against the working
    /// directory at startup.
    pub path: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            path: default_report_path(),
        }
    }
}

#[cfg(unix)]
fn default_report_path() -> PathBuf {
    sigreport_core::Settings::default().report_path
}

#[cfg(not(unix))]
fn default_report_path() -> PathBuf {
    PathBuf::new()
}
