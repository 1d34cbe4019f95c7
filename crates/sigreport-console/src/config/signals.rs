//! Signal handling configuration.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Signal handling configuration.
///
/// Evaluated once before the handler is installed.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SignalsConfig {
    /// Signals that produce a crash report, by name (`SIGTERM`) or number.
    pub monitored: Vec<String>,
    /// Run the handler on a dedicated stack so stack overflows are reported.
    #[serde(default = "default_true")]
    pub alt_stack: bool,
    /// Size of the dedicated stack in bytes.
    pub alt_stack_size: usize,
}

fn default_true() -> bool {
    true
}

impl Default for SignalsConfig {
    fn default() -> Self {
        SignalsConfig {
            monitored: default_monitored(),
            alt_stack: true,
            alt_stack_size: default_alt_stack_size(),
        }
    }
}

#[cfg(unix)]
fn default_monitored() -> Vec<String> {
    sigreport_core::MONITORED_SIGNALS
        .iter()
        .map(|signal| signal.as_str().to_string())
        .collect()
}

#[cfg(not(unix))]
fn default_monitored() -> Vec<String> {
    Vec::new()
}

#[cfg(unix)]
fn default_alt_stack_size() -> usize {
    sigreport_core::DEFAULT_ALT_STACK_SIZE
}

#[cfg(not(unix))]
fn default_alt_stack_size() -> usize {
    64 * 1024
}

#[cfg(unix)]
impl SignalsConfig {
    /// Resolve the configured names into a signal set.
    pub fn signal_set(&self) -> anyhow::Result<sigreport_core::SignalSet> {
        self.monitored
            .iter()
            .map(|name| {
                sigreport_core::parse_signal(name)
                    .ok_or_else(|| anyhow::anyhow!("Unknown signal in signals.monitored: {}", name))
            })
            .collect()
    }

    /// Alternate stack size to request, if enabled.
    pub fn alt_stack_size(&self) -> Option<usize> {
        self.alt_stack.then_some(self.alt_stack_size)
    }
}
