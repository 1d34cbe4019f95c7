//! Error types for handler installation.

use nix::errno::Errno;
use nix::sys::signal::Signal;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while installing the crash handler.
///
/// Nothing here is produced from signal context; once the handler runs,
/// failures are silently absorbed.
#[derive(Error, Debug)]
pub enum InstallError {
    /// The report path cannot be passed to `open(2)`.
    #[error("Report path contains a NUL byte: {0}")]
    InvalidReportPath(PathBuf),

    /// Mapping or enabling the alternate signal stack failed.
    #[error("Failed to set up alternate signal stack: {0}")]
    AltStack(#[source] Errno),

    /// `sigaction` refused the handler for a signal.
    #[error("Failed to register crash handler for {signal}: {source}")]
    Register {
        signal: Signal,
        #[source]
        source: Errno,
    },
}

/// Result type for installation.
pub type InstallResult<T> = Result<T, InstallError>;
