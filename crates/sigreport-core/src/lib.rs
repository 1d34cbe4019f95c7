//! Async-signal-safe crash reporting for fatal POSIX signals.
//!
//! This crate installs one handler for a set of terminating signals. When one
//! of them fires, the handler writes a small report file (timestamp and signal
//! number), restores the default disposition and re-raises the signal so the
//! process still dies the way it would have without the handler: core dump for
//! fault signals, and a wait status that names the signal.
//!
//! Everything reachable from the handler avoids allocation, locks, and
//! formatted I/O. See [`format`] for the integer formatter that replaces
//! `core::fmt` on that path.

pub mod format;
mod guard;

#[cfg(unix)]
mod altstack;
#[cfg(unix)]
mod dispatch;
#[cfg(unix)]
mod error;
#[cfg(unix)]
pub mod report;
#[cfg(unix)]
mod signals;

pub use format::{FORMAT_BUFFER_LEN, FormatBuffer, format_integer};
pub use guard::ReentryGuard;

#[cfg(unix)]
pub use altstack::{DEFAULT_ALT_STACK_SIZE, has_alt_stack};
#[cfg(unix)]
pub use dispatch::*;
#[cfg(unix)]
pub use error::*;
#[cfg(unix)]
pub use report::DEFAULT_REPORT_PATH;
#[cfg(unix)]
pub use signals::*;
