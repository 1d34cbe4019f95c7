//! One-shot guard against writing more than one crash report.

use std::sync::atomic::{AtomicBool, Ordering};

/// A flag that can be armed exactly once.
///
/// The crash handler keeps a single `static` instance: the first delivery to
/// arm it writes the report, every later delivery (another thread, a second
/// signal, or the re-raise itself) finds it armed and skips straight to the
/// default disposition. It is never reset.
///
/// Arming is a single atomic swap, which is safe to call from a signal
/// handler. A lock would deadlock if the interrupted thread held it.
#[derive(Debug)]
pub struct ReentryGuard {
    armed: AtomicBool,
}

impl ReentryGuard {
    pub const fn new() -> Self {
        ReentryGuard {
            armed: AtomicBool::new(false),
        }
    }

    /// Arm the guard. Returns `true` only for the caller that armed it.
    pub fn try_arm(&self) -> bool {
        !self.armed.swap(true, Ordering::SeqCst)
    }

    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::SeqCst)
    }
}

impl Default for ReentryGuard {
    fn default() -> Self {
        Self::new()
    }
}
