//! Handler registration and the signal-context entry point.

use crate::altstack::{DEFAULT_ALT_STACK_SIZE, ensure_alt_stack};
use crate::error::{InstallError, InstallResult};
use crate::guard::ReentryGuard;
use crate::report::{DEFAULT_REPORT_PATH, write_crash_report};
use crate::signals::SignalSet;
use nix::sys::signal::{SaFlags, SigAction, SigHandler, SigSet, sigaction};
use once_cell::sync::OnceCell;
use std::ffi::{CStr, CString, OsStr};
use std::os::unix::ffi::OsStrExt;
use std::path::PathBuf;

/// Armed by the first handler invocation, never reset.
static GUARD: ReentryGuard = ReentryGuard::new();

/// Report path chosen by the first successful install.
static REPORT_PATH: OnceCell<CString> = OnceCell::new();

/// Installation settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Where the crash report is written.
    pub report_path: PathBuf,
    /// Signals the handler is registered for.
    pub signals: SignalSet,
    /// Alternate stack size for the installing thread, or `None` to rely on
    /// whatever stack the thread already has.
    pub alt_stack_size: Option<usize>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            report_path: PathBuf::from(OsStr::from_bytes(DEFAULT_REPORT_PATH.to_bytes())),
            signals: SignalSet::monitored(),
            alt_stack_size: Some(DEFAULT_ALT_STACK_SIZE),
        }
    }
}

/// Install the crash handler with default settings.
///
/// Call this once at startup, after initializing the logger and before doing
/// any other work. Failures are logged rather than returned.
pub fn install() {
    if let Err(e) = try_install(&Settings::default()) {
        log::error!("Failed to install crash handler: {}", e);
    }
}

/// Install the crash handler.
///
/// The report path is fixed by the first successful call; later calls
/// re-register the handler but keep that path. A call that fails leaves the
/// path untouched, and a signal arriving while registration is still in
/// progress reports to the path in effect before the call.
pub fn try_install(settings: &Settings) -> InstallResult<()> {
    let path = CString::new(settings.report_path.as_os_str().as_bytes())
        .map_err(|_| InstallError::InvalidReportPath(settings.report_path.clone()))?;

    if let Some(size) = settings.alt_stack_size {
        ensure_alt_stack(size)?;
    }

    let action = SigAction::new(
        SigHandler::Handler(crash_handler),
        SaFlags::SA_ONSTACK,
        SigSet::empty(),
    );
    for signal in settings.signals.iter() {
        // SAFETY: `crash_handler` only calls async-signal-safe functions.
        unsafe { sigaction(signal, &action) }
            .map_err(|source| InstallError::Register { signal, source })?;
        log::debug!("Registered crash handler for {}", signal);
    }

    set_report_path(path);

    log::info!(
        "Crash handler installed for {} signals, report path {:?}",
        settings.signals.len(),
        report_path()
    );
    Ok(())
}

fn set_report_path(path: CString) {
    if let Err(rejected) = REPORT_PATH.set(path) {
        if REPORT_PATH.get() != Some(&rejected) {
            log::warn!(
                "Crash report path already set to {:?}; ignoring {:?}",
                report_path(),
                rejected
            );
        }
    }
}

/// The path the handler writes to.
pub fn report_path() -> &'static CStr {
    REPORT_PATH
        .get()
        .map_or(DEFAULT_REPORT_PATH, CString::as_c_str)
}

/// Write the report for `signum` unless `guard` is already armed.
///
/// Returns whether this call wrote the report. Safe to call from a signal
/// handler.
pub fn report_once(guard: &ReentryGuard, path: &CStr, signum: libc::c_int) -> bool {
    if !guard.try_arm() {
        return false;
    }
    write_crash_report(path, signum);
    true
}

/// Signal handler entry point.
///
/// Writes the report at most once per process, then hands the signal back to
/// the default disposition. Re-raising rather than calling `_exit` keeps core
/// dumps and a wait status that names the signal.
extern "C" fn crash_handler(signum: libc::c_int) {
    report_once(&GUARD, report_path(), signum);

    // SAFETY: `signal` and `raise` are async-signal-safe. The raised signal
    // stays blocked until this handler returns, then the default action runs.
    unsafe {
        libc::signal(signum, libc::SIG_DFL);
        libc::raise(signum);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn c_path(path: &std::path::Path) -> CString {
        CString::new(path.as_os_str().as_bytes()).unwrap()
    }

    #[test]
    fn test_report_once_writes_first_time_only() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("crash_report.txt");
        let guard = ReentryGuard::new();

        assert!(report_once(&guard, &c_path(&path), libc::SIGTERM));
        let first = fs::read_to_string(&path).unwrap();
        assert!(first.ends_with("signal 15\n\n"));

        fs::remove_file(&path).unwrap();
        assert!(!report_once(&guard, &c_path(&path), libc::SIGHUP));
        assert!(!path.exists(), "second delivery must not touch the file");
    }

    #[test]
    fn test_report_once_arms_guard_even_when_open_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("crash_report.txt");
        let guard = ReentryGuard::new();

        assert!(report_once(&guard, &c_path(&path), libc::SIGSEGV));
        assert!(guard.is_armed());
        assert!(!report_once(&guard, &c_path(&path), libc::SIGSEGV));
    }

    #[test]
    fn test_invalid_report_path() {
        let settings = Settings {
            report_path: PathBuf::from(OsStr::from_bytes(b"bad\0path")),
            signals: SignalSet::empty(),
            alt_stack_size: None,
        };

        let err = try_install(&settings).unwrap_err();
        assert!(matches!(err, InstallError::InvalidReportPath(_)));
    }

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.report_path, PathBuf::from("crash_report.txt"));
        assert_eq!(settings.signals, SignalSet::monitored());
        assert_eq!(settings.alt_stack_size, Some(DEFAULT_ALT_STACK_SIZE));
    }
}
