//! Crash report file writer.
//!
//! Everything in this module runs inside the signal handler. It is limited to
//! `open`, `write`, `close` and `clock_gettime`, all async-signal-safe, and
//! never allocates. Failures are dropped on the floor: there is nowhere safe
//! to report them, and the process is about to die anyway.
//!
//! The record looks like this (timestamp omitted when the clock query fails):
//!
//! ```text
//! crash_report:
//! 1700000000.123456789 signal 15
//!
//! ```

use crate::format::FormatBuffer;
use std::ffi::CStr;
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd};

/// Report location used when the host does not configure one.
///
/// Relative, so it lands in the working directory of the crashing process.
pub const DEFAULT_REPORT_PATH: &CStr = c"crash_report.txt";

/// rw-rw-r--, before umask.
const REPORT_MODE: libc::mode_t =
    libc::S_IRUSR | libc::S_IWUSR | libc::S_IRGRP | libc::S_IWGRP | libc::S_IROTH;

const HEADER: &[u8] = b"crash_report:\n";

/// Write a crash report for `signum` to `path`, truncating any previous one.
///
/// Best effort: if the file cannot be opened nothing is written, and short
/// writes are not retried.
pub fn write_crash_report(path: &CStr, signum: libc::c_int) {
    let Some(file) = ReportFile::create(path) else {
        return;
    };

    file.write_bytes(HEADER);
    if let Some((secs, nanos)) = wall_clock() {
        file.write_int(secs);
        file.write_bytes(b".");
        file.write_int(nanos);
        file.write_bytes(b" ");
    }
    file.write_bytes(b"signal ");
    file.write_int(i64::from(signum));
    file.write_bytes(b"\n\n");
}

/// Open report descriptor; closed on drop.
struct ReportFile {
    fd: OwnedFd,
}

impl ReportFile {
    fn create(path: &CStr) -> Option<Self> {
        // SAFETY: `path` is NUL-terminated and outlives the call.
        let fd = unsafe {
            libc::open(
                path.as_ptr(),
                libc::O_WRONLY | libc::O_CREAT | libc::O_TRUNC | libc::O_CLOEXEC,
                libc::c_uint::from(REPORT_MODE),
            )
        };
        if fd < 0 {
            return None;
        }
        // SAFETY: `open` just returned this descriptor and nothing else owns it.
        let fd = unsafe { OwnedFd::from_raw_fd(fd) };
        Some(ReportFile { fd })
    }

    fn write_bytes(&self, bytes: &[u8]) {
        // Short writes and errors are ignored on purpose; looping here could
        // spin inside the handler.
        // SAFETY: the pointer and length come from a live slice.
        let _ = unsafe {
            libc::write(
                self.fd.as_raw_fd(),
                bytes.as_ptr().cast::<libc::c_void>(),
                bytes.len(),
            )
        };
    }

    fn write_int(&self, value: i64) {
        let mut buf = FormatBuffer::new();
        self.write_bytes(buf.format(value));
    }
}

/// Current `CLOCK_REALTIME` as (seconds, nanoseconds).
fn wall_clock() -> Option<(i64, i64)> {
    // SAFETY: `timespec` is plain old data; all-zero is a valid value.
    let mut now: libc::timespec = unsafe { std::mem::zeroed() };
    // SAFETY: `now` is a valid, writable timespec.
    let res = unsafe { libc::clock_gettime(libc::CLOCK_REALTIME, &mut now) };
    if res != 0 {
        return None;
    }
    Some((i64::from(now.tv_sec), i64::from(now.tv_nsec)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;
    use std::ffi::CString;
    use std::fs;
    use std::os::unix::ffi::OsStrExt;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;
    use tempfile::TempDir;

    fn c_path(path: &Path) -> CString {
        CString::new(path.as_os_str().as_bytes()).unwrap()
    }

    #[test]
    fn test_report_layout() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("crash_report.txt");

        write_crash_report(&c_path(&path), libc::SIGTERM);

        let content = fs::read_to_string(&path).unwrap();
        let layout = Regex::new(r"\Acrash_report:\n\d+\.\d+ signal 15\n\n\z").unwrap();
        assert!(layout.is_match(&content), "unexpected report: {:?}", content);
    }

    #[test]
    fn test_timestamp_is_current() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("crash_report.txt");
        let before = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_secs();

        write_crash_report(&c_path(&path), libc::SIGSEGV);

        let content = fs::read_to_string(&path).unwrap();
        let stamp = Regex::new(r"(\d+)\.(\d+) signal 11").unwrap();
        let caps = stamp.captures(&content).expect("timestamp present");
        let secs: u64 = caps[1].parse().unwrap();
        let nanos: u64 = caps[2].parse().unwrap();
        assert!(secs >= before && secs <= before + 60);
        assert!(nanos < 1_000_000_000);
    }

    #[test]
    fn test_truncates_previous_report() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("crash_report.txt");
        fs::write(&path, "x".repeat(4096)).unwrap();

        write_crash_report(&c_path(&path), libc::SIGHUP);

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("crash_report:\n"));
        assert!(content.ends_with("signal 1\n\n"));
        assert!(!content.contains('x'));
    }

    #[test]
    fn test_file_mode() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("crash_report.txt");

        write_crash_report(&c_path(&path), libc::SIGABRT);

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode & 0o600, 0o600, "owner can read and write: {:o}", mode);
        assert_eq!(mode & 0o111, 0, "never executable: {:o}", mode);
        assert_eq!(mode & 0o002, 0, "others cannot write: {:o}", mode);
    }

    #[test]
    fn test_missing_directory_is_silent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("crash_report.txt");

        write_crash_report(&c_path(&path), libc::SIGTERM);

        assert!(!path.exists());
    }

    #[test]
    fn test_unwritable_directory_is_silent() {
        let dir = TempDir::new().unwrap();
        let locked = dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o500)).unwrap();
        let path = locked.join("crash_report.txt");

        write_crash_report(&c_path(&path), libc::SIGTERM);

        // root ignores directory permissions, so only check the no-panic path
        // unless the open was really refused.
        if !path.exists() {
            assert!(fs::read_dir(&locked).unwrap().next().is_none());
        }
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o700)).unwrap();
    }

    #[test]
    fn test_wall_clock() {
        let (secs, nanos) = wall_clock().expect("CLOCK_REALTIME is available");
        assert!(secs > 0);
        assert!((0..1_000_000_000).contains(&nanos));
    }
}
