//! Alternate signal stack for the installing thread.
//!
//! A SIGSEGV caused by stack exhaustion cannot run its handler on the same
//! stack. Handlers are registered with `SA_ONSTACK`, which only has an effect
//! once a thread has an alternate stack configured.

use crate::error::{InstallError, InstallResult};
use nix::errno::Errno;
use std::ptr;

/// Size of the alternate stack mapped when the thread has none.
pub const DEFAULT_ALT_STACK_SIZE: usize = 64 * 1024;

/// Make sure the calling thread has an alternate signal stack.
///
/// An existing stack (the Rust runtime sets one up for its own overflow
/// detection) is left alone. Otherwise an anonymous mapping of at least
/// `size` bytes is enabled. The mapping is never released: the thread may
/// take a signal at any point until the process exits.
///
/// Returns whether a new stack was installed.
pub(crate) fn ensure_alt_stack(size: usize) -> InstallResult<bool> {
    // SAFETY: `stack_t` is plain old data; all-zero is a valid value.
    let mut current: libc::stack_t = unsafe { std::mem::zeroed() };
    // SAFETY: a null new stack only queries the current one into `current`.
    if unsafe { libc::sigaltstack(ptr::null(), &mut current) } != 0 {
        return Err(InstallError::AltStack(Errno::last()));
    }
    if current.ss_flags & libc::SS_DISABLE == 0 {
        log::debug!(
            "Alternate signal stack already present ({} bytes)",
            current.ss_size
        );
        return Ok(false);
    }

    let size = size.max(libc::SIGSTKSZ);
    // SAFETY: a fresh private anonymous mapping; MAP_FAILED is checked below.
    let memory = unsafe {
        libc::mmap(
            ptr::null_mut(),
            size,
            libc::PROT_READ | libc::PROT_WRITE,
            libc::MAP_PRIVATE | libc::MAP_ANON,
            -1,
            0,
        )
    };
    if memory == libc::MAP_FAILED {
        return Err(InstallError::AltStack(Errno::last()));
    }

    // SAFETY: `stack_t` is plain old data; all-zero is a valid value.
    let mut stack: libc::stack_t = unsafe { std::mem::zeroed() };
    stack.ss_sp = memory;
    stack.ss_size = size;
    stack.ss_flags = 0;
    // SAFETY: `stack` describes the live mapping created above.
    if unsafe { libc::sigaltstack(&stack, ptr::null_mut()) } != 0 {
        let err = Errno::last();
        // SAFETY: `memory` was returned by mmap with this size.
        unsafe { libc::munmap(memory, size) };
        return Err(InstallError::AltStack(err));
    }

    log::debug!("Installed {} byte alternate signal stack", size);
    Ok(true)
}

/// Whether the calling thread currently has an enabled alternate stack.
pub fn has_alt_stack() -> bool {
    // SAFETY: `stack_t` is plain old data; all-zero is a valid value.
    let mut current: libc::stack_t = unsafe { std::mem::zeroed() };
    // SAFETY: a null new stack only queries the current one into `current`.
    let res = unsafe { libc::sigaltstack(ptr::null(), &mut current) };
    res == 0 && current.ss_flags & libc::SS_DISABLE == 0
}
