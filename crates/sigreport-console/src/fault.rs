//! Deliberate hardware faults for exercising the crash handler.

use crate::cli::CrashKind;
use std::hint::black_box;

/// Words kept live in every frame of the overflow recursion.
const FRAME_WORDS: usize = 64;

pub fn trigger(kind: CrashKind) {
    match kind {
        CrashKind::Segv => write_null_page(),
        CrashKind::Overflow => {
            black_box(recurse(0, &[0; FRAME_WORDS]));
        }
    }
}

fn write_null_page() {
    // Aligned and non-null, but inside the first page, which is never mapped.
    let target = std::ptr::without_provenance_mut::<u64>(8);
    // SAFETY: none; this write is meant to fault.
    unsafe { target.write_volatile(0xdead) };
}

/// Each call borrows its parent's frame, so the calls cannot be folded into
/// a loop and the stack grows until it hits the guard page.
#[inline(never)]
fn recurse(depth: u64, parent: &[u64; FRAME_WORDS]) -> u64 {
    let frame = black_box([depth; FRAME_WORDS]);
    if black_box(depth) == u64::MAX {
        return parent[0];
    }
    recurse(depth + 1, &frame).wrapping_add(parent[1])
}
