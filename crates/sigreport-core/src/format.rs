//! Signal-safe integer formatting.
//!
//! `core::fmt` is not usable from a signal handler: it may allocate through
//! the writer and is not documented as reentrant. The functions here only
//! touch the caller's stack buffer.

const DIGITS: &[u8; 10] = b"0123456789";

/// Worst-case length of a formatted `i64`, terminator included.
///
/// `i64::MIN` is 19 digits plus a sign, plus one byte for the NUL.
pub const FORMAT_BUFFER_LEN: usize = 21;

/// Format `value` as decimal text into `buf`, NUL-terminated.
///
/// Returns the length of the text, terminator excluded. When `buf` is too
/// small for the whole number, only the least significant digits that fit
/// are kept. Callers are expected to size the buffer for the values they
/// format; [`FORMAT_BUFFER_LEN`] fits every `i64`. Buffers shorter than two
/// bytes cannot hold a digit and its terminator.
pub fn format_integer(value: i64, buf: &mut [u8]) -> usize {
    debug_assert!(buf.len() >= 2, "format buffer must hold a digit and NUL");

    let negative = value < 0;
    let mut magnitude = value.unsigned_abs();
    let reserved = if negative { 2 } else { 1 };
    let limit = buf.len().saturating_sub(reserved);

    // Least significant digit first, flipped below.
    let mut len = 0;
    while len < limit {
        buf[len] = DIGITS[(magnitude % 10) as usize];
        len += 1;
        magnitude /= 10;
        if magnitude == 0 {
            break;
        }
    }

    if negative && len + 1 < buf.len() {
        buf[len] = b'-';
        len += 1;
    }
    if let Some(terminator) = buf.get_mut(len) {
        *terminator = 0;
    }

    buf[..len].reverse();
    len
}

/// Stack buffer large enough for any `i64`.
#[derive(Debug, Clone, Copy)]
pub struct FormatBuffer {
    bytes: [u8; FORMAT_BUFFER_LEN],
}

impl FormatBuffer {
    pub const fn new() -> Self {
        FormatBuffer {
            bytes: [0; FORMAT_BUFFER_LEN],
        }
    }

    /// Format `value` and return its text, terminator excluded.
    pub fn format(&mut self, value: i64) -> &[u8] {
        let len = format_integer(value, &mut self.bytes);
        &self.bytes[..len]
    }
}

impl Default for FormatBuffer {
    fn default() -> Self {
        Self::new()
    }
}
