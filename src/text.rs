//! Bounded string copy with a guaranteed terminator.
//!
//! For handing text to C-style consumers (fixed-size message fields, device
//! names). Truncation is silent; the achieved length is returned so callers
//! that care can detect it.

/// Terminator byte written after the copied bytes.
pub const TERMINATOR: u8 = 0x00;

/// Copy `source` into `dest`, always leaving `dest` terminated.
///
/// Copies at most `dest.len() - 1` bytes, stopping early at the first
/// terminator in `source` (or at its end), then writes [`TERMINATOR`] right
/// after the copied bytes. Returns the number of bytes copied, which is also
/// the index of the terminator.
///
/// An empty `dest` has no room for a terminator: nothing is written and `0` is
/// returned. Bytes of `dest` past the terminator are left untouched.
///
/// # Example
///
/// ```
/// use fifo_stamp::safe_copy;
///
/// let mut buf = [0xFFu8; 3];
/// assert_eq!(safe_copy(&mut buf, b"HELLO"), 2);
/// assert_eq!(&buf, b"HE\0");
/// ```
pub fn safe_copy(dest: &mut [u8], source: &[u8]) -> usize {
    let Some(max_len) = dest.len().checked_sub(1) else {
        return 0;
    };

    let len = source
        .iter()
        .take(max_len)
        .position(|&b| b == TERMINATOR)
        .unwrap_or_else(|| source.len().min(max_len));

    dest[..len].copy_from_slice(&source[..len]);
    dest[len] = TERMINATOR;
    len
}

/// Copy text into a string of capacity `N`, with the same bound as
/// [`safe_copy`]: at most `N - 1` bytes are kept, and copying stops at an
/// embedded NUL.
///
/// Truncation backs off to the previous character boundary so the result is
/// always valid UTF-8.
pub fn copy_text<const N: usize>(source: &str) -> heapless::String<N> {
    let mut out = heapless::String::new();
    let Some(max_len) = N.checked_sub(1) else {
        return out;
    };

    let mut len = source
        .bytes()
        .take(max_len)
        .position(|b| b == TERMINATOR)
        .unwrap_or_else(|| source.len().min(max_len));

    while !source.is_char_boundary(len) {
        len -= 1;
    }

    // len < N, so the push cannot fail
    let _ = out.push_str(&source[..len]);
    out
}
