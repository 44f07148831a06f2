//! Frame-boundary helpers for byte ranges that may hold a partial pickle.
//!
//! These operate on raw bytes without building a `Pickle`, so a transport
//! can decide how much more input it needs before one complete pickle is
//! available.

use crate::constants::MIN_HEADER_SIZE;
use crate::pickle_header::{PickleHeader, is_valid_header_size};

/// Sentinel reported by [`peek_next`] when the declared size cannot be
/// represented. Callers should treat it as "larger than anything we accept".
pub const UNREPRESENTABLE_PICKLE_SIZE: usize = usize::MAX;

/// Adds a header size and a declared payload size, clamping to
/// [`UNREPRESENTABLE_PICKLE_SIZE`] instead of wrapping.
#[inline]
pub fn total_pickle_size(header_size: usize, payload_size: usize) -> usize {
    header_size.saturating_add(payload_size)
}

/// Reports the total size (header + payload) the next pickle in `range`
/// claims to have.
///
/// Only the header has to be present. The payload is not inspected, so a
/// `Some` result does not mean the whole pickle has arrived.
///
/// # Parameters
/// - `header_size`: header size the producer used (4-byte aligned).
/// - `range`: bytes starting at the first byte of the pickle.
///
/// # Returns
/// - `None` if `range` is shorter than `header_size`.
/// - `Some(UNREPRESENTABLE_PICKLE_SIZE)` if the declared size overflows.
/// - `Some(size)` otherwise.
pub fn peek_next(header_size: usize, range: &[u8]) -> Option<usize> {
    debug_assert!(
        is_valid_header_size(header_size),
        "invalid pickle header size {}",
        header_size
    );

    if range.len() < MIN_HEADER_SIZE || range.len() < header_size {
        return None;
    }

    let header = PickleHeader::deserialize(range)?;
    Some(total_pickle_size(header_size, header.payload_size as usize))
}

/// Locates the end of the first complete pickle in `range`.
///
/// # Returns
/// - `Some(end)`: offset one past the last byte of the pickle, relative to
///   the start of `range`.
/// - `None`: the header or payload is incomplete, or the declared size is
///   unrepresentable.
pub fn find_next(header_size: usize, range: &[u8]) -> Option<usize> {
    let pickle_size = peek_next(header_size, range)?;
    if pickle_size > range.len() {
        return None;
    }
    Some(pickle_size)
}

/// Splits `range` into the first complete pickle and whatever follows it.
pub fn split_next(header_size: usize, range: &[u8]) -> Option<(&[u8], &[u8])> {
    let end = find_next(header_size, range)?;
    Some(range.split_at(end))
}
