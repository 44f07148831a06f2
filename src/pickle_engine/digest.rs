use crc32fast::Hasher as Crc32FastHasher;

/// Computes a CRC32 checksum over a pickle's bytes.
///
/// Purely diagnostic: the wire format carries no checksum, so this is only
/// used to compare pickles by content (e.g. `r-pickle list`).
#[inline]
pub fn compute_checksum(data: &[u8]) -> u32 {
    let mut hasher = Crc32FastHasher::new();
    hasher.update(data);
    hasher.finalize() // Uses SSE4.2 or NEON when available
}
