use std::ops::Range;

// Fixed header prefix: a single host-order `u32` payload length.
pub const PAYLOAD_SIZE_RANGE: Range<usize> = 0..4;

// Define the field width explicitly since `PAYLOAD_SIZE_RANGE.len()` isn't `const`
pub const PAYLOAD_SIZE_LEN: usize = PAYLOAD_SIZE_RANGE.end - PAYLOAD_SIZE_RANGE.start;

/// Smallest legal header: just the `payload_size` field.
pub const MIN_HEADER_SIZE: usize = PAYLOAD_SIZE_LEN;

/// Header size used by `Pickle::new()`.
pub const DEFAULT_HEADER_SIZE: usize = MIN_HEADER_SIZE;

/// Every field in the payload starts on a multiple of this many bytes.
/// Variable-length fields are zero-padded up to the next boundary.
pub const FIELD_ALIGNMENT: usize = 4;

/// Minimum allocation unit for payload capacity. Also the largest header
/// size a pickle may declare.
pub const PAYLOAD_UNIT: usize = 64;

/// Once capacity grows past this, it is rounded to whole pages (minus one
/// payload unit so header + capacity stays close to a page multiple).
pub const HEAP_ALIGNMENT: usize = 4096;
