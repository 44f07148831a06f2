use crate::constants::*;
use bytemuck::{Pod, Zeroable};

/// Fixed prefix shared by every pickle.
///
/// ## Pickle Layout
///
/// - **Offset `0` → `4`**: **Payload Size** (`u32`, host byte order)
/// - **Offset `4` → `H`**: optional caller-defined header bytes
/// - **Offset `H` → `H + payload_size`**: **Payload** (4-byte aligned fields)
///
/// `H` is the header size. It is a multiple of 4, at least
/// [`MIN_HEADER_SIZE`] and at most [`PAYLOAD_UNIT`], and stays fixed for
/// the lifetime of one pickle. It is not itself recorded on the wire:
/// readers either know it out of band or infer it from the total length.
///
/// ## Notes
/// - Values are not byte-swapped. A pickle written on a big-endian host
///   is not readable on a little-endian one.
/// - `payload_size` counts padding bytes too.
/// - The struct is `Pod`, so it can be read straight out of a default-sized
///   pickle with `Pickle::header_as::<PickleHeader>()`. Pickles with extra
///   header bytes need a larger `#[repr(C)]` struct that starts with the same
///   `u32`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Pod, Zeroable)]
pub struct PickleHeader {
    pub payload_size: u32, // 4 bytes (exact payload length, padding included)
}

impl PickleHeader {
    pub fn new(payload_size: u32) -> Self {
        Self { payload_size }
    }

    /// Serializes the fixed part of the header.
    #[inline]
    pub fn serialize(&self) -> [u8; PAYLOAD_SIZE_LEN] {
        let mut buf = [0u8; PAYLOAD_SIZE_LEN];
        buf[PAYLOAD_SIZE_RANGE].copy_from_slice(&self.payload_size.to_ne_bytes());
        buf
    }

    /// Deserializes the fixed part of a header from the front of `data`.
    ///
    /// Returns `None` if `data` is shorter than [`MIN_HEADER_SIZE`].
    #[inline]
    pub fn deserialize(data: &[u8]) -> Option<Self> {
        let raw: [u8; PAYLOAD_SIZE_LEN] = data.get(PAYLOAD_SIZE_RANGE)?.try_into().ok()?;
        Some(Self {
            payload_size: u32::from_ne_bytes(raw),
        })
    }

    /// Writes the fixed part of the header into the front of `dst`.
    ///
    /// # Panics
    /// - If `dst` is shorter than [`MIN_HEADER_SIZE`].
    #[inline]
    pub fn write_into(&self, dst: &mut [u8]) {
        dst[PAYLOAD_SIZE_RANGE].copy_from_slice(&self.serialize());
    }
}

/// Validates a caller-supplied header size.
///
/// A header size is usable if it is 4-byte aligned and lies within
/// `MIN_HEADER_SIZE..=PAYLOAD_UNIT`.
#[inline]
pub fn is_valid_header_size(header_size: usize) -> bool {
    (MIN_HEADER_SIZE..=PAYLOAD_UNIT).contains(&header_size)
        && crate::align::is_field_aligned(header_size)
}
