use crate::pickle_engine::constants::*;
use crate::pickle_engine::digest::compute_checksum;
use crate::pickle_engine::traits::PickleWrite;
use crate::pickle_engine::{AttachmentSet, PickleIterator};
use r_pickle_header::{
    PickleHeader, align_up, checked_align_up, debug_assert_aligned_offset, is_field_aligned,
    is_valid_header_size,
};
use std::fmt;
use std::io::{self, Write};
use std::os::raw::c_long;
use tracing::debug;

/// Backing bytes of a pickle.
enum Storage<'a> {
    /// Owned and growable. `len()` is always `header_size + capacity_after_header`;
    /// everything past the payload is zero.
    Owned(Vec<u8>),

    /// Read-only view over caller-owned bytes. Covers exactly header + payload.
    Borrowed(&'a [u8]),

    /// Built from bytes that did not describe a pickle.
    Invalid,
}

/// A header-prefixed, append-only binary record.
///
/// Values are appended with the `write_*` methods and read back, in the same
/// order, through a [`PickleIterator`] obtained from [`Pickle::iter`]. Every
/// field starts on a 4-byte boundary; variable-length fields are followed by
/// zero padding.
///
/// A pickle either owns a growable allocation (`Pickle<'static>`, from
/// [`Pickle::new`] or a clone) or borrows someone else's bytes
/// ([`Pickle::from_bytes`]). Borrowed pickles are read-only: calling any
/// `write_*` method on one panics.
///
/// # Invalid pickles
/// Building a view over bytes that cannot be a pickle (too short, declared
/// payload larger than the input, misaligned header) does not fail. The
/// result is an *invalid* pickle: `size() == 0`, `data() == None`, and its
/// iterator reads nothing. Invalid pickles clone into invalid pickles.
pub struct Pickle<'a> {
    storage: Storage<'a>,
    header_size: usize,

    /// End of payload. Always equal to the header's `payload_size`.
    write_offset: usize,
}

impl Default for Pickle<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl Pickle<'static> {
    /// Creates an empty, writable pickle with the default 4-byte header.
    pub fn new() -> Self {
        Self::with_header_size(DEFAULT_HEADER_SIZE)
    }

    /// Creates an empty, writable pickle whose header reserves
    /// `header_size` bytes (rounded up to a multiple of 4).
    ///
    /// Bytes after the `payload_size` field are available through
    /// [`Pickle::extra_header_mut`].
    ///
    /// # Panics
    /// - In debug builds, if `header_size` is smaller than
    ///   [`MIN_HEADER_SIZE`] or larger than [`PAYLOAD_UNIT`]. Release builds
    ///   clamp into that range.
    pub fn with_header_size(header_size: usize) -> Self {
        debug_assert!(
            header_size >= MIN_HEADER_SIZE,
            "header size {} is smaller than the {}-byte minimum",
            header_size,
            MIN_HEADER_SIZE
        );
        debug_assert!(
            header_size <= PAYLOAD_UNIT,
            "header size {} exceeds the {}-byte maximum",
            header_size,
            PAYLOAD_UNIT
        );

        let header_size = align_up(
            header_size.clamp(MIN_HEADER_SIZE, PAYLOAD_UNIT),
            FIELD_ALIGNMENT,
        );
        debug_assert_aligned_offset(header_size);

        let mut pickle = Self {
            storage: Storage::Owned(vec![0u8; header_size]),
            header_size,
            write_offset: 0,
        };
        pickle.resize(PAYLOAD_UNIT);
        pickle
    }
}

impl<'a> Pickle<'a> {
    /// Creates a read-only view over an encoded pickle, inferring the header
    /// size from `data.len() - payload_size`.
    ///
    /// No bytes are copied; `data` must outlive the pickle and every
    /// iterator or zero-copy read taken from it.
    ///
    /// Returns an invalid pickle if `data` is shorter than the fixed header,
    /// if the declared payload is larger than `data`, or if the inferred
    /// header size is not a non-zero multiple of 4.
    pub fn from_bytes(data: &'a [u8]) -> Self {
        let Some(header) = PickleHeader::deserialize(data) else {
            debug!("Rejecting {}-byte pickle view: no room for a header", data.len());
            return Self::invalid();
        };

        let header_size = match data.len().checked_sub(header.payload_size as usize) {
            Some(header_size) => header_size,
            None => {
                debug!(
                    "Rejecting pickle view: payload size {} exceeds {} available bytes",
                    header.payload_size,
                    data.len()
                );
                return Self::invalid();
            }
        };

        if header_size < MIN_HEADER_SIZE || !is_field_aligned(header_size) {
            debug!(
                "Rejecting pickle view: inferred header size {} is malformed",
                header_size
            );
            return Self::invalid();
        }
        debug_assert_aligned_offset(header_size);

        Self {
            storage: Storage::Borrowed(data),
            header_size,
            write_offset: header.payload_size as usize,
        }
    }

    /// Creates a read-only view over the pickle at the front of `data`,
    /// using a header size the caller already knows.
    ///
    /// Bytes past `header_size + payload_size` are not part of the view.
    /// Returns an invalid pickle if `header_size` is not a legal header size
    /// or the declared payload does not fit in `data`.
    pub fn from_bytes_with_header_size(data: &'a [u8], header_size: usize) -> Self {
        if !is_valid_header_size(header_size) || data.len() < header_size {
            debug!(
                "Rejecting pickle view: header size {} over {} bytes",
                header_size,
                data.len()
            );
            return Self::invalid();
        }

        let Some(header) = PickleHeader::deserialize(data) else {
            return Self::invalid();
        };

        let payload_size = header.payload_size as usize;
        match header_size.checked_add(payload_size) {
            Some(total) if total <= data.len() => Self {
                storage: Storage::Borrowed(&data[..total]),
                header_size,
                write_offset: payload_size,
            },
            _ => {
                debug!(
                    "Rejecting pickle view: payload size {} exceeds {} available bytes",
                    payload_size,
                    data.len() - header_size
                );
                Self::invalid()
            }
        }
    }

    fn invalid() -> Self {
        Self {
            storage: Storage::Invalid,
            header_size: 0,
            write_offset: 0,
        }
    }

    /// Deep-copies this pickle into an owning one.
    ///
    /// The copy's capacity is exactly its payload size, regardless of how
    /// much spare capacity (if any) the source had. Invalid pickles copy to
    /// invalid pickles.
    pub fn to_owned_pickle(&self) -> Pickle<'static> {
        match self.data() {
            Some(bytes) => Pickle {
                storage: Storage::Owned(bytes.to_vec()),
                header_size: self.header_size,
                write_offset: self.write_offset,
            },
            None => Pickle::invalid(),
        }
    }

    // -----------------------------------------------------------------------
    // Inspection
    // -----------------------------------------------------------------------

    /// Returns the encoded bytes (header + payload), or `None` for an
    /// invalid pickle.
    pub fn data(&self) -> Option<&[u8]> {
        match &self.storage {
            Storage::Owned(bytes) => Some(&bytes[..self.header_size + self.write_offset]),
            Storage::Borrowed(bytes) => Some(bytes),
            Storage::Invalid => None,
        }
    }

    /// Total encoded size (header + payload). Zero for an invalid pickle.
    pub fn size(&self) -> usize {
        self.data().map_or(0, <[u8]>::len)
    }

    /// `false` if this pickle was built from malformed bytes.
    pub fn is_valid(&self) -> bool {
        !matches!(self.storage, Storage::Invalid)
    }

    /// `true` for views and invalid pickles, which accept no writes.
    pub fn is_read_only(&self) -> bool {
        !matches!(self.storage, Storage::Owned(_))
    }

    pub fn header_size(&self) -> usize {
        self.header_size
    }

    /// Number of payload bytes, padding included.
    pub fn payload_size(&self) -> usize {
        self.write_offset
    }

    /// The payload bytes (empty for an invalid pickle).
    pub fn payload(&self) -> &[u8] {
        match self.data() {
            Some(bytes) => &bytes[self.header_size..],
            None => &[],
        }
    }

    /// Caller-defined header bytes that follow the `payload_size` field.
    pub fn extra_header(&self) -> &[u8] {
        match self.data() {
            Some(bytes) => &bytes[MIN_HEADER_SIZE..self.header_size],
            None => &[],
        }
    }

    /// Mutable access to the caller-defined header bytes.
    ///
    /// # Panics
    /// - If the pickle is read-only.
    pub fn extra_header_mut(&mut self) -> &mut [u8] {
        let header_size = self.header_size;
        &mut self.owned_bytes_mut()[MIN_HEADER_SIZE..header_size]
    }

    /// Copies the whole header out as a plain-old-data struct.
    ///
    /// `T` is expected to begin with a `u32` payload size followed by the
    /// caller's own fields. Returns `None` for an invalid pickle.
    ///
    /// # Panics
    /// - If the pickle is valid and `size_of::<T>()` differs from its header
    ///   size. An invalid pickle has no header, so no `T` is checked.
    pub fn header_as<T: bytemuck::Pod>(&self) -> Option<T> {
        let bytes = self.data()?;
        assert_eq!(
            std::mem::size_of::<T>(),
            self.header_size,
            "header type does not match the pickle's {}-byte header",
            self.header_size
        );
        Some(bytemuck::pod_read_unaligned(&bytes[..self.header_size]))
    }

    /// Bytes that can be appended before the next reallocation, or `None`
    /// for read-only pickles, whose capacity is not tracked.
    pub fn capacity_after_header(&self) -> Option<usize> {
        match &self.storage {
            Storage::Owned(bytes) => Some(bytes.len() - self.header_size),
            _ => None,
        }
    }

    /// Header size plus capacity for owning pickles, zero otherwise.
    /// Diagnostic only.
    pub fn total_allocated_size(&self) -> usize {
        match self.capacity_after_header() {
            Some(capacity) => self.header_size + capacity,
            None => 0,
        }
    }

    /// CRC32 of the encoded bytes. Zero-length input for invalid pickles.
    pub fn checksum(&self) -> u32 {
        compute_checksum(self.data().unwrap_or(&[]))
    }

    /// Returns a fresh cursor at the start of the payload.
    pub fn iter(&self) -> PickleIterator<'_> {
        PickleIterator::from_payload(self.payload())
    }

    /// Writes the encoded bytes to `writer` as one frame.
    ///
    /// # Errors
    /// - `InvalidData` if the pickle is invalid.
    /// - Any error returned by `writer`.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let bytes = self.data().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidData, "cannot write an invalid pickle")
        })?;
        writer.write_all(bytes)
    }

    // -----------------------------------------------------------------------
    // Writers
    // -----------------------------------------------------------------------

    /// Writes a bool as a 4-byte int (0 or 1).
    pub fn write_bool(&mut self, value: bool) {
        self.write_int(i32::from(value));
    }

    pub fn write_int(&mut self, value: i32) {
        self.write_bytes_common(&value.to_ne_bytes());
    }

    /// Writes a platform `long`. Always encoded as 64 bits so producers and
    /// consumers with different `long` widths agree on the layout.
    pub fn write_long(&mut self, value: c_long) {
        self.write_i64(i64::from(value));
    }

    /// Writes a `u16`. Like every field it occupies a 4-byte slot.
    pub fn write_u16(&mut self, value: u16) {
        self.write_bytes_common(&value.to_ne_bytes());
    }

    pub fn write_u32(&mut self, value: u32) {
        self.write_bytes_common(&value.to_ne_bytes());
    }

    pub fn write_i64(&mut self, value: i64) {
        self.write_bytes_common(&value.to_ne_bytes());
    }

    pub fn write_u64(&mut self, value: u64) {
        self.write_bytes_common(&value.to_ne_bytes());
    }

    pub fn write_f32(&mut self, value: f32) {
        self.write_bytes_common(&value.to_ne_bytes());
    }

    pub fn write_f64(&mut self, value: f64) {
        self.write_bytes_common(&value.to_ne_bytes());
    }

    /// Writes an `i32` byte count followed by the UTF-8 bytes of `value`.
    pub fn write_string(&mut self, value: &str) {
        self.write_length(value.len());
        self.write_bytes_common(value.as_bytes());
    }

    /// Writes an `i32` code-unit count followed by the UTF-16 code units of
    /// `value` in host byte order.
    pub fn write_string16(&mut self, value: &[u16]) {
        self.write_length(value.len());
        self.write_bytes_common(bytemuck::cast_slice(value));
    }

    /// Writes a self-describing blob: `i32` length, the bytes, padding.
    pub fn write_data(&mut self, data: &[u8]) {
        self.write_length(data.len());
        self.write_bytes_common(data);
    }

    /// Writes `data` with padding but no length prefix. The reader must
    /// know the length out of band.
    pub fn write_bytes(&mut self, data: &[u8]) {
        self.write_bytes_common(data);
    }

    /// Appends any [`PickleWrite`] value.
    pub fn write_value<T: PickleWrite + ?Sized>(&mut self, value: &T) {
        value.write_to(self);
    }

    /// Claims `num_bytes` of payload and returns them zero-initialized, so
    /// callers can fill a region in place.
    ///
    /// # Panics
    /// - If the pickle is read-only.
    pub fn claim_bytes(&mut self, num_bytes: usize) -> &mut [u8] {
        self.claim_bytes_internal(num_bytes)
    }

    /// Grows capacity, if needed, so at least `additional` more bytes can be
    /// written without reallocating. Does not change the payload.
    ///
    /// # Panics
    /// - If the pickle is read-only.
    pub fn reserve(&mut self, additional: usize) {
        let capacity = self.writable_capacity();
        let new_size = checked_align_up(additional, FIELD_ALIGNMENT)
            .and_then(|data_len| self.write_offset.checked_add(data_len));
        let Some(new_size) = new_size else {
            panic!("pickle reservation of {} bytes overflows", additional);
        };

        if new_size > capacity {
            self.resize(capacity.saturating_mul(2).saturating_add(new_size));
        }
    }

    fn write_length(&mut self, length: usize) {
        let Ok(length) = i32::try_from(length) else {
            panic!("pickle field length {} does not fit in an i32", length);
        };
        self.write_int(length);
    }

    #[inline]
    fn write_bytes_common(&mut self, data: &[u8]) {
        self.claim_bytes_internal(data.len()).copy_from_slice(data);
    }

    fn owned_bytes_mut(&mut self) -> &mut Vec<u8> {
        match &mut self.storage {
            Storage::Owned(bytes) => bytes,
            _ => panic!("pickle is read-only"),
        }
    }

    fn writable_capacity(&self) -> usize {
        match self.capacity_after_header() {
            Some(capacity) => capacity,
            None => panic!("pickle is read-only"),
        }
    }

    /// Appends `length` bytes (plus zero padding up to the next field
    /// boundary) to the payload and returns the unpadded region, zeroed.
    fn claim_bytes_internal(&mut self, length: usize) -> &mut [u8] {
        let capacity = self.writable_capacity();

        let data_len = checked_align_up(length, FIELD_ALIGNMENT)
            .filter(|data_len| *data_len <= u32::MAX as usize - self.write_offset);
        let Some(data_len) = data_len else {
            panic!(
                "pickle payload would exceed {} bytes (current {}, claiming {})",
                u32::MAX,
                self.write_offset,
                length
            );
        };

        let new_size = self.write_offset + data_len;
        if new_size > capacity {
            let mut new_capacity = capacity.saturating_mul(2);
            if new_capacity > HEAP_ALIGNMENT {
                new_capacity = align_up(new_capacity, HEAP_ALIGNMENT) - PAYLOAD_UNIT;
            }
            self.resize(new_capacity.max(new_size));
        }

        let start = self.header_size + self.write_offset;
        self.write_offset = new_size;
        let payload_size = new_size as u32;

        let bytes = self.owned_bytes_mut();
        PickleHeader::new(payload_size).write_into(bytes);

        let region = &mut bytes[start..start + data_len];
        region.fill(0);
        &mut region[..length]
    }

    /// Sets capacity after the header to `new_capacity` rounded up to a
    /// whole payload unit. Newly exposed bytes are zero.
    fn resize(&mut self, new_capacity: usize) {
        let Some(new_capacity) = checked_align_up(new_capacity, PAYLOAD_UNIT) else {
            panic!("pickle capacity {} is not representable", new_capacity);
        };
        let total = self.header_size + new_capacity;

        let bytes = self.owned_bytes_mut();
        if total > bytes.len() {
            debug!("Growing pickle from {} to {} bytes", bytes.len(), total);
            bytes.reserve_exact(total - bytes.len());
            bytes.resize(total, 0);
        }
    }
}

impl Clone for Pickle<'_> {
    /// Deep copy; see [`Pickle::to_owned_pickle`].
    fn clone(&self) -> Self {
        self.to_owned_pickle()
    }
}

impl PartialEq for Pickle<'_> {
    /// Two pickles are equal if their encoded bytes are equal. Invalid
    /// pickles are equal to each other.
    fn eq(&self, other: &Self) -> bool {
        self.data() == other.data()
    }
}

impl Eq for Pickle<'_> {}

impl fmt::Debug for Pickle<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pickle")
            .field("valid", &self.is_valid())
            .field("read_only", &self.is_read_only())
            .field("header_size", &self.header_size)
            .field("payload_size", &self.write_offset)
            .field("capacity_after_header", &self.capacity_after_header())
            .finish()
    }
}

/// Plain pickles carry no attachments; every operation reports "unsupported".
impl AttachmentSet for Pickle<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_pickle_allocates_one_payload_unit() {
        let pickle = Pickle::new();
        assert_eq!(pickle.size(), DEFAULT_HEADER_SIZE);
        assert_eq!(pickle.capacity_after_header(), Some(PAYLOAD_UNIT));
        assert_eq!(pickle.total_allocated_size(), DEFAULT_HEADER_SIZE + PAYLOAD_UNIT);
    }

    #[test]
    fn claimed_region_is_zeroed_and_padded() {
        let mut pickle = Pickle::new();
        let region = pickle.claim_bytes(5);
        assert_eq!(region, &[0u8; 5]);
        region.copy_from_slice(b"abcde");

        assert_eq!(pickle.payload_size(), 8);
        assert_eq!(pickle.payload(), b"abcde\0\0\0");
    }

    #[test]
    fn large_growth_rounds_to_heap_pages() {
        let mut pickle = Pickle::new();
        pickle.claim_bytes(3000);
        pickle.claim_bytes(3000);

        let capacity = pickle.capacity_after_header().unwrap();
        assert!(capacity >= 6000);
        assert_eq!((capacity + PAYLOAD_UNIT) % HEAP_ALIGNMENT, 0);
    }

    #[test]
    #[should_panic(expected = "read-only")]
    fn views_reject_writes() {
        let source = Pickle::new();
        let bytes = source.data().unwrap().to_vec();
        let mut view = Pickle::from_bytes(&bytes);
        view.write_int(1);
    }
}
