use crate::pickle_engine::constants::FIELD_ALIGNMENT;
use crate::pickle_engine::traits::PickleRead;
use crate::utils::align_or_copy;
use r_pickle_header::checked_align_up;
use std::borrow::Cow;
use std::os::raw::c_long;

/// Bounds-checked sequential reader over a pickle's payload.
///
/// Reads must happen in the order the fields were written. Every read
/// checks the requested length against the bytes left before the declared
/// payload end, and a failed read returns `None` without moving the cursor,
/// so retrying it fails the same way.
///
/// The iterator is `Copy`: independent cursors over the same pickle can
/// coexist, and a copy can be used to look ahead.
///
/// Zero-copy reads ([`read_string_piece`](Self::read_string_piece),
/// [`read_data`](Self::read_data), [`read_bytes`](Self::read_bytes)) borrow
/// from the pickle's own storage for `'a`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PickleIterator<'a> {
    payload: &'a [u8],
    read_index: usize,
    end_index: usize,
}

impl<'a> PickleIterator<'a> {
    /// Creates a cursor at the start of `payload`.
    pub fn from_payload(payload: &'a [u8]) -> Self {
        Self {
            payload,
            read_index: 0,
            end_index: payload.len(),
        }
    }

    /// `true` once every payload byte has been consumed.
    pub fn reached_end(&self) -> bool {
        self.read_index == self.end_index
    }

    /// Bytes left before the payload end.
    pub fn remaining(&self) -> usize {
        self.end_index - self.read_index
    }

    /// Current offset from the start of the payload.
    pub fn offset(&self) -> usize {
        self.read_index
    }

    // -----------------------------------------------------------------------
    // Scalars
    // -----------------------------------------------------------------------

    /// Reads a bool written as a 4-byte int. Any non-zero value is `true`.
    pub fn read_bool(&mut self) -> Option<bool> {
        self.read_int().map(|value| value != 0)
    }

    pub fn read_int(&mut self) -> Option<i32> {
        self.read_builtin().map(i32::from_ne_bytes)
    }

    /// Reads a platform `long`, which is always 64 bits on the wire.
    ///
    /// # Panics
    /// - If the stored value does not fit in this platform's `long`. A
    ///   producer and consumer disagreeing on `long` width is a bug in the
    ///   calling code, not malformed input. Use [`read_i64`](Self::read_i64)
    ///   when the value may legitimately be wider.
    pub fn read_long(&mut self) -> Option<c_long> {
        let mut probe = *self;
        let wide = probe.read_i64()?;
        let Some(value) = c_long::try_from(wide).ok() else {
            panic!("pickled long {} does not fit in this platform's long", wide);
        };
        *self = probe;
        Some(value)
    }

    pub fn read_u16(&mut self) -> Option<u16> {
        self.read_builtin().map(u16::from_ne_bytes)
    }

    pub fn read_u32(&mut self) -> Option<u32> {
        self.read_builtin().map(u32::from_ne_bytes)
    }

    pub fn read_i64(&mut self) -> Option<i64> {
        self.read_builtin().map(i64::from_ne_bytes)
    }

    pub fn read_u64(&mut self) -> Option<u64> {
        self.read_builtin().map(u64::from_ne_bytes)
    }

    pub fn read_f32(&mut self) -> Option<f32> {
        self.read_builtin().map(f32::from_ne_bytes)
    }

    pub fn read_f64(&mut self) -> Option<f64> {
        self.read_builtin().map(f64::from_ne_bytes)
    }

    /// Reads a length written as an `i32`, rejecting negative values.
    pub fn read_length(&mut self) -> Option<usize> {
        self.transact(|iter| usize::try_from(iter.read_int()?).ok())
    }

    // -----------------------------------------------------------------------
    // Strings and blobs
    // -----------------------------------------------------------------------

    /// Reads a length-prefixed UTF-8 string into an owned `String`.
    ///
    /// Fails on a negative or oversized length and on invalid UTF-8.
    pub fn read_string(&mut self) -> Option<String> {
        self.read_string_piece().map(str::to_owned)
    }

    /// Zero-copy variant of [`read_string`](Self::read_string).
    ///
    /// The returned `&str` points into the pickle's storage and is valid
    /// only while that storage is alive and unmodified.
    pub fn read_string_piece(&mut self) -> Option<&'a str> {
        self.transact(|iter| {
            let len = iter.read_length()?;
            let bytes = iter.get_read_pointer_and_advance(len)?;
            std::str::from_utf8(bytes).ok()
        })
    }

    /// Reads a length-prefixed UTF-16 string into owned code units.
    pub fn read_string16(&mut self) -> Option<Vec<u16>> {
        self.read_string_piece16().map(Cow::into_owned)
    }

    /// Reads a length-prefixed UTF-16 string without copying when the
    /// underlying bytes are suitably aligned for `u16`, copying otherwise.
    pub fn read_string_piece16(&mut self) -> Option<Cow<'a, [u16]>> {
        self.transact(|iter| {
            let units = iter.read_length()?;
            let bytes = iter.get_read_pointer_and_advance_elements(units, size_of::<u16>())?;
            Some(align_or_copy::<u16, 2>(bytes, u16::from_ne_bytes))
        })
    }

    /// Reads a length-prefixed blob written by `Pickle::write_data`.
    ///
    /// The returned slice points into the pickle's storage.
    pub fn read_data(&mut self) -> Option<&'a [u8]> {
        self.transact(|iter| {
            let len = iter.read_length()?;
            iter.get_read_pointer_and_advance(len)
        })
    }

    /// Reads `length` bytes written by `Pickle::write_bytes`, whose length
    /// is not stored in the stream.
    pub fn read_bytes(&mut self, length: usize) -> Option<&'a [u8]> {
        self.get_read_pointer_and_advance(length)
    }

    /// Skips `num_bytes` (rounded up to the field alignment).
    ///
    /// Returns `false`, leaving the cursor in place, if fewer than
    /// `num_bytes` remain.
    #[must_use]
    pub fn skip_bytes(&mut self, num_bytes: usize) -> bool {
        self.get_read_pointer_and_advance(num_bytes).is_some()
    }

    /// Reads any [`PickleRead`] value.
    pub fn read_value<T: PickleRead>(&mut self) -> Option<T> {
        self.transact(|iter| T::read_from(iter))
    }

    // -----------------------------------------------------------------------
    // Core primitive
    // -----------------------------------------------------------------------

    /// Returns the next `num_bytes` of payload and moves past them plus any
    /// alignment padding.
    ///
    /// `None` if `[offset, offset + num_bytes)` does not lie within the
    /// payload. The comparison is done against the remaining length, so it
    /// cannot overflow.
    pub fn get_read_pointer_and_advance(&mut self, num_bytes: usize) -> Option<&'a [u8]> {
        if num_bytes > self.remaining() {
            return None;
        }

        let payload = self.payload;
        let start = self.read_index;
        let bytes = &payload[start..start + num_bytes];
        self.advance(num_bytes);
        Some(bytes)
    }

    /// Signed-count form of [`Self::get_read_pointer_and_advance`].
    /// Negative counts are rejected.
    pub fn get_read_pointer_and_advance_signed(&mut self, num_bytes: i32) -> Option<&'a [u8]> {
        let num_bytes = usize::try_from(num_bytes).ok()?;
        self.get_read_pointer_and_advance(num_bytes)
    }

    /// Element-count form: requests `num_elements * element_size` bytes,
    /// failing if the multiplication overflows.
    pub fn get_read_pointer_and_advance_elements(
        &mut self,
        num_elements: usize,
        element_size: usize,
    ) -> Option<&'a [u8]> {
        let num_bytes = num_elements.checked_mul(element_size)?;
        self.get_read_pointer_and_advance(num_bytes)
    }

    /// Moves forward by `size` rounded up to the field alignment, stopping
    /// at the payload end when the padding itself is missing.
    #[inline]
    fn advance(&mut self, size: usize) {
        let aligned = checked_align_up(size, FIELD_ALIGNMENT).unwrap_or(usize::MAX);
        if aligned > self.remaining() {
            self.read_index = self.end_index;
        } else {
            self.read_index += aligned;
        }
    }

    #[inline]
    fn read_builtin<const N: usize>(&mut self) -> Option<[u8; N]> {
        let bytes = self.get_read_pointer_and_advance(N)?;
        bytes.try_into().ok()
    }

    /// Runs a multi-step read on a copy of the cursor and only commits the
    /// new position if every step succeeded.
    #[inline]
    pub(crate) fn transact<T>(&mut self, read: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        let mut probe = *self;
        let value = read(&mut probe)?;
        *self = probe;
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unaligned_request_advances_to_next_boundary() {
        let payload = [0u8; 20];
        let mut iter = PickleIterator::from_payload(&payload);

        assert_eq!(iter.get_read_pointer_and_advance(15).map(<[u8]>::len), Some(15));
        assert_eq!(iter.offset(), 16);
        assert_eq!(iter.remaining(), 4);
    }

    #[test]
    fn missing_trailing_padding_stops_at_end() {
        let payload = [7u8; 6];
        let mut iter = PickleIterator::from_payload(&payload);

        assert!(iter.get_read_pointer_and_advance(5).is_some());
        assert!(iter.reached_end());
    }

    #[test]
    fn failed_multi_step_read_does_not_move_cursor() {
        // length 12 claimed, only 4 bytes follow
        let mut payload = 12i32.to_ne_bytes().to_vec();
        payload.extend_from_slice(b"abcd");
        let mut iter = PickleIterator::from_payload(&payload);

        assert_eq!(iter.read_data(), None);
        assert_eq!(iter.offset(), 0);
        assert_eq!(iter.read_data(), None);
        assert_eq!(iter.read_int(), Some(12));
    }

    #[test]
    fn element_count_overflow_is_rejected() {
        let payload = [0u8; 8];
        let mut iter = PickleIterator::from_payload(&payload);
        assert_eq!(iter.get_read_pointer_and_advance_elements(usize::MAX / 2 + 1, 2), None);
        assert_eq!(iter.get_read_pointer_and_advance_signed(-1), None);
        assert_eq!(iter.offset(), 0);
    }

    #[test]
    fn default_iterator_is_exhausted() {
        let mut iter = PickleIterator::default();
        assert!(iter.reached_end());
        assert_eq!(iter.read_int(), None);
        assert_eq!(iter.read_string(), None);
    }
}
