use crate::pickle_engine::Pickle;
use crate::pickle_engine::constants::DEFAULT_HEADER_SIZE;
use r_pickle_header::{find_next, is_valid_header_size};

/// Iterator over pickles stored back-to-back in one byte range.
///
/// Yields `(offset, pickle)` pairs, where each pickle is a zero-copy view
/// into the range. Iteration stops at the first frame that is incomplete or
/// declares an unrepresentable size; whatever was not consumed is available
/// from [`PickleSlices::remainder`].
pub struct PickleSlices<'a> {
    bytes: &'a [u8],
    header_size: usize,
    cursor: usize,
}

impl<'a> PickleSlices<'a> {
    /// Scans `bytes` assuming the default header size.
    pub fn new(bytes: &'a [u8]) -> Self {
        Self::with_header_size(bytes, DEFAULT_HEADER_SIZE)
    }

    /// # Panics
    /// - If `header_size` is not a legal pickle header size.
    pub fn with_header_size(bytes: &'a [u8], header_size: usize) -> Self {
        assert!(
            is_valid_header_size(header_size),
            "invalid pickle header size {}",
            header_size
        );

        Self {
            bytes,
            header_size,
            cursor: 0,
        }
    }

    /// Bytes not yet consumed by the iterator.
    pub fn remainder(&self) -> &'a [u8] {
        &self.bytes[self.cursor..]
    }

    /// Offset of the next frame from the start of the range.
    pub fn offset(&self) -> usize {
        self.cursor
    }
}

impl<'a> Iterator for PickleSlices<'a> {
    type Item = (usize, Pickle<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.remainder();
        let end = find_next(self.header_size, rest)?;

        let offset = self.cursor;
        self.cursor += end;

        Some((
            offset,
            Pickle::from_bytes_with_header_size(&rest[..end], self.header_size),
        ))
    }
}
