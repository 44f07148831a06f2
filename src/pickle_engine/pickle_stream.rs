use crate::pickle_engine::Pickle;
use crate::pickle_engine::constants::*;
use r_pickle_header::{is_valid_header_size, peek_next};
use std::io::{self, Read};
use tracing::{debug, warn};

/// Reassembles whole pickles from a byte stream.
///
/// Bytes are pulled from the reader in chunks until the buffered prefix
/// holds a complete pickle, which is then returned as an owning
/// `Pickle<'static>`. The declared size is checked as soon as a header is
/// available, so a bogus length is rejected before anything is allocated
/// for it.
///
/// # Errors
/// - `InvalidData` when a header declares more than `max_pickle_size`
///   bytes.
/// - `UnexpectedEof` when the stream ends in the middle of a pickle.
/// - Any error from the underlying reader (`Interrupted` is retried).
///
/// After an error the stream yields nothing further.
pub struct PickleStream<R> {
    reader: R,
    header_size: usize,
    max_pickle_size: usize,
    buffer: Vec<u8>,
    failed: bool,
}

impl<R: Read> PickleStream<R> {
    pub fn new(reader: R) -> Self {
        Self::with_header_size(reader, DEFAULT_HEADER_SIZE)
    }

    /// # Panics
    /// - If `header_size` is not a legal pickle header size.
    pub fn with_header_size(reader: R, header_size: usize) -> Self {
        assert!(
            is_valid_header_size(header_size),
            "invalid pickle header size {}",
            header_size
        );

        Self {
            reader,
            header_size,
            max_pickle_size: DEFAULT_MAX_PICKLE_SIZE,
            buffer: Vec::new(),
            failed: false,
        }
    }

    /// Caps the total size (header + payload) of any single pickle.
    pub fn with_max_pickle_size(mut self, max_pickle_size: usize) -> Self {
        self.max_pickle_size = max_pickle_size;
        self
    }

    /// Bytes received but not yet returned as part of a pickle.
    pub fn buffered(&self) -> &[u8] {
        &self.buffer
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Returns the next complete pickle, `Ok(None)` on a clean end of
    /// stream.
    pub fn next_pickle(&mut self) -> io::Result<Option<Pickle<'static>>> {
        if self.failed {
            return Ok(None);
        }

        let result = self.next_pickle_inner();
        if result.is_err() {
            self.failed = true;
        }
        result
    }

    fn next_pickle_inner(&mut self) -> io::Result<Option<Pickle<'static>>> {
        loop {
            if let Some(pickle_size) = peek_next(self.header_size, &self.buffer) {
                if pickle_size > self.max_pickle_size {
                    warn!(
                        "Rejecting pickle declaring {} bytes (limit {})",
                        pickle_size, self.max_pickle_size
                    );
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidData,
                        format!(
                            "pickle declares {} bytes, limit is {}",
                            pickle_size, self.max_pickle_size
                        ),
                    ));
                }

                if self.buffer.len() >= pickle_size {
                    let rest = self.buffer.split_off(pickle_size);
                    let frame = std::mem::replace(&mut self.buffer, rest);
                    let pickle =
                        Pickle::from_bytes_with_header_size(&frame, self.header_size).to_owned_pickle();

                    debug!(
                        "Reassembled {}-byte pickle, {} bytes still buffered",
                        pickle_size,
                        self.buffer.len()
                    );
                    return Ok(Some(pickle));
                }
            }

            if self.fill()? == 0 {
                if self.buffer.is_empty() {
                    return Ok(None);
                }

                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!(
                        "stream ended with {} bytes of an incomplete pickle",
                        self.buffer.len()
                    ),
                ));
            }
        }
    }

    /// Appends up to one chunk from the reader to the buffer.
    fn fill(&mut self) -> io::Result<usize> {
        let start = self.buffer.len();
        self.buffer.resize(start + STREAM_READ_CHUNK_SIZE, 0);

        loop {
            match self.reader.read(&mut self.buffer[start..]) {
                Ok(read) => {
                    self.buffer.truncate(start + read);
                    return Ok(read);
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => {
                    self.buffer.truncate(start);
                    return Err(err);
                }
            }
        }
    }
}

impl<R: Read> Iterator for PickleStream<R> {
    type Item = io::Result<Pickle<'static>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_pickle().transpose()
    }
}
