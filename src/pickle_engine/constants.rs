pub use r_pickle_header::constants::*;

/// Upper bound on out-of-band attachments carried by one `HandlePickle`.
pub const MAX_ATTACHMENTS_PER_PICKLE: usize = 128;

/// Largest pickle `PickleStream` will reassemble unless told otherwise.
pub const DEFAULT_MAX_PICKLE_SIZE: usize = 64 * 1024 * 1024; // 64 MiB

/// Stream read chunk size.
pub const STREAM_READ_CHUNK_SIZE: usize = 64 * 1024; // 64 KB
