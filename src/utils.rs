mod align_or_copy;
pub use align_or_copy::align_or_copy;

mod format_bytes;
pub use format_bytes::format_bytes;

mod parse_buffer_size;
pub use parse_buffer_size::parse_buffer_size;
