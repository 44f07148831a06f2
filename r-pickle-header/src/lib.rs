pub mod constants;

pub mod align;
pub use align::*;

pub mod pickle_header;
pub use pickle_header::*;

pub mod header_scan;
pub use header_scan::*;

pub mod debug_assert_aligned;
pub use debug_assert_aligned::*;
