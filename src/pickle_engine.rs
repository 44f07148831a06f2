pub mod constants;

mod attachment;
pub use attachment::{Attachment, AttachmentSet};

pub mod digest;
pub use digest::compute_checksum;

mod handle_pickle;
pub use handle_pickle::HandlePickle;

mod pickle;
pub use pickle::Pickle;

mod pickle_iterator;
pub use pickle_iterator::PickleIterator;

mod pickle_slices;
pub use pickle_slices::PickleSlices;

mod pickle_stream;
pub use pickle_stream::PickleStream;

pub mod traits;

pub use r_pickle_header::{UNREPRESENTABLE_PICKLE_SIZE, find_next, peek_next, split_next};
