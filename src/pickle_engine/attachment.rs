use crate::pickle_engine::PickleIterator;
use std::fmt::Debug;
use std::sync::Arc;

/// An out-of-band resource that travels alongside a pickle's bytes, such as
/// an open file handed to another process.
pub trait Attachment: Debug + Send + Sync {}

impl Attachment for std::fs::File {}

/// Attachment capability of a pickle type.
///
/// The defaults describe a pickle that supports no attachments at all:
/// writes are refused, reads find nothing. Transport-specific pickle types
/// (see [`HandlePickle`](crate::HandlePickle)) override them.
///
/// Attachments are addressed by insertion order and are independent of the
/// payload bytes, except for whatever index the implementation chooses to
/// write into the payload.
pub trait AttachmentSet {
    /// Associates `attachment` with this pickle.
    ///
    /// Returns `false` if attachments are unsupported or the set is full.
    fn write_attachment(&mut self, attachment: Arc<dyn Attachment>) -> bool {
        let _ = attachment;
        false
    }

    /// Reads the next attachment reference from `iter` and resolves it.
    ///
    /// On `None`, `iter` is left where it was.
    fn read_attachment(&self, iter: &mut PickleIterator<'_>) -> Option<Arc<dyn Attachment>> {
        let _ = iter;
        None
    }

    fn has_attachments(&self) -> bool {
        false
    }

    fn attachment_count(&self) -> usize {
        0
    }
}
