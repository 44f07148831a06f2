use crate::pickle_engine::constants::MAX_ATTACHMENTS_PER_PICKLE;
use crate::pickle_engine::{Attachment, AttachmentSet, Pickle, PickleIterator};
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use tracing::warn;

/// A pickle that can carry out-of-band attachments.
///
/// Each attachment written is appended to an ordered list and its index is
/// written into the payload as an int, so readers can pair the field with
/// the resource in the same position of the field sequence.
///
/// Dereferences to the inner [`Pickle`] for all ordinary reads and writes.
#[derive(Debug, Clone)]
pub struct HandlePickle {
    pickle: Pickle<'static>,
    attachments: Vec<Arc<dyn Attachment>>,
    max_attachments: usize,
}

impl Default for HandlePickle {
    fn default() -> Self {
        Self::new()
    }
}

impl HandlePickle {
    pub fn new() -> Self {
        Self::with_max_attachments(MAX_ATTACHMENTS_PER_PICKLE)
    }

    /// Creates an empty pickle that accepts at most `max_attachments`.
    pub fn with_max_attachments(max_attachments: usize) -> Self {
        Self {
            pickle: Pickle::new(),
            attachments: Vec::new(),
            max_attachments,
        }
    }

    /// Reassembles a received pickle with the attachments that arrived with
    /// it, in the order they were attached.
    pub fn from_parts(pickle: Pickle<'static>, attachments: Vec<Arc<dyn Attachment>>) -> Self {
        Self {
            pickle,
            max_attachments: attachments.len().max(MAX_ATTACHMENTS_PER_PICKLE),
            attachments,
        }
    }

    /// Splits into the encoded pickle and its attachments for transmission.
    pub fn into_parts(self) -> (Pickle<'static>, Vec<Arc<dyn Attachment>>) {
        (self.pickle, self.attachments)
    }

    pub fn attachments(&self) -> &[Arc<dyn Attachment>] {
        &self.attachments
    }
}

impl Deref for HandlePickle {
    type Target = Pickle<'static>;

    fn deref(&self) -> &Self::Target {
        &self.pickle
    }
}

impl DerefMut for HandlePickle {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.pickle
    }
}

impl AttachmentSet for HandlePickle {
    fn write_attachment(&mut self, attachment: Arc<dyn Attachment>) -> bool {
        if self.attachments.len() >= self.max_attachments {
            warn!(
                "Refusing attachment: pickle already carries {} of {}",
                self.attachments.len(),
                self.max_attachments
            );
            return false;
        }

        let Ok(index) = i32::try_from(self.attachments.len()) else {
            return false;
        };
        self.attachments.push(attachment);
        self.pickle.write_int(index);
        true
    }

    fn read_attachment(&self, iter: &mut PickleIterator<'_>) -> Option<Arc<dyn Attachment>> {
        iter.transact(|iter| {
            let index = usize::try_from(iter.read_int()?).ok()?;
            self.attachments.get(index).cloned()
        })
    }

    fn has_attachments(&self) -> bool {
        !self.attachments.is_empty()
    }

    fn attachment_count(&self) -> usize {
        self.attachments.len()
    }
}
