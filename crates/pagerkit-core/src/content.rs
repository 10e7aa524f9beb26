//! Content lifecycle collaborator.
//!
//! The pager decides *when* page content exists; a [`PageFactory`] decides
//! *what* it is. Handles are opaque to the pager apart from equality, which is
//! how a shown page is traced back to its current position.

use std::fmt;

/// Error reported by a [`PageFactory`] when content cannot be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentError {
    message: String,
}

impl ContentError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ContentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ContentError {}

/// Creates, tears down and persists page content.
///
/// Position 0 is the empty page and is never passed to
/// [`create_content`](PageFactory::create_content).
pub trait PageFactory {
    /// Opaque handle to live content.
    type Handle: Clone + PartialEq;
    /// Saved per-page state, captured when content is destroyed.
    type State: Clone;
    /// External reference used to re-attach live content after a restore.
    type Reference: Clone;

    fn create_content(&mut self, position: usize) -> Result<Self::Handle, ContentError>;

    fn destroy_content(&mut self, handle: &Self::Handle);

    /// Captures the state of content that is about to be destroyed.
    fn save_state(&mut self, handle: &Self::Handle) -> Option<Self::State>;

    fn attach_saved_state(&mut self, handle: &Self::Handle, state: &Self::State);

    /// Content starts out hidden; the host reveals it once it becomes the
    /// primary page.
    fn set_user_visible(&mut self, handle: &Self::Handle, visible: bool) {
        let _ = (handle, visible);
    }

    fn reference_for(&self, handle: &Self::Handle) -> Option<Self::Reference> {
        let _ = handle;
        None
    }

    fn resolve_reference(&mut self, reference: &Self::Reference) -> Option<Self::Handle> {
        let _ = reference;
        None
    }
}
