//! Staged pagination for swipeable pagers.
//!
//! A pager shows a variable number of pages plus a permanent empty page at
//! position 0. Page content is created lazily through a [`PageFactory`], and
//! structural changes are applied in two steps: a requested ("staged") count
//! is recorded first, and the count the host actually renders ("committed")
//! only changes once the [`TransitionCoordinator`] has moved the user off any
//! page that is about to disappear.
//!
//! The crate is headless. Rendering, layout, gestures and snapshot capture
//! belong to the hosting view, reached through [`PagerHost`].

pub mod config;
pub mod content;
pub mod host;
pub mod listeners;
pub mod page_store;
pub mod pager;
pub mod pagination;
pub mod platform;
pub mod swipe_guard;
pub mod task_queue;
pub mod transition;

pub use config::PagerConfig;
pub use content::{ContentError, PageFactory};
pub use host::PagerHost;
pub use listeners::{ListenerId, PageChangeDispatcher, PageEvent, ScrollState};
pub use page_store::{PageRecord, PageStore, RestoreReport, StoreBundle};
pub use pager::{Pager, PagerCommand, RemotePager};
pub use pagination::{PagerBundle, PaginationEngine, StagedChange};
pub use platform::{ManualScheduler, TaskScheduler};
pub use swipe_guard::{GuardContext, SwipeGuard, TouchPhase, TouchVerdict};
pub use task_queue::PausableTaskQueue;
pub use transition::{choose_landing, Landing, TransitionCoordinator, TransitionState};

/// Position of the permanent empty page.
pub const SENTINEL_POSITION: usize = 0;

/// First position that can hold real content.
pub const FIRST_PAGE_POSITION: usize = 1;

/// What occupies a pager slot: the empty page or factory-created content.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PageSlot<H> {
    Sentinel,
    Content(H),
}

impl<H> PageSlot<H> {
    pub fn is_sentinel(&self) -> bool {
        matches!(self, PageSlot::Sentinel)
    }

    pub fn content(&self) -> Option<&H> {
        match self {
            PageSlot::Sentinel => None,
            PageSlot::Content(handle) => Some(handle),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PagerError {
    InvalidArgument { reason: &'static str },
    ContentCreation { position: usize, source: ContentError },
    RestoreReferenceUnresolved { position: usize },
    TransitionInFlight,
}

impl std::fmt::Display for PagerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PagerError::InvalidArgument { reason } => write!(f, "invalid argument: {reason}"),
            PagerError::ContentCreation { position, source } => {
                write!(f, "failed to create content for position {position}: {source}")
            }
            PagerError::RestoreReferenceUnresolved { position } => {
                write!(f, "saved content reference for position {position} could not be resolved")
            }
            PagerError::TransitionInFlight => {
                write!(f, "a page transition is still in flight")
            }
        }
    }
}

impl std::error::Error for PagerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PagerError::ContentCreation { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
