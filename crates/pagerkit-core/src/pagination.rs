//! Staged/committed page counts and the position lifecycle.
//!
//! The host renders [`PaginationEngine::total_page_count`], which is derived
//! from the committed count. Callers only ever change the staged count; the
//! transition coordinator commits it once it is safe to do so.

use std::ops::Range;

use crate::content::PageFactory;
use crate::page_store::{PageStore, RestoreReport, StoreBundle};
use crate::{PageSlot, PagerError, SENTINEL_POSITION};

/// Result of a count request, handed to the transition layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StagedChange {
    pub previous_staged: usize,
    pub staged: usize,
    pub committed: usize,
}

/// Persisted pager layout.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PagerBundle<S, R> {
    pub committed_count: usize,
    pub store: StoreBundle<S, R>,
}

pub struct PaginationEngine<F: PageFactory> {
    factory: F,
    store: PageStore<F::Handle, F::State>,
    committed_count: usize,
    staged_count: usize,
    primary_item: Option<PageSlot<F::Handle>>,
}

impl<F: PageFactory> PaginationEngine<F> {
    pub fn new(factory: F) -> Self {
        let mut store = PageStore::new();
        // The empty page always has a record, even though it never holds content.
        store.ensure_size(SENTINEL_POSITION);
        Self {
            factory,
            store,
            committed_count: 0,
            staged_count: 0,
            primary_item: None,
        }
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub fn factory_mut(&mut self) -> &mut F {
        &mut self.factory
    }

    pub fn store(&self) -> &PageStore<F::Handle, F::State> {
        &self.store
    }

    pub fn committed_count(&self) -> usize {
        self.committed_count
    }

    pub fn staged_count(&self) -> usize {
        self.staged_count
    }

    /// Committed pages plus the empty page.
    pub fn total_page_count(&self) -> usize {
        self.committed_count + 1
    }

    pub fn has_pending_change(&self) -> bool {
        self.staged_count != self.committed_count
    }

    /// Records the requested page count. The committed count is untouched.
    pub fn request_count(&mut self, count: usize) -> StagedChange {
        let previous_staged = self.staged_count;
        self.staged_count = count;
        StagedChange {
            previous_staged,
            staged: count,
            committed: self.committed_count,
        }
    }

    /// Makes the staged count the rendered one. Returns the previous total.
    pub fn commit_staged(&mut self) -> usize {
        let previous_total = self.total_page_count();
        self.committed_count = self.staged_count;
        previous_total
    }

    /// Drops the page at `position` and shifts later pages down. Must be
    /// called before the count request that reflects the removal.
    ///
    /// Positions past both the committed and the staged count are rejected.
    pub fn remove_page(&mut self, position: usize) -> Result<(), PagerError> {
        if position == SENTINEL_POSITION {
            return Err(PagerError::InvalidArgument {
                reason: "the empty page cannot be removed",
            });
        }
        if position > self.committed_count.max(self.staged_count) {
            return Err(PagerError::InvalidArgument {
                reason: "position is past the last page",
            });
        }
        self.store.remove_at(position, &mut self.factory);
        Ok(())
    }

    /// Finds the position currently backing `slot`, or `None` when the content
    /// no longer belongs to any page.
    pub fn resolve_position(&self, slot: &PageSlot<F::Handle>) -> Option<usize> {
        match slot {
            PageSlot::Sentinel => Some(SENTINEL_POSITION),
            PageSlot::Content(handle) => self.store.position_of(handle),
        }
    }

    /// Returns live content at `position`, creating it if needed.
    ///
    /// `Ok(None)` means the position lies beyond the staged count. A factory
    /// error leaves the slot empty so the next call retries.
    pub fn instantiate(
        &mut self,
        position: usize,
    ) -> Result<Option<PageSlot<F::Handle>>, PagerError> {
        if position == SENTINEL_POSITION {
            return Ok(Some(PageSlot::Sentinel));
        }
        if position > self.staged_count {
            return Ok(None);
        }

        let record = self.store.record_mut(position);
        if let Some(handle) = &record.content {
            return Ok(Some(PageSlot::Content(handle.clone())));
        }

        let handle = self
            .factory
            .create_content(position)
            .map_err(|source| {
                log::warn!("content creation failed for page {position}: {source}");
                PagerError::ContentCreation { position, source }
            })?;

        if let Some(state) = &record.saved_state {
            self.factory.attach_saved_state(&handle, state);
        }
        self.factory.set_user_visible(&handle, false);
        record.content = Some(handle.clone());
        Ok(Some(PageSlot::Content(handle)))
    }

    /// Captures the state of the content at `position` and releases it.
    pub fn destroy(&mut self, position: usize) {
        let Some(record) = self.store.get_mut(position) else {
            return;
        };
        if let Some(handle) = record.content.take() {
            record.saved_state = self.factory.save_state(&handle);
            self.factory.destroy_content(&handle);
        }
    }

    pub fn get_page(&self, position: usize) -> Option<&F::Handle> {
        self.store.get(position)?.content.as_ref()
    }

    pub fn primary_item(&self) -> Option<&PageSlot<F::Handle>> {
        self.primary_item.as_ref()
    }

    pub fn set_primary_item(&mut self, slot: Option<PageSlot<F::Handle>>) {
        if self.primary_item == slot {
            return;
        }
        if let Some(PageSlot::Content(previous)) = &self.primary_item {
            self.factory.set_user_visible(previous, false);
        }
        if let Some(PageSlot::Content(next)) = &slot {
            self.factory.set_user_visible(next, true);
        }
        self.primary_item = slot;
    }

    /// Positions a host should keep materialized around `current`.
    pub fn retained_range(&self, current: usize, offscreen_limit: usize) -> Range<usize> {
        let total = self.total_page_count();
        let start = current.saturating_sub(offscreen_limit).min(total);
        let end = current
            .saturating_add(offscreen_limit)
            .saturating_add(1)
            .min(total);
        start..end.max(start)
    }

    pub fn save(&self) -> PagerBundle<F::State, F::Reference> {
        PagerBundle {
            committed_count: self.committed_count,
            store: self.store.serialize(&self.factory),
        }
    }

    /// Replaces counts and records with a saved layout. Staged and committed
    /// counts both take the saved value.
    ///
    /// Content that was live before the restore and is not re-attached by the
    /// bundle is destroyed.
    pub fn restore(&mut self, bundle: PagerBundle<F::State, F::Reference>) -> RestoreReport {
        let PagerBundle {
            committed_count,
            store,
        } = bundle;
        let previous: Vec<F::Handle> = self
            .store
            .live_positions()
            .filter_map(|position| self.store.get(position)?.content.clone())
            .collect();

        self.committed_count = committed_count;
        self.staged_count = committed_count;
        self.primary_item = None;
        let report = self.store.deserialize(store, &mut self.factory);
        self.store.ensure_size(SENTINEL_POSITION);

        for handle in previous {
            if self.store.position_of(&handle).is_none() {
                self.factory.destroy_content(&handle);
            }
        }
        report
    }
}

#[cfg(test)]
#[path = "tests/pagination_tests.rs"]
mod tests;
