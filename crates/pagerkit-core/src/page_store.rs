//! Index-addressed page records.
//!
//! Records are identified purely by position. The store only grows through
//! [`PageStore::ensure_size`] (or [`PageStore::record_mut`], which calls it),
//! and only shrinks through [`PageStore::remove_at`], which shifts every later
//! record down by one.

use std::collections::BTreeMap;

use smallvec::SmallVec;

use crate::content::PageFactory;
use crate::{PagerError, SENTINEL_POSITION};

/// Live content and saved state for one position.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRecord<H, S> {
    pub content: Option<H>,
    pub saved_state: Option<S>,
}

impl<H, S> Default for PageRecord<H, S> {
    fn default() -> Self {
        Self {
            content: None,
            saved_state: None,
        }
    }
}

impl<H, S> PageRecord<H, S> {
    pub fn is_live(&self) -> bool {
        self.content.is_some()
    }
}

/// Persisted form of a [`PageStore`].
///
/// Only saved states are stored by value. Live content is recorded as an
/// external reference so the same content can be re-attached after a restore
/// without losing its own render state.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StoreBundle<S, R> {
    pub states: Vec<Option<S>>,
    pub live_references: BTreeMap<usize, R>,
}

impl<S, R> Default for StoreBundle<S, R> {
    fn default() -> Self {
        Self {
            states: Vec::new(),
            live_references: BTreeMap::new(),
        }
    }
}

/// Outcome of [`PageStore::deserialize`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreReport {
    /// Positions whose live content was re-attached.
    pub reattached: SmallVec<[usize; 4]>,
    /// Positions whose reference could not be resolved. These come back
    /// without live content and are recreated on demand.
    pub unresolved: SmallVec<[usize; 4]>,
}

impl RestoreReport {
    pub fn is_clean(&self) -> bool {
        self.unresolved.is_empty()
    }

    /// One [`PagerError::RestoreReferenceUnresolved`] per unresolved position.
    pub fn unresolved_errors(&self) -> impl Iterator<Item = PagerError> + '_ {
        self.unresolved
            .iter()
            .map(|&position| PagerError::RestoreReferenceUnresolved { position })
    }
}

#[derive(Debug, Clone)]
pub struct PageStore<H, S> {
    records: Vec<PageRecord<H, S>>,
}

impl<H, S> Default for PageStore<H, S> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<H, S> PageStore<H, S>
where
    H: Clone + PartialEq,
    S: Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Appends empty records until `index` is addressable. Returns the number
    /// of records appended; an index with no representable length appends
    /// nothing.
    pub fn ensure_size(&mut self, index: usize) -> usize {
        let Some(required) = index.checked_add(1) else {
            log::warn!("page store cannot address index {index}");
            return 0;
        };
        let current = self.records.len();
        if required <= current {
            return 0;
        }
        self.records.resize_with(required, PageRecord::default);
        required - current
    }

    /// Returns the record at `position` without growing the store.
    pub fn get(&self, position: usize) -> Option<&PageRecord<H, S>> {
        self.records.get(position)
    }

    pub fn get_mut(&mut self, position: usize) -> Option<&mut PageRecord<H, S>> {
        self.records.get_mut(position)
    }

    /// Returns the record at `position`, growing the store if needed.
    ///
    /// # Panics
    ///
    /// Panics when `position` is `usize::MAX`.
    pub fn record_mut(&mut self, position: usize) -> &mut PageRecord<H, S> {
        self.ensure_size(position);
        &mut self.records[position]
    }

    /// Linear scan for the record currently holding `handle`.
    pub fn position_of(&self, handle: &H) -> Option<usize> {
        self.records
            .iter()
            .position(|record| record.content.as_ref() == Some(handle))
    }

    pub fn live_positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.records
            .iter()
            .enumerate()
            .filter(|(_, record)| record.is_live())
            .map(|(position, _)| position)
    }

    /// Tears down live content at `position` and removes its record, shifting
    /// later records down by one. The saved state is discarded with it.
    ///
    /// A position past the end has no record and nothing to shift; an empty
    /// record is returned and the store is left as is.
    pub fn remove_at<F>(&mut self, position: usize, factory: &mut F) -> PageRecord<H, S>
    where
        F: PageFactory<Handle = H, State = S>,
    {
        if position >= self.records.len() {
            return PageRecord::default();
        }
        let record = self.records.remove(position);
        if let Some(handle) = &record.content {
            factory.destroy_content(handle);
        }
        record
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn serialize<F>(&self, factory: &F) -> StoreBundle<S, F::Reference>
    where
        F: PageFactory<Handle = H, State = S>,
    {
        let states = self
            .records
            .iter()
            .map(|record| record.saved_state.clone())
            .collect();
        let live_references = self
            .records
            .iter()
            .enumerate()
            .filter_map(|(position, record)| {
                let handle = record.content.as_ref()?;
                factory
                    .reference_for(handle)
                    .map(|reference| (position, reference))
            })
            .collect();
        StoreBundle {
            states,
            live_references,
        }
    }

    /// Replaces every record with the contents of `bundle`.
    ///
    /// References naming the empty page or a position without a saved record
    /// are reported as unresolved and never attached.
    pub fn deserialize<F>(
        &mut self,
        bundle: StoreBundle<S, F::Reference>,
        factory: &mut F,
    ) -> RestoreReport
    where
        F: PageFactory<Handle = H, State = S>,
    {
        let StoreBundle {
            states,
            live_references,
        } = bundle;

        self.records = states
            .into_iter()
            .map(|saved_state| PageRecord {
                content: None,
                saved_state,
            })
            .collect();

        let mut report = RestoreReport::default();
        for (position, reference) in live_references {
            if position == SENTINEL_POSITION || position >= self.records.len() {
                log::warn!("content reference for out-of-range page {position} dropped");
                report.unresolved.push(position);
                continue;
            }
            match factory.resolve_reference(&reference) {
                Some(handle) => {
                    // Hidden until the host re-attaches it as the primary page.
                    factory.set_user_visible(&handle, false);
                    self.record_mut(position).content = Some(handle);
                    report.reattached.push(position);
                }
                None => {
                    log::warn!("unresolved content reference for page {position}; it will be recreated");
                    report.unresolved.push(position);
                }
            }
        }
        report
    }
}

#[cfg(test)]
#[path = "tests/page_store_tests.rs"]
mod tests;
