//! Pager configuration.

/// Tunables for a [`Pager`](crate::Pager).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PagerConfig {
    /// Number of pages to keep materialized on each side of the current one.
    /// Default is 1, matching a pager's usual offscreen limit.
    pub offscreen_page_limit: usize,

    /// Whether a disruptive removal hides the structural swap behind a
    /// snapshot overlay.
    pub freeze_with_snapshot: bool,

    /// Whether the pager moves to the first real page when the sequence goes
    /// from empty to non-empty.
    pub select_first_page_when_populated: bool,
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self {
            offscreen_page_limit: 1,
            freeze_with_snapshot: true,
            select_first_page_when_populated: true,
        }
    }
}

impl PagerConfig {
    /// Creates a configuration with the given offscreen limit.
    pub fn new(offscreen_page_limit: usize) -> Self {
        Self {
            offscreen_page_limit,
            ..Self::default()
        }
    }

    /// Disables the snapshot overlay. Removals still navigate to a neighbour
    /// first, but the swap underneath is not hidden.
    pub fn without_snapshot(mut self) -> Self {
        self.freeze_with_snapshot = false;
        self
    }

    /// Keeps the empty page selected after the first pages are added.
    pub fn without_first_page_selection(mut self) -> Self {
        self.select_first_page_when_populated = false;
        self
    }
}
