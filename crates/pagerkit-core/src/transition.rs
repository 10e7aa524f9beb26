//! Transition coordinator.
//!
//! Committing a new page count is trivial unless the page the user is looking
//! at has just been removed. In that case the host would jump to whatever page
//! now occupies the position, which is visible as a flicker. The coordinator
//! hides it:
//!
//! 1. `Navigating`: input is disabled, page events are buffered, and the host
//!    scrolls to a neighbour that survives the change.
//! 2. `Committing`: once scrolling is idle, the surface is frozen behind a
//!    snapshot, the staged count is committed and the host refreshes; the host
//!    then jumps without animation to the slot the neighbour now occupies.
//! 3. `Settling`: once that refresh has rendered, the overlay comes down,
//!    input and buffered events are released and the task queue resumes.
//!
//! Each step is triggered by an explicit host event; nothing waits or polls.
//! A commit that needs no navigation still holds the task queue until its
//! refresh has rendered, so every rendered signal belongs to the most recent
//! commit.

use smallvec::SmallVec;

use crate::config::PagerConfig;
use crate::content::PageFactory;
use crate::host::PagerHost;
use crate::listeners::PageChangeDispatcher;
use crate::pagination::PaginationEngine;
use crate::task_queue::PausableTaskQueue;
use crate::{FIRST_PAGE_POSITION, SENTINEL_POSITION};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionState {
    Idle,
    Resolving,
    Navigating,
    Committing,
    Settling,
}

/// Where the user is parked while the shown page disappears.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Landing {
    /// Back one page; the removed page was the last one.
    Previous(usize),
    /// Forward one page.
    Next(usize),
    /// No surviving neighbour. Moves straight to the last staged position the
    /// host still renders and skips the snapshot overlay.
    Fallback(usize),
}

impl Landing {
    pub fn position(self) -> usize {
        match self {
            Landing::Previous(position) | Landing::Next(position) | Landing::Fallback(position) => {
                position
            }
        }
    }

    pub fn freezes(self) -> bool {
        !matches!(self, Landing::Fallback(_))
    }
}

/// Picks the landing position for a disruptive removal.
///
/// `committed_total` is the page count the host is still showing (empty page
/// included); `staged_count` is the requested count of real pages. The
/// previous neighbour only counts when it is a real page, so removing the
/// only page falls through to the empty page without an overlay.
pub fn choose_landing(current: usize, committed_total: usize, staged_count: usize) -> Landing {
    let last = committed_total.saturating_sub(1);
    let staged_last = staged_count + 1;
    let previous = current.saturating_sub(1);
    let next = current + 1;
    if current == last && previous >= FIRST_PAGE_POSITION && previous <= staged_last {
        Landing::Previous(previous)
    } else if next <= staged_last && next <= last {
        Landing::Next(next)
    } else {
        Landing::Fallback(staged_count.min(last))
    }
}

/// Mutable collaborators a transition step works on.
pub struct TransitionContext<'a, F: PageFactory, H: PagerHost> {
    pub engine: &'a mut PaginationEngine<F>,
    pub host: &'a mut H,
    pub queue: &'a PausableTaskQueue,
    pub page_events: &'a mut PageChangeDispatcher,
}

#[derive(Debug)]
pub struct TransitionCoordinator {
    state: TransitionState,
    landing: Option<Landing>,
    removed_position: Option<usize>,
    deferred_selection: Option<usize>,
    overlay_shown: bool,
    input_enabled: bool,
    freeze_with_snapshot: bool,
    select_first_page: bool,
    entered: SmallVec<[TransitionState; 8]>,
}

impl TransitionCoordinator {
    pub fn new(config: &PagerConfig) -> Self {
        Self {
            state: TransitionState::Idle,
            landing: None,
            removed_position: None,
            deferred_selection: None,
            overlay_shown: false,
            input_enabled: true,
            freeze_with_snapshot: config.freeze_with_snapshot,
            select_first_page: config.select_first_page_when_populated,
            entered: SmallVec::new(),
        }
    }

    pub fn state(&self) -> TransitionState {
        self.state
    }

    pub fn landing(&self) -> Option<Landing> {
        self.landing
    }

    pub fn is_input_enabled(&self) -> bool {
        self.input_enabled
    }

    pub fn is_overlay_shown(&self) -> bool {
        self.overlay_shown
    }

    /// States entered since the last call, oldest first.
    pub fn take_entered_states(&mut self) -> SmallVec<[TransitionState; 8]> {
        std::mem::take(&mut self.entered)
    }

    fn enter(&mut self, next: TransitionState) {
        log::debug!("pager transition {:?} -> {:?}", self.state, next);
        self.state = next;
        self.entered.push(next);
    }

    /// Runs a drained "staged changed" task.
    ///
    /// # Panics
    ///
    /// Panics when a transition is already in flight. Structural changes must
    /// reach the coordinator through the task queue, which is paused for the
    /// whole disruptive sequence.
    pub fn on_staged_changed<F: PageFactory, H: PagerHost>(
        &mut self,
        cx: &mut TransitionContext<'_, F, H>,
    ) {
        assert_eq!(
            self.state,
            TransitionState::Idle,
            "structural change reached the pager mid-transition; post it through the task queue"
        );
        self.enter(TransitionState::Resolving);

        let disrupted = cx
            .engine
            .primary_item()
            .is_some_and(|primary| cx.engine.resolve_position(primary).is_none());

        if disrupted {
            self.begin_navigation(cx);
        } else {
            self.commit_in_place(cx);
        }
    }

    fn commit_in_place<F: PageFactory, H: PagerHost>(
        &mut self,
        cx: &mut TransitionContext<'_, F, H>,
    ) {
        self.enter(TransitionState::Committing);
        let previous_total = cx.engine.commit_staged();
        // Held until the refresh renders so its signal cannot settle a later transition.
        cx.queue.set_paused(true);
        cx.host.request_structural_refresh();
        if self.select_first_page && previous_total == 1 && cx.engine.total_page_count() >= 2 {
            self.deferred_selection = Some(FIRST_PAGE_POSITION);
        }
        self.enter(TransitionState::Idle);
    }

    fn begin_navigation<F: PageFactory, H: PagerHost>(
        &mut self,
        cx: &mut TransitionContext<'_, F, H>,
    ) {
        self.enter(TransitionState::Navigating);
        cx.queue.set_paused(true);
        self.set_input_enabled(cx.host, false);
        cx.page_events.set_enabled(false);
        self.deferred_selection = None;

        let current = cx.host.current_item();
        let landing = choose_landing(
            current,
            cx.engine.total_page_count(),
            cx.engine.staged_count(),
        );
        log::debug!("page {current} disappeared; landing {landing:?}");
        self.landing = Some(landing);
        self.removed_position = Some(current);

        if !landing.freezes() {
            // The jump is not hidden, so listeners see it as it happens.
            cx.page_events.set_enabled(true);
        }

        if landing.position() == current {
            self.on_scroll_idle(cx);
        } else {
            cx.host.set_current_item(landing.position(), true);
        }
    }

    /// Host signal: scrolling has come to rest. Ignored outside `Navigating`.
    pub fn on_scroll_idle<F: PageFactory, H: PagerHost>(
        &mut self,
        cx: &mut TransitionContext<'_, F, H>,
    ) {
        if self.state != TransitionState::Navigating {
            return;
        }
        let Some(landing) = self.landing else {
            return;
        };
        self.enter(TransitionState::Committing);

        if landing.freezes() && self.freeze_with_snapshot {
            match cx.host.capture_snapshot() {
                Some(snapshot) => {
                    cx.host.show_overlay(snapshot);
                    self.overlay_shown = true;
                }
                None => log::debug!("snapshot unavailable; committing without an overlay"),
            }
        }

        cx.engine.commit_staged();
        cx.host.request_structural_refresh();

        if landing.freezes() {
            if let Some(removed) = self.removed_position {
                let last = cx.engine.total_page_count() - 1;
                cx.host.set_current_item(removed.min(last), false);
            }
        }

        self.enter(TransitionState::Settling);
    }

    /// Host signal: the last requested structural refresh has been rendered.
    pub fn on_structural_refresh_rendered<F: PageFactory, H: PagerHost>(
        &mut self,
        cx: &mut TransitionContext<'_, F, H>,
    ) {
        match self.state {
            TransitionState::Settling => {
                if std::mem::take(&mut self.overlay_shown) {
                    cx.host.hide_overlay();
                }
                self.set_input_enabled(cx.host, true);
                cx.page_events.set_enabled(true);
                self.landing = None;
                self.removed_position = None;
                self.enter(TransitionState::Idle);
                cx.queue.set_paused(false);
            }
            TransitionState::Idle => {
                cx.queue.set_paused(false);
                if let Some(position) = self.deferred_selection.take() {
                    if position < cx.engine.total_page_count() && position != SENTINEL_POSITION {
                        cx.host.set_current_item(position, true);
                    }
                }
            }
            _ => {}
        }
    }

    fn set_input_enabled<H: PagerHost>(&mut self, host: &mut H, enabled: bool) {
        self.input_enabled = enabled;
        host.set_input_enabled(enabled);
    }
}

#[cfg(test)]
#[path = "tests/transition_tests.rs"]
mod tests;
