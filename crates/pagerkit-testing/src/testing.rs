use std::cell::{Ref, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;
use std::sync::Arc;

use pagerkit_core::{
    PageEvent, PageSlot, Pager, PagerBundle, PagerConfig, PagerError, RestoreReport, ScrollState,
    SwipeGuard, TouchPhase, TouchVerdict, TransitionState,
};
use pagerkit_runtime_std::StdScheduler;

use crate::fake_factory::{ContentId, FakePageFactory, FakeState};
use crate::fake_host::{FakeHost, HostCommand, HostState};

pub type TestPager = Pager<FakePageFactory, FakeHost>;

/// Headless harness that plays the hosting view for a [`Pager`].
///
/// `PagerTestRule` owns a [`FakeHost`] and applies its queued commands the
/// way a view would on later frames: scrolls move the current page, refreshes
/// re-resolve attached content, and every refresh is eventually reported back
/// as rendered. Pages around the current one are kept materialized using the
/// pager's retained range.
pub struct PagerTestRule {
    pager: TestPager,
    factory: FakePageFactory,
    scheduler: Arc<StdScheduler>,
    host: Rc<RefCell<HostState>>,
    attached: BTreeMap<usize, PageSlot<ContentId>>,
    refresh_pending: bool,
    guard: SwipeGuard,
    creation_failures: Vec<PagerError>,
    page_events: Rc<RefCell<Vec<PageEvent>>>,
    transitions: Rc<RefCell<Vec<TransitionState>>>,
}

impl PagerTestRule {
    /// Creates a rule over the given item titles. The pager starts empty;
    /// call [`PagerTestRule::request_count`] to show items.
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_config(items, PagerConfig::default())
    }

    pub fn with_config<I, S>(items: I, config: PagerConfig) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_factory(FakePageFactory::new(items), config)
    }

    /// Creates a rule whose pager immediately restores `bundle`. The factory
    /// decides which saved content references still resolve.
    pub fn restored(
        factory: FakePageFactory,
        config: PagerConfig,
        bundle: PagerBundle<FakeState, String>,
    ) -> (Self, RestoreReport) {
        let mut rule = Self::from_factory(factory, config);
        let report = rule
            .pager
            .restore(bundle)
            .expect("a freshly built pager is idle");
        rule.pump_until_idle();
        (rule, report)
    }

    fn from_factory(factory: FakePageFactory, config: PagerConfig) -> Self {
        let scheduler = Arc::new(StdScheduler::new());
        let host = FakeHost::new();
        let host_state = host.state();
        let pager = Pager::with_config(factory.clone(), host, scheduler.clone(), config);

        let page_events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&page_events);
        pager.add_page_change_listener(move |event| sink.borrow_mut().push(event));

        let transitions = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&transitions);
        pager.add_transition_listener(move |state| sink.borrow_mut().push(state));

        let mut rule = Self {
            pager,
            factory,
            scheduler,
            host: host_state,
            attached: BTreeMap::new(),
            refresh_pending: false,
            guard: SwipeGuard::new(),
            creation_failures: Vec::new(),
            page_events,
            transitions,
        };
        rule.populate();
        rule
    }

    pub fn pager(&self) -> &TestPager {
        &self.pager
    }

    pub fn factory(&self) -> &FakePageFactory {
        &self.factory
    }

    pub fn scheduler(&self) -> Arc<StdScheduler> {
        Arc::clone(&self.scheduler)
    }

    pub fn host_state(&self) -> Ref<'_, HostState> {
        self.host.borrow()
    }

    pub fn current(&self) -> usize {
        self.host.borrow().current
    }

    pub fn title_at(&self, position: usize) -> Option<String> {
        let id = self.pager.get_page(position)?;
        self.factory
            .registry()
            .borrow()
            .title_of(id)
            .map(str::to_owned)
    }

    pub fn current_title(&self) -> Option<String> {
        self.title_at(self.current())
    }

    /// Positions that became current, in order, starting with the empty page.
    pub fn shown_positions(&self) -> Vec<usize> {
        self.host.borrow().shown.clone()
    }

    pub fn creation_failures(&self) -> &[PagerError] {
        &self.creation_failures
    }

    pub fn take_page_events(&self) -> Vec<PageEvent> {
        std::mem::take(&mut *self.page_events.borrow_mut())
    }

    pub fn take_transition_trace(&self) -> Vec<TransitionState> {
        std::mem::take(&mut *self.transitions.borrow_mut())
    }

    // ─── Driving the pager ──────────────────────────────────────────────

    pub fn request_count(&self, count: usize) {
        self.pager.request_count(count);
    }

    /// Removes the item shown at `position` from the data and tells the pager.
    pub fn remove_item(&self, position: usize) -> Result<String, PagerError> {
        self.pager.notify_item_removed(position)?;
        let index = position - 1;
        if index < self.factory.registry().borrow().items().len() {
            Ok(self.factory.remove_item(index))
        } else {
            Ok(String::new())
        }
    }

    /// Simulates the user settling on `position`.
    pub fn set_current_item(&self, position: usize, smooth: bool) {
        self.host
            .borrow_mut()
            .commands
            .push_back(HostCommand::ScrollTo { position, smooth });
    }

    /// Runs a touch phase through the swipe guard.
    pub fn touch(&mut self, phase: TouchPhase) -> TouchVerdict {
        let cx = self.pager.guard_context();
        self.guard.on_touch(&cx, phase)
    }

    /// Runs pager ticks and host commands until neither makes progress.
    pub fn pump_until_idle(&mut self) {
        let mut iterations = 0;
        loop {
            iterations += 1;
            if iterations > 1000 {
                panic!("pump_until_idle looped too many times!");
            }
            let mut progressed = false;

            self.scheduler.take_tick_request();
            if self.pager.run_tick() {
                progressed = true;
            }

            let command = self.host.borrow_mut().commands.pop_front();
            match command {
                Some(HostCommand::ScrollTo { position, smooth }) => {
                    self.apply_scroll(position, smooth);
                    progressed = true;
                }
                Some(HostCommand::Refresh) => {
                    self.apply_refresh();
                    progressed = true;
                }
                None if self.refresh_pending => {
                    self.refresh_pending = false;
                    self.pager.on_structural_refresh_rendered();
                    progressed = true;
                }
                None => {}
            }

            if !progressed {
                break;
            }
        }
    }

    fn apply_scroll(&mut self, position: usize, smooth: bool) {
        let last = self.pager.total_page_count().saturating_sub(1);
        let target = position.min(last);
        if smooth {
            self.pager
                .dispatch_page_event(PageEvent::ScrollStateChanged(ScrollState::Settling));
        }
        let moved = self.move_to(target);
        self.populate();
        if moved {
            self.pager.dispatch_page_event(PageEvent::Selected(target));
        }
        if smooth {
            self.pager
                .dispatch_page_event(PageEvent::ScrollStateChanged(ScrollState::Idle));
            self.pager.on_scroll_idle();
        }
    }

    fn apply_refresh(&mut self) {
        let total = self.pager.total_page_count();
        let current = self.current();
        let primary_position = self
            .attached
            .get(&current)
            .and_then(|slot| self.pager.resolve_position(slot));

        for (_, slot) in std::mem::take(&mut self.attached) {
            match self.pager.resolve_position(&slot) {
                Some(position) if position < total => {
                    self.attached.insert(position, slot);
                }
                Some(position) => self.pager.destroy(position),
                None => {}
            }
        }

        let target = primary_position
            .unwrap_or(current)
            .min(total.saturating_sub(1));
        if self.move_to(target) {
            self.pager.dispatch_page_event(PageEvent::Selected(target));
        }
        self.populate();
        self.refresh_pending = true;
    }

    fn move_to(&self, target: usize) -> bool {
        let mut host = self.host.borrow_mut();
        if host.current == target {
            return false;
        }
        host.current = target;
        host.shown.push(target);
        true
    }

    fn populate(&mut self) {
        let current = self.current();
        let range = self.pager.retained_range(current);

        let stale: Vec<usize> = self
            .attached
            .keys()
            .copied()
            .filter(|position| !range.contains(position))
            .collect();
        for position in stale {
            let Some(slot) = self.attached.remove(&position) else {
                continue;
            };
            if let Some(actual) = self.pager.resolve_position(&slot) {
                self.pager.destroy(actual);
            }
        }

        for position in range {
            if self.attached.contains_key(&position) {
                continue;
            }
            match self.pager.instantiate(position) {
                Ok(Some(slot)) => {
                    self.attached.insert(position, slot);
                }
                Ok(None) => {}
                Err(err) => {
                    log::warn!("page {position} failed to materialize: {err}");
                    self.creation_failures.push(err);
                }
            }
        }

        self.pager
            .set_primary_item(self.attached.get(&current).cloned());
    }
}

/// Runs `f` against a rule already showing every item, settled on page 1.
pub fn run_pager_test<R, I, S>(items: I, f: impl FnOnce(&mut PagerTestRule) -> R) -> R
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut rule = PagerTestRule::new(items);
    let count = rule.factory.registry().borrow().items().len();
    rule.request_count(count);
    rule.pump_until_idle();
    rule.take_page_events();
    rule.take_transition_trace();
    f(&mut rule)
}

#[cfg(test)]
#[path = "tests/testing_tests.rs"]
mod tests;
