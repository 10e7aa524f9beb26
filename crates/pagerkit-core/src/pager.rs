//! The pager facade tying the engine, coordinator and queue together.

use std::cell::RefCell;
use std::fmt;
use std::ops::Range;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};

use smallvec::SmallVec;

use crate::config::PagerConfig;
use crate::content::PageFactory;
use crate::host::PagerHost;
use crate::listeners::{ListenerId, PageChangeDispatcher, PageEvent};
use crate::page_store::RestoreReport;
use crate::pagination::{PagerBundle, PaginationEngine};
use crate::platform::TaskScheduler;
use crate::swipe_guard::GuardContext;
use crate::task_queue::PausableTaskQueue;
use crate::transition::{TransitionContext, TransitionCoordinator, TransitionState};
use crate::{PageSlot, PagerError};

type TransitionListener = Rc<dyn Fn(TransitionState)>;

/// Structural change sent from another thread through [`RemotePager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerCommand {
    RequestCount(usize),
    ItemRemoved(usize),
}

/// `Send` handle for requesting structural changes from background work.
///
/// Commands are applied on the pager's owning thread during the next
/// [`Pager::run_tick`], in the order they were sent.
#[derive(Clone)]
pub struct RemotePager {
    tx: mpsc::Sender<PagerCommand>,
    pending: Arc<AtomicUsize>,
    scheduler: Arc<dyn TaskScheduler>,
}

impl RemotePager {
    pub fn request_count(&self, count: usize) {
        self.send(PagerCommand::RequestCount(count));
    }

    pub fn notify_item_removed(&self, position: usize) {
        self.send(PagerCommand::ItemRemoved(position));
    }

    fn send(&self, command: PagerCommand) {
        self.pending.fetch_add(1, Ordering::SeqCst);
        if self.tx.send(command).is_err() {
            // The pager is gone; nothing will ever drain this.
            self.pending.fetch_sub(1, Ordering::SeqCst);
            return;
        }
        self.scheduler.schedule_tick();
    }
}

impl fmt::Debug for RemotePager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemotePager")
            .field("pending", &self.pending.load(Ordering::SeqCst))
            .finish()
    }
}

struct PagerInner<F: PageFactory, H: PagerHost> {
    engine: RefCell<PaginationEngine<F>>,
    host: RefCell<H>,
    coordinator: RefCell<TransitionCoordinator>,
    page_events: RefCell<PageChangeDispatcher>,
    transition_listeners: RefCell<SmallVec<[TransitionListener; 2]>>,
    queue: PausableTaskQueue,
    remote_tx: mpsc::Sender<PagerCommand>,
    remote_rx: RefCell<mpsc::Receiver<PagerCommand>>,
    remote_pending: Arc<AtomicUsize>,
    scheduler: Arc<dyn TaskScheduler>,
    config: PagerConfig,
}

impl<F: PageFactory, H: PagerHost> PagerInner<F, H> {
    fn with_transition<R>(
        &self,
        step: impl FnOnce(&mut TransitionCoordinator, &mut TransitionContext<'_, F, H>) -> R,
    ) -> R {
        let result = {
            let mut coordinator = self.coordinator.borrow_mut();
            let mut engine = self.engine.borrow_mut();
            let mut host = self.host.borrow_mut();
            let mut page_events = self.page_events.borrow_mut();
            let mut cx = TransitionContext {
                engine: &mut *engine,
                host: &mut *host,
                queue: &self.queue,
                page_events: &mut *page_events,
            };
            step(&mut *coordinator, &mut cx)
        };
        self.flush_notifications();
        result
    }

    /// Delivers transition and page events once nothing is borrowed, so
    /// listeners may call back into the pager.
    fn flush_notifications(&self) {
        let entered = self.coordinator.borrow_mut().take_entered_states();
        if !entered.is_empty() {
            let listeners: SmallVec<[TransitionListener; 2]> =
                self.transition_listeners.borrow().iter().cloned().collect();
            for state in entered {
                for listener in &listeners {
                    listener(state);
                }
            }
        }
        let deliveries = self.page_events.borrow_mut().take_deliveries();
        if !deliveries.is_empty() {
            deliveries.deliver();
        }
    }
}

/// Paginated content controller with a permanent empty page at position 0.
///
/// `Pager` is a cheap, single-threaded handle; clones share the same state.
/// All calls must happen on the thread that created it. Use [`Pager::remote`]
/// to request changes from elsewhere.
pub struct Pager<F: PageFactory, H: PagerHost> {
    inner: Rc<PagerInner<F, H>>,
}

impl<F: PageFactory, H: PagerHost> Clone for Pager<F, H> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<F, H> Pager<F, H>
where
    F: PageFactory + 'static,
    H: PagerHost + 'static,
{
    pub fn new(factory: F, host: H, scheduler: Arc<dyn TaskScheduler>) -> Self {
        Self::with_config(factory, host, scheduler, PagerConfig::default())
    }

    pub fn with_config(
        factory: F,
        host: H,
        scheduler: Arc<dyn TaskScheduler>,
        config: PagerConfig,
    ) -> Self {
        let (remote_tx, remote_rx) = mpsc::channel();
        let inner = PagerInner {
            engine: RefCell::new(PaginationEngine::new(factory)),
            host: RefCell::new(host),
            coordinator: RefCell::new(TransitionCoordinator::new(&config)),
            page_events: RefCell::new(PageChangeDispatcher::new()),
            transition_listeners: RefCell::new(SmallVec::new()),
            queue: PausableTaskQueue::new(Arc::clone(&scheduler)),
            remote_tx,
            remote_rx: RefCell::new(remote_rx),
            remote_pending: Arc::new(AtomicUsize::new(0)),
            scheduler,
            config,
        };
        Self {
            inner: Rc::new(inner),
        }
    }

    pub fn config(&self) -> &PagerConfig {
        &self.inner.config
    }

    // ── Structural changes ──────────────────────────────────────────────

    /// Requests `count` real pages. The change is committed asynchronously by
    /// the transition coordinator.
    pub fn request_count(&self, count: usize) {
        self.inner.queue.assert_owner_thread();
        let change = self.inner.engine.borrow_mut().request_count(count);
        log::debug!(
            "page count requested: {} (staged was {}, committed {})",
            change.staged,
            change.previous_staged,
            change.committed
        );
        self.post_staged_changed();
    }

    /// Like [`Pager::request_count`], for callers holding signed counts.
    pub fn request_count_signed(&self, count: i64) -> Result<(), PagerError> {
        let count = usize::try_from(count).map_err(|_| PagerError::InvalidArgument {
            reason: "page count cannot be negative",
        })?;
        self.request_count(count);
        Ok(())
    }

    /// Drops the page at `position`, tearing down its content. Call this
    /// before the [`Pager::request_count`] that reflects the removal.
    pub fn notify_item_removed(&self, position: usize) -> Result<(), PagerError> {
        self.inner.queue.assert_owner_thread();
        self.inner.engine.borrow_mut().remove_page(position)
    }

    fn post_staged_changed(&self) {
        let weak: Weak<PagerInner<F, H>> = Rc::downgrade(&self.inner);
        self.inner.queue.post(move || {
            if let Some(inner) = weak.upgrade() {
                inner.with_transition(|coordinator, cx| coordinator.on_staged_changed(cx));
            }
        });
    }

    pub fn remote(&self) -> RemotePager {
        RemotePager {
            tx: self.inner.remote_tx.clone(),
            pending: Arc::clone(&self.inner.remote_pending),
            scheduler: Arc::clone(&self.inner.scheduler),
        }
    }

    // ── Driving ─────────────────────────────────────────────────────────

    /// Applies commands from [`RemotePager`] handles, then runs at most one
    /// queued task. Returns whether anything happened.
    pub fn run_tick(&self) -> bool {
        let applied = self.drain_remote();
        let ran = self.inner.queue.run_tick();
        applied || ran
    }

    fn drain_remote(&self) -> bool {
        let commands: SmallVec<[PagerCommand; 4]> =
            self.inner.remote_rx.borrow().try_iter().collect();
        for command in &commands {
            self.inner.remote_pending.fetch_sub(1, Ordering::SeqCst);
            match *command {
                PagerCommand::RequestCount(count) => self.request_count(count),
                PagerCommand::ItemRemoved(position) => {
                    if let Err(err) = self.notify_item_removed(position) {
                        log::warn!("remote removal of page {position} rejected: {err}");
                    }
                }
            }
        }
        !commands.is_empty()
    }

    /// Whether [`Pager::run_tick`] has work to do.
    pub fn has_pending_work(&self) -> bool {
        self.inner.queue.has_requested_tick()
            || self.inner.remote_pending.load(Ordering::SeqCst) > 0
    }

    pub fn pending_tasks(&self) -> usize {
        self.inner.queue.pending_tasks()
    }

    /// Host signal: a scroll started by the pager has come to rest.
    pub fn on_scroll_idle(&self) {
        self.inner
            .with_transition(|coordinator, cx| coordinator.on_scroll_idle(cx));
    }

    /// Host signal: the last requested structural refresh has been rendered.
    pub fn on_structural_refresh_rendered(&self) {
        self.inner.with_transition(|coordinator, cx| {
            coordinator.on_structural_refresh_rendered(cx)
        });
    }

    // ── Host-facing lifecycle ───────────────────────────────────────────

    pub fn total_page_count(&self) -> usize {
        self.inner.engine.borrow().total_page_count()
    }

    pub fn committed_count(&self) -> usize {
        self.inner.engine.borrow().committed_count()
    }

    pub fn staged_count(&self) -> usize {
        self.inner.engine.borrow().staged_count()
    }

    pub fn get_page(&self, position: usize) -> Option<F::Handle> {
        self.inner.engine.borrow().get_page(position).cloned()
    }

    pub fn instantiate(&self, position: usize) -> Result<Option<PageSlot<F::Handle>>, PagerError> {
        self.inner.engine.borrow_mut().instantiate(position)
    }

    pub fn destroy(&self, position: usize) {
        self.inner.engine.borrow_mut().destroy(position);
    }

    pub fn resolve_position(&self, slot: &PageSlot<F::Handle>) -> Option<usize> {
        self.inner.engine.borrow().resolve_position(slot)
    }

    pub fn primary_item(&self) -> Option<PageSlot<F::Handle>> {
        self.inner.engine.borrow().primary_item().cloned()
    }

    pub fn set_primary_item(&self, slot: Option<PageSlot<F::Handle>>) {
        self.inner.engine.borrow_mut().set_primary_item(slot);
    }

    pub fn retained_range(&self, current: usize) -> Range<usize> {
        self.inner
            .engine
            .borrow()
            .retained_range(current, self.inner.config.offscreen_page_limit)
    }

    pub fn transition_state(&self) -> TransitionState {
        self.inner.coordinator.borrow().state()
    }

    pub fn is_input_enabled(&self) -> bool {
        self.inner.coordinator.borrow().is_input_enabled()
    }

    pub fn is_overlay_shown(&self) -> bool {
        self.inner.coordinator.borrow().is_overlay_shown()
    }

    pub fn guard_context(&self) -> GuardContext {
        GuardContext {
            input_enabled: self.is_input_enabled(),
            current: self.inner.host.borrow().current_item(),
            total_page_count: self.total_page_count(),
        }
    }

    pub fn with_host<R>(&self, f: impl FnOnce(&H) -> R) -> R {
        f(&self.inner.host.borrow())
    }

    pub fn with_factory<R>(&self, f: impl FnOnce(&F) -> R) -> R {
        f(self.inner.engine.borrow().factory())
    }

    // ── Listeners ───────────────────────────────────────────────────────

    /// Reports a page event from the host. Held back while a disruptive
    /// transition is running.
    pub fn dispatch_page_event(&self, event: PageEvent) {
        self.inner.page_events.borrow_mut().submit(event);
        self.inner.flush_notifications();
    }

    pub fn add_page_change_listener(&self, listener: impl Fn(PageEvent) + 'static) -> ListenerId {
        self.inner.page_events.borrow_mut().add_listener(listener)
    }

    pub fn remove_page_change_listener(&self, id: ListenerId) -> bool {
        self.inner.page_events.borrow_mut().remove_listener(id)
    }

    pub fn clear_page_change_listeners(&self) {
        self.inner.page_events.borrow_mut().clear_listeners();
    }

    /// Observes every coordinator state entered, in order.
    pub fn add_transition_listener(&self, listener: impl Fn(TransitionState) + 'static) {
        self.inner
            .transition_listeners
            .borrow_mut()
            .push(Rc::new(listener));
    }

    // ── Persistence ─────────────────────────────────────────────────────

    pub fn save(&self) -> PagerBundle<F::State, F::Reference> {
        self.inner.engine.borrow().save()
    }

    /// Restores a saved layout and asks the host to refresh. Unresolvable
    /// content references are reported and logged, never fatal.
    ///
    /// Fails with [`PagerError::TransitionInFlight`] unless the pager is idle.
    pub fn restore(
        &self,
        bundle: PagerBundle<F::State, F::Reference>,
    ) -> Result<RestoreReport, PagerError> {
        self.inner.queue.assert_owner_thread();
        if self.transition_state() != TransitionState::Idle {
            return Err(PagerError::TransitionInFlight);
        }
        let report = self.inner.engine.borrow_mut().restore(bundle);
        self.inner.host.borrow_mut().request_structural_refresh();
        Ok(report)
    }
}

impl<F: PageFactory, H: PagerHost> fmt::Debug for Pager<F, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let engine = self.inner.engine.borrow();
        f.debug_struct("Pager")
            .field("committed_count", &engine.committed_count())
            .field("staged_count", &engine.staged_count())
            .field("state", &self.inner.coordinator.borrow().state())
            .field("queue", &self.inner.queue)
            .finish()
    }
}
