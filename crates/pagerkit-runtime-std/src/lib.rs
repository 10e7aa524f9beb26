//! Standard runtime services backed by Rust's `std` library.
//!
//! [`StdScheduler`] implements [`pagerkit_core::TaskScheduler`] with atomics so
//! background threads holding a [`pagerkit_core::RemotePager`] can request
//! ticks. The owning thread polls [`StdScheduler::take_tick_request`] from its
//! event loop, or registers a waker to be told when to poll.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use pagerkit_core::TaskScheduler;

type TickWaker = Arc<dyn Fn() + Send + Sync + 'static>;

/// Scheduler that records tick requests in an atomic flag.
pub struct StdScheduler {
    tick_requested: AtomicBool,
    tick_waker: RwLock<Option<TickWaker>>,
}

impl StdScheduler {
    pub fn new() -> Self {
        Self {
            tick_requested: AtomicBool::new(false),
            tick_waker: RwLock::new(None),
        }
    }

    /// Returns whether a tick has been requested since the last call.
    pub fn take_tick_request(&self) -> bool {
        self.tick_requested.swap(false, Ordering::SeqCst)
    }

    /// Returns whether a tick is requested, without clearing it.
    pub fn is_tick_requested(&self) -> bool {
        self.tick_requested.load(Ordering::SeqCst)
    }

    /// Registers a waker invoked whenever a tick is scheduled. The waker may
    /// run on any thread.
    pub fn set_tick_waker(&self, waker: impl Fn() + Send + Sync + 'static) {
        match self.tick_waker.write() {
            Ok(mut slot) => *slot = Some(Arc::new(waker)),
            Err(poisoned) => *poisoned.into_inner() = Some(Arc::new(waker)),
        }
    }

    /// Clears any registered tick waker.
    pub fn clear_tick_waker(&self) {
        match self.tick_waker.write() {
            Ok(mut slot) => *slot = None,
            Err(poisoned) => *poisoned.into_inner() = None,
        }
    }

    fn wake(&self) {
        let waker = match self.tick_waker.read() {
            Ok(slot) => slot.clone(),
            Err(poisoned) => {
                log::warn!("tick waker lock poisoned; waking anyway");
                poisoned.into_inner().clone()
            }
        };
        if let Some(waker) = waker {
            waker();
        }
    }
}

impl Default for StdScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StdScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StdScheduler")
            .field("tick_requested", &self.tick_requested.load(Ordering::SeqCst))
            .finish()
    }
}

impl TaskScheduler for StdScheduler {
    fn schedule_tick(&self) {
        self.tick_requested.store(true, Ordering::SeqCst);
        self.wake();
    }
}

#[cfg(test)]
#[path = "tests/std_scheduler_tests.rs"]
mod tests;
