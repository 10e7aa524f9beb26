//! Platform abstraction for pager task scheduling.
//!
//! The pager never runs its own event loop. When queued work becomes runnable
//! it asks the host, through [`TaskScheduler`], to call
//! [`Pager::run_tick`](crate::Pager::run_tick) on the owning thread at the
//! next opportunity.

/// Requests ticks from the host's event loop.
///
/// Implementations must be safe to use from multiple threads, since
/// [`RemotePager`](crate::RemotePager) requests ticks from background work.
pub trait TaskScheduler: Send + Sync {
    /// Request that the host call `run_tick` soon.
    fn schedule_tick(&self);
}

/// Scheduler for hosts that poll the pager themselves every frame.
#[derive(Debug, Default)]
pub struct ManualScheduler;

impl TaskScheduler for ManualScheduler {
    fn schedule_tick(&self) {}
}
