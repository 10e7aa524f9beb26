//! Serialized, pausable task queue.
//!
//! Every posted task is followed by an advance marker. A tick runs at most one
//! task and then evaluates that marker: if the queue is still running and more
//! work is waiting, the next tick is requested from the host scheduler. A task
//! that pauses the queue therefore holds back everything posted after it until
//! somebody resumes the queue, which is how transitions are kept from
//! overlapping.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use std::thread::ThreadId;

use crate::platform::TaskScheduler;

enum QueueEntry {
    Task(Box<dyn FnOnce() + 'static>),
    Advance,
}

pub struct PausableTaskQueue {
    entries: RefCell<VecDeque<QueueEntry>>,
    paused: Cell<bool>,
    tick_requested: Cell<bool>,
    scheduler: Arc<dyn TaskScheduler>,
    owner_thread: ThreadId,
}

impl PausableTaskQueue {
    /// Creates a queue owned by the calling thread.
    pub fn new(scheduler: Arc<dyn TaskScheduler>) -> Self {
        Self {
            entries: RefCell::new(VecDeque::new()),
            paused: Cell::new(false),
            tick_requested: Cell::new(false),
            scheduler,
            owner_thread: std::thread::current().id(),
        }
    }

    /// Panics when called off the thread that created the queue.
    pub fn assert_owner_thread(&self) {
        assert_eq!(
            std::thread::current().id(),
            self.owner_thread,
            "pager task queue used off its owning thread"
        );
    }

    pub fn post(&self, task: impl FnOnce() + 'static) {
        self.assert_owner_thread();
        {
            let mut entries = self.entries.borrow_mut();
            entries.push_back(QueueEntry::Task(Box::new(task)));
            entries.push_back(QueueEntry::Advance);
        }
        if !self.paused.get() {
            self.request_tick();
        }
    }

    pub fn set_paused(&self, paused: bool) {
        if self.paused.get() == paused {
            return;
        }
        self.paused.set(paused);
        if !paused {
            self.request_tick();
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused.get()
    }

    /// Number of tasks still waiting to run.
    pub fn pending_tasks(&self) -> usize {
        self.entries
            .borrow()
            .iter()
            .filter(|entry| matches!(entry, QueueEntry::Task(_)))
            .count()
    }

    /// Whether a tick has been requested and not yet run.
    pub fn has_requested_tick(&self) -> bool {
        self.tick_requested.get()
    }

    /// Runs at most one task. Returns whether a task ran.
    pub fn run_tick(&self) -> bool {
        self.assert_owner_thread();
        if !self.tick_requested.replace(false) || self.paused.get() {
            return false;
        }

        let task = loop {
            let entry = self.entries.borrow_mut().pop_front();
            match entry {
                Some(QueueEntry::Task(task)) => break task,
                // A marker without its task; the task unwound before advancing.
                Some(QueueEntry::Advance) => continue,
                None => return false,
            }
        };

        task();
        self.advance();
        true
    }

    fn advance(&self) {
        let mut entries = self.entries.borrow_mut();
        if matches!(entries.front(), Some(QueueEntry::Advance)) {
            entries.pop_front();
        }
        let has_more = entries
            .iter()
            .any(|entry| matches!(entry, QueueEntry::Task(_)));
        drop(entries);
        if has_more && !self.paused.get() {
            self.request_tick();
        }
    }

    fn request_tick(&self) {
        if !self.tick_requested.replace(true) {
            self.scheduler.schedule_tick();
        }
    }
}

impl fmt::Debug for PausableTaskQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PausableTaskQueue")
            .field("pending_tasks", &self.pending_tasks())
            .field("paused", &self.paused.get())
            .field("tick_requested", &self.tick_requested.get())
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/task_queue_tests.rs"]
mod tests;
