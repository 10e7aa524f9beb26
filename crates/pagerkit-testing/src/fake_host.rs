//! Recording [`PagerHost`].
//!
//! The host never acts synchronously. Scroll and refresh requests are queued
//! as [`HostCommand`]s and applied by [`PagerTestRule`](crate::PagerTestRule)
//! when it pumps, the way a view would apply them on its next frame.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use pagerkit_core::PagerHost;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCommand {
    ScrollTo { position: usize, smooth: bool },
    Refresh,
}

/// What the frozen overlay shows: the page current at capture time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    pub position: usize,
}

#[derive(Debug)]
pub struct HostState {
    pub current: usize,
    pub input_enabled: bool,
    pub overlay: Option<Snapshot>,
    pub overlays_shown: usize,
    pub snapshots_unavailable: bool,
    pub commands: VecDeque<HostCommand>,
    /// Positions that became current, in order, including the initial one.
    pub shown: Vec<usize>,
}

impl Default for HostState {
    fn default() -> Self {
        Self {
            current: 0,
            input_enabled: true,
            overlay: None,
            overlays_shown: 0,
            snapshots_unavailable: false,
            commands: VecDeque::new(),
            shown: vec![0],
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FakeHost {
    state: Rc<RefCell<HostState>>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> Rc<RefCell<HostState>> {
        Rc::clone(&self.state)
    }
}

impl PagerHost for FakeHost {
    type Snapshot = Snapshot;

    fn current_item(&self) -> usize {
        self.state.borrow().current
    }

    fn set_current_item(&mut self, position: usize, smooth: bool) {
        self.state
            .borrow_mut()
            .commands
            .push_back(HostCommand::ScrollTo { position, smooth });
    }

    fn set_input_enabled(&mut self, enabled: bool) {
        self.state.borrow_mut().input_enabled = enabled;
    }

    fn capture_snapshot(&mut self) -> Option<Snapshot> {
        let state = self.state.borrow();
        if state.snapshots_unavailable {
            return None;
        }
        Some(Snapshot {
            position: state.current,
        })
    }

    fn show_overlay(&mut self, snapshot: Snapshot) {
        let mut state = self.state.borrow_mut();
        state.overlay = Some(snapshot);
        state.overlays_shown += 1;
    }

    fn hide_overlay(&mut self) {
        self.state.borrow_mut().overlay = None;
    }

    fn request_structural_refresh(&mut self) {
        self.state.borrow_mut().commands.push_back(HostCommand::Refresh);
    }
}
