//! Recording collaborators shared by the unit tests.

use std::cell::RefCell;
use std::rc::Rc;

use crate::{ContentError, PageFactory, PagerHost};

#[derive(Debug, Default)]
pub(crate) struct FactoryLog {
    pub created: Vec<usize>,
    pub destroyed: Vec<u32>,
    pub attached: Vec<(u32, String)>,
    pub visibility: Vec<(u32, bool)>,
}

/// Hands out sequential `u32` handles and records every lifecycle call.
pub(crate) struct RecordingFactory {
    next_id: u32,
    live: Vec<u32>,
    pub failing: Vec<usize>,
    pub log: Rc<RefCell<FactoryLog>>,
}

impl RecordingFactory {
    pub fn new() -> Self {
        Self {
            next_id: 100,
            live: Vec::new(),
            failing: Vec::new(),
            log: Rc::new(RefCell::new(FactoryLog::default())),
        }
    }

    pub fn with_live(handles: &[u32]) -> Self {
        let mut factory = Self::new();
        factory.live.extend_from_slice(handles);
        factory
    }
}

impl PageFactory for RecordingFactory {
    type Handle = u32;
    type State = String;
    type Reference = u32;

    fn create_content(&mut self, position: usize) -> Result<u32, ContentError> {
        if self.failing.contains(&position) {
            return Err(ContentError::new(format!("page {position} unavailable")));
        }
        let id = self.next_id;
        self.next_id += 1;
        self.live.push(id);
        self.log.borrow_mut().created.push(position);
        Ok(id)
    }

    fn destroy_content(&mut self, handle: &u32) {
        self.live.retain(|live| live != handle);
        self.log.borrow_mut().destroyed.push(*handle);
    }

    fn save_state(&mut self, handle: &u32) -> Option<String> {
        Some(format!("state-{handle}"))
    }

    fn attach_saved_state(&mut self, handle: &u32, state: &String) {
        self.log.borrow_mut().attached.push((*handle, state.clone()));
    }

    fn set_user_visible(&mut self, handle: &u32, visible: bool) {
        self.log.borrow_mut().visibility.push((*handle, visible));
    }

    fn reference_for(&self, handle: &u32) -> Option<u32> {
        Some(*handle)
    }

    fn resolve_reference(&mut self, reference: &u32) -> Option<u32> {
        self.live.contains(reference).then_some(*reference)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum HostCall {
    SetCurrent(usize, bool),
    Input(bool),
    ShowOverlay(usize),
    HideOverlay,
    Refresh,
}

/// Host that only records calls; `current` follows `set_current_item`.
pub(crate) struct RecordingHost {
    pub current: usize,
    pub snapshots: bool,
    pub calls: Vec<HostCall>,
}

impl RecordingHost {
    pub fn at(current: usize) -> Self {
        Self {
            current,
            snapshots: true,
            calls: Vec::new(),
        }
    }
}

impl PagerHost for RecordingHost {
    type Snapshot = usize;

    fn current_item(&self) -> usize {
        self.current
    }

    fn set_current_item(&mut self, position: usize, smooth: bool) {
        self.current = position;
        self.calls.push(HostCall::SetCurrent(position, smooth));
    }

    fn set_input_enabled(&mut self, enabled: bool) {
        self.calls.push(HostCall::Input(enabled));
    }

    fn capture_snapshot(&mut self) -> Option<usize> {
        self.snapshots.then_some(self.current)
    }

    fn show_overlay(&mut self, snapshot: usize) {
        self.calls.push(HostCall::ShowOverlay(snapshot));
    }

    fn hide_overlay(&mut self) {
        self.calls.push(HostCall::HideOverlay);
    }

    fn request_structural_refresh(&mut self) {
        self.calls.push(HostCall::Refresh);
    }
}
