//! Page-change notifications for external listeners.
//!
//! While a disruptive transition runs, the pager moves through positions the
//! user never chose. The dispatcher holds those events back instead of
//! dropping them and releases them, in order, once the transition settles.

use std::rc::Rc;

use smallvec::SmallVec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollState {
    Idle,
    Dragging,
    Settling,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageEvent {
    Selected(usize),
    ScrollStateChanged(ScrollState),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

pub type PageChangeListener = Rc<dyn Fn(PageEvent)>;

/// Events ready for delivery together with the listeners to deliver them to.
pub struct Deliveries {
    pub events: SmallVec<[PageEvent; 8]>,
    pub listeners: SmallVec<[PageChangeListener; 4]>,
}

impl Deliveries {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty() || self.listeners.is_empty()
    }

    /// Invokes every listener for every event, event-major.
    pub fn deliver(self) {
        for event in self.events {
            for listener in &self.listeners {
                listener(event);
            }
        }
    }
}

pub struct PageChangeDispatcher {
    listeners: SmallVec<[(ListenerId, PageChangeListener); 4]>,
    next_id: u64,
    enabled: bool,
    buffered: SmallVec<[PageEvent; 8]>,
    outbox: SmallVec<[PageEvent; 8]>,
}

impl Default for PageChangeDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl PageChangeDispatcher {
    pub fn new() -> Self {
        Self {
            listeners: SmallVec::new(),
            next_id: 1,
            enabled: true,
            buffered: SmallVec::new(),
            outbox: SmallVec::new(),
        }
    }

    pub fn add_listener(&mut self, listener: impl Fn(PageEvent) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Rc::new(listener)));
        id
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        before != self.listeners.len()
    }

    pub fn clear_listeners(&mut self) {
        self.listeners.clear();
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn buffered_len(&self) -> usize {
        self.buffered.len()
    }

    /// Re-enabling moves everything buffered, in order, to the outbox.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled == enabled {
            return;
        }
        self.enabled = enabled;
        if enabled {
            self.outbox.extend(self.buffered.drain(..));
        }
    }

    pub fn submit(&mut self, event: PageEvent) {
        if self.enabled {
            self.outbox.push(event);
        } else {
            self.buffered.push(event);
        }
    }

    /// Takes pending deliveries. Invoke [`Deliveries::deliver`] once the
    /// dispatcher is no longer borrowed, so listeners may call back in.
    pub fn take_deliveries(&mut self) -> Deliveries {
        Deliveries {
            events: std::mem::take(&mut self.outbox),
            listeners: self
                .listeners
                .iter()
                .map(|(_, listener)| Rc::clone(listener))
                .collect(),
        }
    }
}

#[cfg(test)]
#[path = "tests/listeners_tests.rs"]
mod tests;
