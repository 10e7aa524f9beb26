//! Keeps the user from swiping onto the empty page.
//!
//! The empty page occupies position 0 so the pager always has something to
//! show, but users should never land there by dragging. Hosts feed horizontal
//! touch phases through [`SwipeGuard::on_touch`] before their own drag
//! handling and drop the event when told to consume it.

/// Pager facts the guard needs for each decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardContext {
    pub input_enabled: bool,
    pub current: usize,
    pub total_page_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TouchPhase {
    Down { x: f32 },
    Move { x: f32 },
    Up,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchVerdict {
    /// The guard handled the event; the host must not scroll.
    Consume,
    PassThrough,
}

#[derive(Debug, Clone, Default)]
pub struct SwipeGuard {
    drag_start_x: Option<f32>,
}

impl SwipeGuard {
    pub fn new() -> Self {
        Self::default()
    }

    fn guards_edge(cx: &GuardContext) -> bool {
        cx.current <= 1 && cx.total_page_count > 1
    }

    pub fn on_touch(&mut self, cx: &GuardContext, phase: TouchPhase) -> TouchVerdict {
        if !cx.input_enabled {
            return TouchVerdict::Consume;
        }
        if !Self::guards_edge(cx) {
            if matches!(phase, TouchPhase::Up) {
                self.drag_start_x = None;
            }
            return TouchVerdict::PassThrough;
        }
        match phase {
            TouchPhase::Down { x } => {
                self.drag_start_x = Some(x);
                TouchVerdict::PassThrough
            }
            TouchPhase::Move { x } => {
                let towards_empty_page = self.drag_start_x.is_some_and(|start| x > start);
                // A single real page cannot scroll at all.
                if towards_empty_page || cx.total_page_count <= 2 {
                    TouchVerdict::Consume
                } else {
                    TouchVerdict::PassThrough
                }
            }
            TouchPhase::Up => {
                self.drag_start_x = None;
                TouchVerdict::PassThrough
            }
        }
    }

    /// Returns the scroll offset to settle at on release. An offset left of
    /// the current page's left edge would reveal the empty page, so it snaps
    /// back to the edge.
    pub fn settle_scroll(&self, cx: &GuardContext, scroll_x: f32, page_left: f32) -> f32 {
        if Self::guards_edge(cx) && scroll_x < page_left {
            log::warn!("bad scroll offset {scroll_x} left of page edge {page_left}; snapping back");
            page_left
        } else {
            scroll_x
        }
    }
}

#[cfg(test)]
#[path = "tests/swipe_guard_tests.rs"]
mod tests;
