//! The hosting view, as seen by the transition coordinator.

/// Operations the coordinator needs from the view that displays the pager.
///
/// Calls arrive while the pager is mid-update. Implementations must not call
/// back into the [`Pager`](crate::Pager) from inside these methods; requested
/// work (scrolling, refreshing) is carried out on the host's own schedule and
/// reported back through [`Pager::on_scroll_idle`](crate::Pager::on_scroll_idle)
/// and
/// [`Pager::on_structural_refresh_rendered`](crate::Pager::on_structural_refresh_rendered).
pub trait PagerHost {
    /// Frozen image of the pager surface.
    type Snapshot;

    fn current_item(&self) -> usize;

    /// Moves to `position`. A smooth move ends with a scroll-idle signal.
    fn set_current_item(&mut self, position: usize, smooth: bool);

    fn set_input_enabled(&mut self, enabled: bool);

    /// Returns `None` when the surface cannot be captured. The transition then
    /// proceeds without an overlay.
    fn capture_snapshot(&mut self) -> Option<Self::Snapshot>;

    fn show_overlay(&mut self, snapshot: Self::Snapshot);

    fn hide_overlay(&mut self);

    /// Re-reads the page count and re-resolves every materialized page. The
    /// host signals completion with `on_structural_refresh_rendered`.
    fn request_structural_refresh(&mut self);
}
