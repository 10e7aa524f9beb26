use super::*;

fn cx(current: usize, total_page_count: usize) -> GuardContext {
    GuardContext {
        input_enabled: true,
        current,
        total_page_count,
    }
}

#[test]
fn disabled_input_consumes_everything() {
    let mut guard = SwipeGuard::new();
    let cx = GuardContext {
        input_enabled: false,
        ..cx(3, 6)
    };
    assert_eq!(guard.on_touch(&cx, TouchPhase::Down { x: 10.0 }), TouchVerdict::Consume);
    assert_eq!(guard.on_touch(&cx, TouchPhase::Move { x: 5.0 }), TouchVerdict::Consume);
    assert_eq!(guard.on_touch(&cx, TouchPhase::Up), TouchVerdict::Consume);
}

#[test]
fn drag_towards_empty_page_is_consumed_on_first_page() {
    let mut guard = SwipeGuard::new();
    let cx = cx(1, 4);
    assert_eq!(guard.on_touch(&cx, TouchPhase::Down { x: 100.0 }), TouchVerdict::PassThrough);
    assert_eq!(guard.on_touch(&cx, TouchPhase::Move { x: 140.0 }), TouchVerdict::Consume);
    assert_eq!(guard.on_touch(&cx, TouchPhase::Move { x: 60.0 }), TouchVerdict::PassThrough);
}

#[test]
fn single_real_page_never_scrolls() {
    let mut guard = SwipeGuard::new();
    let cx = cx(1, 2);
    guard.on_touch(&cx, TouchPhase::Down { x: 100.0 });
    assert_eq!(guard.on_touch(&cx, TouchPhase::Move { x: 20.0 }), TouchVerdict::Consume);
}

#[test]
fn pages_past_the_first_are_not_guarded() {
    let mut guard = SwipeGuard::new();
    let cx = cx(2, 4);
    guard.on_touch(&cx, TouchPhase::Down { x: 100.0 });
    assert_eq!(guard.on_touch(&cx, TouchPhase::Move { x: 180.0 }), TouchVerdict::PassThrough);
}

#[test]
fn empty_pager_is_not_guarded() {
    let mut guard = SwipeGuard::new();
    assert_eq!(
        guard.on_touch(&cx(0, 1), TouchPhase::Move { x: 5.0 }),
        TouchVerdict::PassThrough
    );
}

#[test]
fn settle_scroll_snaps_back_from_the_empty_page() {
    let guard = SwipeGuard::new();
    assert_eq!(guard.settle_scroll(&cx(1, 3), 80.0, 100.0), 100.0);
    assert_eq!(guard.settle_scroll(&cx(1, 3), 130.0, 100.0), 130.0);
    assert_eq!(guard.settle_scroll(&cx(2, 3), 180.0, 200.0), 180.0);
}
