use pagerkit_core::{
    PageEvent, PagerConfig, PagerError, ScrollState, TouchPhase, TouchVerdict, TransitionState,
};
use pagerkit_testing::prelude::*;

const FIVE: [&str; 5] = ["a", "b", "c", "d", "e"];

#[test]
fn populating_an_empty_pager_selects_the_first_page() {
    let mut rule = PagerTestRule::new(FIVE);
    rule.request_count(5);
    rule.pump_until_idle();

    assert_eq!(rule.current(), 1);
    assert_eq!(rule.pager().total_page_count(), 6);
    assert_eq!(rule.current_title().as_deref(), Some("a"));
}

#[test]
fn total_page_count_includes_the_empty_page() {
    for count in [0usize, 1, 3, 5] {
        let mut rule = PagerTestRule::new(FIVE);
        rule.request_count(count);
        rule.pump_until_idle();
        assert_eq!(rule.pager().total_page_count(), count + 1);
        assert_eq!(rule.pager().committed_count(), count);
    }
}

#[test]
fn removing_the_shown_last_page_lands_on_its_neighbour() {
    run_pager_test(FIVE, |rule| {
        rule.set_current_item(5, true);
        rule.pump_until_idle();
        let shown_before = rule.shown_positions().len();

        rule.remove_item(5).expect("remove");
        rule.request_count(4);
        rule.pump_until_idle();

        assert_eq!(rule.current(), 4);
        assert_eq!(rule.current_title().as_deref(), Some("d"));
        assert_eq!(rule.pager().total_page_count(), 5);
        assert!(!rule.shown_positions()[shown_before..].contains(&0));
        assert_eq!(rule.host_state().overlays_shown, 1);
        assert!(rule.host_state().overlay.is_none());
        assert!(rule.host_state().input_enabled);
    });
}

#[test]
fn removing_a_shown_middle_page_keeps_showing_the_next_item() {
    run_pager_test(FIVE, |rule| {
        rule.set_current_item(4, true);
        rule.pump_until_idle();

        rule.remove_item(4).expect("remove");
        rule.request_count(4);
        rule.pump_until_idle();

        assert_eq!(rule.current(), 4);
        assert_eq!(rule.current_title().as_deref(), Some("e"));
        assert_eq!(rule.title_at(3).as_deref(), Some("c"));
        assert_eq!(rule.pager().transition_state(), TransitionState::Idle);
    });
}

#[test]
fn removing_the_only_page_falls_back_to_the_empty_page() {
    run_pager_test(["solo"], |rule| {
        assert_eq!(rule.current(), 1);

        rule.remove_item(1).expect("remove");
        rule.request_count(0);
        rule.pump_until_idle();

        assert_eq!(rule.current(), 0);
        assert_eq!(rule.pager().total_page_count(), 1);
        assert_eq!(rule.host_state().overlays_shown, 0);
        assert_eq!(rule.current_title(), None);
    });
}

#[test]
fn removing_a_page_the_user_is_not_on_commits_in_place() {
    run_pager_test(FIVE, |rule| {
        rule.set_current_item(3, false);
        rule.pump_until_idle();
        rule.take_transition_trace();

        rule.remove_item(1).expect("remove");
        rule.request_count(4);
        rule.pump_until_idle();

        assert_eq!(rule.current_title().as_deref(), Some("c"));
        assert_eq!(rule.current(), 2);
        assert_eq!(rule.host_state().overlays_shown, 0);
        assert_eq!(
            rule.take_transition_trace(),
            vec![
                TransitionState::Resolving,
                TransitionState::Committing,
                TransitionState::Idle
            ]
        );
    });
}

#[test]
fn the_factory_never_sees_the_empty_page() {
    run_pager_test(FIVE, |rule| {
        for position in [5, 0, 2, 0, 4] {
            rule.set_current_item(position, true);
            rule.pump_until_idle();
        }
        rule.remove_item(4).expect("remove");
        rule.request_count(4);
        rule.pump_until_idle();

        let registry = rule.factory().registry();
        assert!(!registry.borrow().created_positions().contains(&0));
    });
}

#[test]
fn back_to_back_requests_run_one_transition_at_a_time() {
    run_pager_test(FIVE, |rule| {
        rule.set_current_item(5, true);
        rule.pump_until_idle();
        rule.take_transition_trace();

        rule.remove_item(5).expect("remove");
        rule.request_count(4);
        rule.remove_item(4).expect("remove");
        rule.request_count(3);
        rule.pump_until_idle();

        assert_eq!(
            rule.take_transition_trace(),
            vec![
                TransitionState::Resolving,
                TransitionState::Navigating,
                TransitionState::Committing,
                TransitionState::Settling,
                TransitionState::Idle,
                TransitionState::Resolving,
                TransitionState::Committing,
                TransitionState::Idle,
            ]
        );
        assert_eq!(rule.pager().total_page_count(), 4);
        assert_eq!(rule.current(), 3);
        assert_eq!(rule.current_title().as_deref(), Some("c"));
        assert_eq!(rule.pager().pending_tasks(), 0);
    });
}

#[test]
fn page_events_during_a_removal_are_delivered_after_it_settles() {
    run_pager_test(FIVE, |rule| {
        rule.set_current_item(5, true);
        rule.pump_until_idle();
        rule.take_page_events();

        let seen_mid_transition = std::rc::Rc::new(std::cell::Cell::new(false));
        let flag = std::rc::Rc::clone(&seen_mid_transition);
        let pager = rule.pager().clone();
        rule.pager().add_page_change_listener(move |_| {
            if pager.transition_state() != TransitionState::Idle {
                flag.set(true);
            }
        });

        rule.remove_item(5).expect("remove");
        rule.request_count(4);
        rule.pump_until_idle();

        assert!(!seen_mid_transition.get());
        assert_eq!(
            rule.take_page_events(),
            vec![
                PageEvent::ScrollStateChanged(ScrollState::Settling),
                PageEvent::Selected(4),
                PageEvent::ScrollStateChanged(ScrollState::Idle),
            ]
        );
    });
}

#[test]
fn input_is_blocked_while_a_removal_is_in_flight() {
    run_pager_test(FIVE, |rule| {
        rule.set_current_item(5, true);
        rule.pump_until_idle();

        rule.remove_item(5).expect("remove");
        rule.request_count(4);
        // One tick starts the transition; the host has not scrolled yet.
        rule.pager().run_tick();

        assert_eq!(rule.pager().transition_state(), TransitionState::Navigating);
        assert!(!rule.host_state().input_enabled);
        assert_eq!(rule.touch(TouchPhase::Down { x: 50.0 }), TouchVerdict::Consume);

        rule.pump_until_idle();
        assert_eq!(rule.touch(TouchPhase::Down { x: 50.0 }), TouchVerdict::PassThrough);
    });
}

#[test]
fn swiping_towards_the_empty_page_is_consumed() {
    run_pager_test(FIVE, |rule| {
        assert_eq!(rule.touch(TouchPhase::Down { x: 100.0 }), TouchVerdict::PassThrough);
        assert_eq!(rule.touch(TouchPhase::Move { x: 150.0 }), TouchVerdict::Consume);
        assert_eq!(rule.touch(TouchPhase::Up), TouchVerdict::PassThrough);
    });
}

#[test]
fn failed_content_creation_is_isolated_and_retried() {
    let mut rule = PagerTestRule::new(["a", "b", "c"]);
    rule.factory().fail_position(2);
    rule.request_count(3);
    rule.pump_until_idle();

    assert_eq!(rule.current(), 1);
    assert_eq!(rule.current_title().as_deref(), Some("a"));
    assert!(matches!(
        rule.creation_failures(),
        [PagerError::ContentCreation { position: 2, .. }]
    ));
    assert_eq!(rule.title_at(2), None);

    rule.factory().clear_failures();
    rule.set_current_item(2, true);
    rule.pump_until_idle();
    assert_eq!(rule.current_title().as_deref(), Some("b"));
}

#[test]
fn first_page_selection_can_be_turned_off() {
    let mut rule =
        PagerTestRule::with_config(FIVE, PagerConfig::default().without_first_page_selection());
    rule.request_count(5);
    rule.pump_until_idle();
    assert_eq!(rule.current(), 0);
    assert_eq!(rule.pager().total_page_count(), 6);
}

#[test]
fn negative_counts_are_rejected() {
    let rule = PagerTestRule::new(FIVE);
    assert_eq!(
        rule.pager().request_count_signed(-1),
        Err(PagerError::InvalidArgument {
            reason: "page count cannot be negative"
        })
    );
    assert_eq!(rule.pager().pending_tasks(), 0);
    assert_eq!(rule.pager().request_count_signed(2), Ok(()));
    assert_eq!(rule.pager().staged_count(), 2);
}
