use super::*;
use std::cell::RefCell;
use std::rc::Rc;

fn recorder(dispatcher: &mut PageChangeDispatcher) -> Rc<RefCell<Vec<PageEvent>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    dispatcher.add_listener(move |event| sink.borrow_mut().push(event));
    seen
}

#[test]
fn enabled_dispatcher_delivers_immediately() {
    let mut dispatcher = PageChangeDispatcher::new();
    let seen = recorder(&mut dispatcher);

    dispatcher.submit(PageEvent::Selected(2));
    dispatcher.take_deliveries().deliver();

    assert_eq!(*seen.borrow(), vec![PageEvent::Selected(2)]);
}

#[test]
fn disabled_dispatcher_buffers_until_reenabled() {
    let mut dispatcher = PageChangeDispatcher::new();
    let seen = recorder(&mut dispatcher);

    dispatcher.set_enabled(false);
    dispatcher.submit(PageEvent::ScrollStateChanged(ScrollState::Settling));
    dispatcher.submit(PageEvent::Selected(4));
    assert!(dispatcher.take_deliveries().is_empty());
    assert_eq!(dispatcher.buffered_len(), 2);

    dispatcher.set_enabled(true);
    dispatcher.take_deliveries().deliver();

    assert_eq!(
        *seen.borrow(),
        vec![
            PageEvent::ScrollStateChanged(ScrollState::Settling),
            PageEvent::Selected(4)
        ]
    );
    assert_eq!(dispatcher.buffered_len(), 0);
}

#[test]
fn removed_listener_is_not_called() {
    let mut dispatcher = PageChangeDispatcher::new();
    let kept = recorder(&mut dispatcher);
    let dropped = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&dropped);
    let id = dispatcher.add_listener(move |_| *counter.borrow_mut() += 1);

    assert!(dispatcher.remove_listener(id));
    assert!(!dispatcher.remove_listener(id));
    dispatcher.submit(PageEvent::Selected(1));
    dispatcher.take_deliveries().deliver();

    assert_eq!(*dropped.borrow(), 0);
    assert_eq!(kept.borrow().len(), 1);
    assert_eq!(dispatcher.listener_count(), 1);

    dispatcher.clear_listeners();
    assert_eq!(dispatcher.listener_count(), 0);
}
