use super::*;
use crate::test_support::RecordingFactory;
use crate::PageFactory;

fn live_store(factory: &mut RecordingFactory, positions: &[usize]) -> PageStore<u32, String> {
    let mut store = PageStore::new();
    for &position in positions {
        let handle = factory.create_content(position).expect("create");
        store.record_mut(position).content = Some(handle);
    }
    store
}

#[test]
fn ensure_size_only_grows() {
    let mut store: PageStore<u32, String> = PageStore::new();
    assert_eq!(store.ensure_size(3), 4);
    assert_eq!(store.len(), 4);
    assert_eq!(store.ensure_size(1), 0);
    assert_eq!(store.len(), 4);
    assert!(store.get(3).is_some_and(|record| !record.is_live()));
    assert!(store.get(4).is_none());
}

#[test]
fn remove_at_shifts_later_records_down() {
    let mut factory = RecordingFactory::new();
    let mut store = live_store(&mut factory, &[1, 2, 3]);
    let third = store.get(3).and_then(|r| r.content);

    let removed = store.remove_at(2, &mut factory);

    let removed_handle = removed.content.expect("removed record was live");
    assert_eq!(factory.log.borrow().destroyed, vec![removed_handle]);
    assert_eq!(store.len(), 3);
    assert_eq!(store.get(2).and_then(|r| r.content), third);
    assert_eq!(store.position_of(&third.expect("third")), Some(2));
    assert_eq!(store.position_of(&removed_handle), None);
}

#[test]
fn remove_at_beyond_end_leaves_the_store_alone() {
    let mut factory = RecordingFactory::new();
    let mut store: PageStore<u32, String> = PageStore::new();
    store.ensure_size(1);

    let removed = store.remove_at(4, &mut factory);
    assert!(!removed.is_live());
    assert_eq!(store.len(), 2);

    store.remove_at(usize::MAX, &mut factory);
    assert_eq!(store.len(), 2);
    assert!(factory.log.borrow().destroyed.is_empty());
}

#[test]
fn ensure_size_ignores_unaddressable_index() {
    let mut store: PageStore<u32, String> = PageStore::new();
    store.ensure_size(2);
    assert_eq!(store.ensure_size(usize::MAX), 0);
    assert_eq!(store.len(), 3);
}

#[test]
fn live_positions_skips_empty_records() {
    let mut factory = RecordingFactory::new();
    let store = live_store(&mut factory, &[1, 3]);
    assert_eq!(store.live_positions().collect::<Vec<_>>(), vec![1, 3]);
}

#[test]
fn serialize_captures_states_and_live_references() {
    let mut factory = RecordingFactory::new();
    let mut store = live_store(&mut factory, &[2]);
    store.record_mut(1).saved_state = Some("one".to_string());

    let bundle = store.serialize(&factory);

    assert_eq!(bundle.states, vec![None, Some("one".to_string()), None]);
    let handle = store.get(2).and_then(|r| r.content).expect("live");
    assert_eq!(bundle.live_references.get(&2), Some(&handle));
    assert_eq!(bundle.live_references.len(), 1);
}

#[test]
fn deserialize_reattaches_resolvable_references_hidden() {
    let mut factory = RecordingFactory::with_live(&[7]);
    let mut store: PageStore<u32, String> = PageStore::new();
    let bundle = StoreBundle {
        states: vec![None, Some("a".to_string()), None],
        live_references: [(2usize, 7u32), (3usize, 8u32)].into_iter().collect(),
    };

    let report = store.deserialize(bundle, &mut factory);

    assert_eq!(report.reattached.as_slice(), &[2]);
    assert_eq!(report.unresolved.as_slice(), &[3]);
    assert!(!report.is_clean());
    assert_eq!(store.get(2).and_then(|r| r.content), Some(7));
    assert_eq!(store.get(1).and_then(|r| r.saved_state.clone()), Some("a".to_string()));
    assert!(store.get(3).and_then(|r| r.content).is_none());
    assert_eq!(factory.log.borrow().visibility, vec![(7, false)]);
    assert_eq!(
        report.unresolved_errors().collect::<Vec<_>>(),
        vec![PagerError::RestoreReferenceUnresolved { position: 3 }]
    );
}

#[test]
fn deserialize_drops_references_outside_the_saved_records() {
    let mut factory = RecordingFactory::with_live(&[5, 6, 7]);
    let mut store: PageStore<u32, String> = PageStore::new();
    let bundle = StoreBundle {
        states: vec![None, None, None],
        live_references: [(0usize, 5u32), (3usize, 6u32), (usize::MAX, 7u32)]
            .into_iter()
            .collect(),
    };

    let report = store.deserialize(bundle, &mut factory);

    assert!(report.reattached.is_empty());
    assert_eq!(report.unresolved.as_slice(), &[0, 3, usize::MAX]);
    assert_eq!(store.len(), 3);
    assert_eq!(store.live_positions().count(), 0);
    assert!(factory.log.borrow().visibility.is_empty());
}
