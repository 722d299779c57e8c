use std::cell::RefCell;
use std::rc::Rc;

use super::*;

fn frame() -> FrameImage {
    FrameImage::solid(1, 1, [9, 9, 9, 255]).unwrap()
}

#[test]
fn new_store_is_all_unloaded() {
    let store = FrameStore::new(3);
    assert_eq!(store.len(), 3);
    assert_eq!(store.resolved_count(), 0);
    for i in 0..3 {
        assert_eq!(store.state(i), Some(SlotState::Unloaded));
        assert!(store.frame(i).is_none());
    }
    assert_eq!(store.state(3), None);
}

#[test]
fn resolve_is_one_way() {
    let store = FrameStore::new(2);
    assert!(store.resolve(0, Some(frame())));
    assert!(store.resolve(1, None));

    assert!(!store.resolve(0, None));
    assert!(!store.resolve(1, Some(frame())));

    assert_eq!(store.state(0), Some(SlotState::Loaded));
    assert_eq!(store.state(1), Some(SlotState::Failed));
    assert_eq!(store.resolved_count(), 2);
    assert_eq!(store.loaded_count(), 1);
}

#[test]
fn claim_is_exclusive_until_release_or_resolve() {
    let store = FrameStore::new(2);
    assert!(store.claim(0));
    assert!(!store.claim(0));
    assert!(store.is_claimed(0));
    assert_eq!(store.in_flight_count(), 1);

    store.release(0);
    assert!(!store.is_claimed(0));
    assert!(store.claim(0));

    store.resolve(0, Some(frame()));
    assert!(!store.is_claimed(0));
    assert!(!store.claim(0));
    assert!(!store.claim(9));
}

#[test]
fn resolved_subscribers_see_monotone_counts() {
    let store = FrameStore::new(4);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let _sub = store.subscribe_resolved(move |n| sink.borrow_mut().push(*n));

    store.resolve(2, None);
    store.resolve(0, Some(frame()));
    store.resolve(0, None);
    store.resolve(3, Some(frame()));

    assert_eq!(*seen.borrow(), vec![1, 2, 3]);
}

#[test]
fn subscriber_may_read_store_during_notification() {
    let store = FrameStore::new(1);
    let reader = store.clone();
    let seen = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&seen);
    let _sub = store.subscribe_resolved(move |_| {
        *sink.borrow_mut() = reader.state(0);
    });

    store.resolve(0, Some(frame()));
    assert_eq!(*seen.borrow(), Some(SlotState::Loaded));
}

#[test]
fn clones_share_slots() {
    let a = FrameStore::new(1);
    let b = a.clone();
    a.resolve(0, Some(frame()));
    assert_eq!(b.resolved_count(), 1);
    assert_eq!(b.frame(0), Some(frame()));
}
