use std::collections::BTreeSet;

use super::*;
use crate::assets::FrameImage;
use crate::foundation::error::PlayerError;
use crate::loader::fetch::RecordingFetcher;
use crate::store::SlotState;

fn loader(len: usize, batch: usize) -> AssetLoader<RecordingFetcher> {
    AssetLoader::new(
        FrameStore::new(len),
        FramePathTemplate::default(),
        batch,
        RecordingFetcher::new(),
    )
}

fn frame() -> FrameImage {
    FrameImage::solid(1, 1, [200, 100, 50, 255]).unwrap()
}

fn ok(l: &mut AssetLoader<RecordingFetcher>, slot: usize) {
    l.resolve(FetchCompletion {
        slot,
        outcome: FetchOutcome::Loaded(frame()),
    });
}

fn fail(l: &mut AssetLoader<RecordingFetcher>, slot: usize) {
    l.resolve(FetchCompletion {
        slot,
        outcome: FetchOutcome::Failed(PlayerError::asset_load("404")),
    });
}

fn requested_slots(l: &AssetLoader<RecordingFetcher>) -> Vec<usize> {
    l.fetcher().requests().iter().map(|r| r.slot).collect()
}

#[test]
fn first_batch_is_requested_in_order_with_paths() {
    let l = {
        let mut l = loader(10, 3);
        l.initiate(10);
        l
    };
    assert_eq!(requested_slots(&l), vec![0, 1, 2]);
    assert_eq!(l.fetcher().requests()[0].path, "frames/frame_0001.webp");
    assert_eq!(l.fetcher().requests()[2].path, "frames/frame_0003.webp");
    assert_eq!(l.pending_runs(), 1);
}

#[test]
fn remainder_waits_for_every_first_batch_slot() {
    let mut l = loader(10, 3);
    l.initiate(10);

    ok(&mut l, 2);
    fail(&mut l, 0);
    assert_eq!(requested_slots(&l).len(), 3);

    ok(&mut l, 1);
    assert_eq!(requested_slots(&l), (0..10).collect::<Vec<_>>());
    assert_eq!(l.pending_runs(), 0);
}

#[test]
fn no_barrier_after_the_first_batch() {
    let mut l = loader(8, 2);
    l.initiate(8);
    ok(&mut l, 0);
    ok(&mut l, 1);
    // Everything after the batch is in flight at once.
    assert_eq!(l.store().in_flight_count(), 6);
}

#[test]
fn failures_count_and_do_not_abort() {
    let mut l = loader(4, 2);
    l.initiate(4);
    fail(&mut l, 0);
    fail(&mut l, 1);
    fail(&mut l, 2);
    ok(&mut l, 3);

    assert_eq!(l.store().resolved_count(), 4);
    assert_eq!(l.store().state(0), Some(SlotState::Failed));
    assert_eq!(l.store().state(3), Some(SlotState::Loaded));
    assert!(l.is_idle());
    let st = l.stats();
    assert_eq!((st.requested, st.loaded, st.failed), (4, 1, 3));
}

#[test]
fn failed_slots_are_never_retried() {
    let mut l = loader(3, 3);
    l.initiate(3);
    fail(&mut l, 1);
    l.initiate(3);
    assert_eq!(requested_slots(&l), vec![0, 1, 2]);
}

#[test]
fn overlapping_initiate_never_duplicates_requests() {
    let mut l = loader(12, 4);
    l.initiate(12);
    l.initiate(12);
    assert_eq!(requested_slots(&l), vec![0, 1, 2, 3]);
    assert_eq!(l.pending_runs(), 2);

    for s in 0..4 {
        ok(&mut l, s);
    }
    let slots = requested_slots(&l);
    let unique: BTreeSet<usize> = slots.iter().copied().collect();
    assert_eq!(slots.len(), unique.len());
    assert_eq!(unique.len(), 12);
    assert_eq!(l.pending_runs(), 0);
}

#[test]
fn reinitiate_after_first_batch_skips_straight_to_remainder() {
    let mut l = loader(6, 2);
    l.initiate(2);
    ok(&mut l, 0);
    ok(&mut l, 1);
    assert_eq!(requested_slots(&l), vec![0, 1]);

    l.initiate(6);
    assert_eq!(requested_slots(&l), vec![0, 1, 2, 3, 4, 5]);
    assert_eq!(l.pending_runs(), 0);
}

#[test]
fn cancelled_fetch_keeps_slot_requestable() {
    let mut l = loader(4, 2);
    l.initiate(4);
    l.resolve(FetchCompletion {
        slot: 0,
        outcome: FetchOutcome::Cancelled,
    });
    assert_eq!(l.store().state(0), Some(SlotState::Unloaded));
    assert_eq!(l.store().resolved_count(), 0);
    assert!(!l.store().is_claimed(0));

    // Cancellation settles the barrier like any other outcome.
    ok(&mut l, 1);
    assert_eq!(requested_slots(&l), vec![0, 1, 2, 3]);

    l.initiate(4);
    assert_eq!(requested_slots(&l), vec![0, 1, 2, 3, 0]);
    assert_eq!(l.stats().cancelled, 1);
}

#[test]
fn late_duplicate_completion_is_ignored() {
    let mut l = loader(2, 1);
    l.initiate(2);
    ok(&mut l, 0);
    fail(&mut l, 0);
    assert_eq!(l.store().state(0), Some(SlotState::Loaded));
    assert_eq!(l.store().resolved_count(), 1);
    assert_eq!(l.stats().ignored, 1);
}

#[test]
fn initiate_clamps_to_store_length() {
    let mut l = loader(3, 5);
    l.initiate(50);
    assert_eq!(requested_slots(&l), vec![0, 1, 2]);
}

#[test]
fn pump_applies_queued_completions() {
    let mut l = loader(3, 3);
    l.initiate(3);
    l.fetcher_mut().complete(0, FetchOutcome::Loaded(frame()));
    l.fetcher_mut().complete(2, FetchOutcome::Failed(PlayerError::asset_load("x")));
    assert_eq!(l.pump(), 2);
    assert_eq!(l.store().resolved_count(), 2);
    assert!(!l.wait_idle());
}

#[test]
fn wait_any_applies_what_is_ready_and_reports_stalls() {
    let mut l = loader(6, 2);
    l.initiate(6);
    assert_eq!(l.wait_any(), 0);

    l.fetcher_mut().complete(1, FetchOutcome::Loaded(frame()));
    assert_eq!(l.wait_any(), 1);
    assert_eq!(l.store().resolved_count(), 1);
    assert_eq!(l.pending_runs(), 1);

    l.fetcher_mut()
        .complete(0, FetchOutcome::Failed(PlayerError::asset_load("404")));
    assert_eq!(l.wait_any(), 1);
    assert_eq!(l.pending_runs(), 0);
    assert_eq!(requested_slots(&l), vec![0, 1, 2, 3, 4, 5]);
}
