//! Batched, idempotent frame loading.
//!
//! Every `initiate` call is a *run*. A run claims and requests the first `batch_size` slots,
//! then waits until no first-batch slot is in flight (whoever requested it). Once that barrier
//! clears, the run requests all remaining slots at once with no further synchronization.
//! Slots that are already resolved or in flight are never requested again, so overlapping
//! runs never duplicate work.

use std::collections::BTreeSet;

use crate::assets::FramePathTemplate;
use crate::loader::fetch::{FetchCompletion, FetchOutcome, FetchRequest, FrameFetcher};
use crate::store::FrameStore;

/// Counters for diagnostics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoaderStats {
    pub requested: u64,
    pub loaded: u64,
    pub failed: u64,
    pub cancelled: u64,
    /// Completions for slots that were already resolved.
    pub ignored: u64,
}

#[derive(Debug)]
struct LoadRun {
    id: u64,
    // Exclusive end of the slots this run covers.
    end: usize,
    // First slot after the initial batch.
    resume_at: usize,
    // First-batch slots still in flight.
    barrier: BTreeSet<usize>,
}

/// Sole writer of a [`FrameStore`].
#[derive(Debug)]
pub struct AssetLoader<F: FrameFetcher> {
    store: FrameStore,
    template: FramePathTemplate,
    batch_size: usize,
    fetcher: F,
    runs: Vec<LoadRun>,
    next_run_id: u64,
    stats: LoaderStats,
}

impl<F: FrameFetcher> AssetLoader<F> {
    pub fn new(
        store: FrameStore,
        template: FramePathTemplate,
        batch_size: usize,
        fetcher: F,
    ) -> Self {
        Self {
            store,
            template,
            batch_size: batch_size.max(1),
            fetcher,
            runs: Vec::new(),
            next_run_id: 1,
            stats: LoaderStats::default(),
        }
    }

    pub fn store(&self) -> &FrameStore {
        &self.store
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn fetcher_mut(&mut self) -> &mut F {
        &mut self.fetcher
    }

    pub fn stats(&self) -> LoaderStats {
        self.stats
    }

    /// Runs still waiting on their first-batch barrier.
    pub fn pending_runs(&self) -> usize {
        self.runs.len()
    }

    /// No run is waiting and no request is in flight.
    pub fn is_idle(&self) -> bool {
        self.runs.is_empty() && self.store.in_flight_count() == 0
    }

    /// Begin resolving slots `0..count` in index order.
    ///
    /// `count` is clamped to the store length. Safe to call repeatedly or while an earlier run
    /// is still in progress.
    #[tracing::instrument(skip(self))]
    pub fn initiate(&mut self, count: usize) {
        let len = self.store.len();
        if count > len {
            tracing::warn!(count, len, "initiate count exceeds sequence length; clamping");
        }
        let end = count.min(len);
        let first_end = self.batch_size.min(end);

        let id = self.next_run_id;
        self.next_run_id += 1;

        for slot in 0..first_end {
            self.request(slot);
        }

        let barrier: BTreeSet<usize> = (0..first_end)
            .filter(|&slot| self.store.is_claimed(slot))
            .collect();

        if barrier.is_empty() {
            self.request_range(first_end, end);
            return;
        }

        tracing::debug!(run = id, waiting = barrier.len(), "first batch in flight");
        self.runs.push(LoadRun {
            id,
            end,
            resume_at: first_end,
            barrier,
        });
    }

    /// Apply every completion the fetcher has ready. Returns how many were applied.
    pub fn pump(&mut self) -> usize {
        let mut ready = Vec::new();
        self.fetcher.poll(&mut ready);
        let n = ready.len();
        for c in ready {
            self.resolve(c);
        }
        n
    }

    /// Apply ready completions, blocking for at least one when none are ready and work is
    /// outstanding. Returns how many were applied; `0` means nothing more can complete.
    pub fn wait_any(&mut self) -> usize {
        let applied = self.pump();
        if applied > 0 || self.is_idle() {
            return applied;
        }
        let mut ready = Vec::new();
        if !self.fetcher.wait(&mut ready) {
            return 0;
        }
        let n = ready.len();
        for c in ready {
            self.resolve(c);
        }
        n
    }

    /// Block until the loader is idle or the fetcher has nothing left that could complete.
    ///
    /// Returns `true` when idle.
    pub fn wait_idle(&mut self) -> bool {
        while !self.is_idle() {
            if self.wait_any() == 0 {
                break;
            }
        }
        self.is_idle()
    }

    /// Settle one fetch. This is the completion callback for every fetcher.
    pub fn resolve(&mut self, completion: FetchCompletion) {
        let FetchCompletion { slot, outcome } = completion;
        match outcome {
            FetchOutcome::Loaded(img) => {
                if self.store.resolve(slot, Some(img)) {
                    self.stats.loaded += 1;
                    tracing::debug!(slot, resolved = self.store.resolved_count(), "frame loaded");
                } else {
                    self.stats.ignored += 1;
                }
            }
            FetchOutcome::Failed(err) => {
                if self.store.resolve(slot, None) {
                    self.stats.failed += 1;
                    tracing::warn!(slot, error = %err, "frame failed to load");
                } else {
                    self.stats.ignored += 1;
                }
            }
            FetchOutcome::Cancelled => {
                self.store.release(slot);
                self.stats.cancelled += 1;
                tracing::debug!(slot, "frame fetch cancelled");
            }
        }

        self.settle_barriers(slot);
    }

    fn settle_barriers(&mut self, slot: usize) {
        for run in &mut self.runs {
            run.barrier.remove(&slot);
        }
        let (released, waiting): (Vec<LoadRun>, Vec<LoadRun>) = std::mem::take(&mut self.runs)
            .into_iter()
            .partition(|r| r.barrier.is_empty());
        self.runs = waiting;

        for run in released {
            tracing::info!(
                run = run.id,
                remaining = run.end.saturating_sub(run.resume_at),
                "first batch settled; requesting remaining frames"
            );
            self.request_range(run.resume_at, run.end);
        }
    }

    fn request_range(&mut self, start: usize, end: usize) {
        for slot in start..end {
            self.request(slot);
        }
    }

    fn request(&mut self, slot: usize) -> bool {
        if !self.store.claim(slot) {
            return false;
        }
        let path = self.template.path_for(slot);
        tracing::trace!(slot, path = %path, "requesting frame");
        self.stats.requested += 1;
        self.fetcher.start(FetchRequest { slot, path });
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/loader/asset_loader.rs"]
mod tests;
