use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::mpsc;

use anyhow::Context as _;

use crate::assets::{FrameImage, decode_image};
use crate::foundation::error::{PlayerError, PlayerResult};

/// One asset request issued by the loader.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchRequest {
    /// 0-based slot the result belongs to.
    pub slot: usize,
    /// Asset path relative to the fetcher's root.
    pub path: String,
}

/// How a fetch settled.
#[derive(Debug)]
pub enum FetchOutcome {
    Loaded(FrameImage),
    /// Permanent for the slot; no retry.
    Failed(PlayerError),
    /// Abandoned before settling. The slot stays requestable.
    Cancelled,
}

#[derive(Debug)]
pub struct FetchCompletion {
    pub slot: usize,
    pub outcome: FetchOutcome,
}

/// Asynchronous asset source.
///
/// `start` must not block on the fetch itself. Completions are handed back through `poll` (and
/// `wait`) on the thread that owns the loader, so frame-store writes never race.
pub trait FrameFetcher {
    /// Begin fetching `request`.
    fn start(&mut self, request: FetchRequest);

    /// Append every completion that is ready, without blocking.
    fn poll(&mut self, out: &mut Vec<FetchCompletion>);

    /// Block until at least one completion is ready and append it (plus any others ready).
    ///
    /// Returns `false` when nothing is outstanding that could ever complete.
    fn wait(&mut self, out: &mut Vec<FetchCompletion>) -> bool;
}

/// Settings for [`DirFetcher`].
#[derive(Clone, Debug, Default)]
pub struct DirFetcherOpts {
    /// Worker threads for read + decode. `None` uses rayon's default.
    pub threads: Option<usize>,
}

/// Reads and decodes assets from a directory on a rayon pool.
pub struct DirFetcher {
    root: PathBuf,
    pool: rayon::ThreadPool,
    tx: mpsc::Sender<FetchCompletion>,
    rx: mpsc::Receiver<FetchCompletion>,
    outstanding: usize,
}

impl std::fmt::Debug for DirFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirFetcher")
            .field("root", &self.root)
            .field("outstanding", &self.outstanding)
            .finish()
    }
}

impl DirFetcher {
    pub fn new(root: impl Into<PathBuf>, opts: DirFetcherOpts) -> PlayerResult<Self> {
        let pool = build_thread_pool(opts.threads)?;
        let (tx, rx) = mpsc::channel();
        Ok(Self {
            root: root.into(),
            pool,
            tx,
            rx,
            outstanding: 0,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Requests started but not yet handed back.
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    fn take_ready(&mut self, out: &mut Vec<FetchCompletion>) {
        while let Ok(c) = self.rx.try_recv() {
            self.outstanding = self.outstanding.saturating_sub(1);
            out.push(c);
        }
    }
}

impl FrameFetcher for DirFetcher {
    fn start(&mut self, request: FetchRequest) {
        self.outstanding += 1;
        let tx = self.tx.clone();
        let path = self.root.join(&request.path);
        self.pool.spawn(move || {
            let outcome = match read_frame(&path) {
                Ok(img) => FetchOutcome::Loaded(img),
                Err(e) => FetchOutcome::Failed(e),
            };
            // The receiver lives as long as the fetcher; a send error means it is gone.
            let _ = tx.send(FetchCompletion {
                slot: request.slot,
                outcome,
            });
        });
    }

    fn poll(&mut self, out: &mut Vec<FetchCompletion>) {
        self.take_ready(out);
    }

    fn wait(&mut self, out: &mut Vec<FetchCompletion>) -> bool {
        if self.outstanding == 0 {
            return false;
        }
        match self.rx.recv() {
            Ok(c) => {
                self.outstanding = self.outstanding.saturating_sub(1);
                out.push(c);
                self.take_ready(out);
                true
            }
            Err(_) => false,
        }
    }
}

fn read_frame(path: &Path) -> PlayerResult<FrameImage> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("read frame '{}'", path.display()))
        .map_err(|e| PlayerError::asset_load(format!("{e:#}")))?;
    decode_image(&bytes)
        .map_err(|e| PlayerError::asset_load(format!("decode '{}': {e}", path.display())))
}

fn build_thread_pool(threads: Option<usize>) -> PlayerResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(PlayerError::validation(
            "fetch 'threads' must be >= 1 when set",
        ));
    }

    let mut builder =
        rayon::ThreadPoolBuilder::new().thread_name(|i| format!("scrubframe-fetch-{i}"));
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| PlayerError::validation(format!("failed to build rayon thread pool: {e}")))
}

/// Fetcher that only records requests; completions are supplied by the caller.
///
/// Useful for tests and tools that drive resolution order by hand.
#[derive(Debug, Default)]
pub struct RecordingFetcher {
    requests: Vec<FetchRequest>,
    ready: VecDeque<FetchCompletion>,
}

impl RecordingFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every request started, in issue order.
    pub fn requests(&self) -> &[FetchRequest] {
        &self.requests
    }

    /// Queue a completion for the next `poll`.
    pub fn complete(&mut self, slot: usize, outcome: FetchOutcome) {
        self.ready.push_back(FetchCompletion { slot, outcome });
    }
}

impl FrameFetcher for RecordingFetcher {
    fn start(&mut self, request: FetchRequest) {
        self.requests.push(request);
    }

    fn poll(&mut self, out: &mut Vec<FetchCompletion>) {
        out.extend(self.ready.drain(..));
    }

    fn wait(&mut self, out: &mut Vec<FetchCompletion>) -> bool {
        if self.ready.is_empty() {
            return false;
        }
        self.poll(out);
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/loader/fetch.rs"]
mod tests;
