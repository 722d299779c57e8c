//! Composition of loader, gate, binder, and renderer.
//!
//! A [`PlayerSession`] lives for the whole page session and owns the frame store and the
//! loader. Each [`Player`] is one mount: it owns a surface, a gate, and a scroll binding, and
//! tears down only those. Fetches keep running across unmounts and keep filling the store.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use crate::config::PlayerConfig;
use crate::foundation::error::PlayerResult;
use crate::foundation::topic::Subscription;
use crate::gate::{GateState, GateUpdate, LoadingGate};
use crate::loader::{AssetLoader, DirFetcher, DirFetcherOpts, FrameFetcher, LoaderStats};
use crate::render::{Renderer, Surface};
use crate::store::FrameStore;
use crate::timeline::{ScrollBinding, ScrollHost, bind};

/// Session-lifetime state shared by every mount.
#[derive(Debug)]
pub struct PlayerSession<F: FrameFetcher> {
    config: PlayerConfig,
    loader: AssetLoader<F>,
}

impl PlayerSession<DirFetcher> {
    /// Session that reads frames from `root` on a worker pool.
    pub fn open_dir(
        config: PlayerConfig,
        root: impl AsRef<Path>,
        opts: DirFetcherOpts,
    ) -> PlayerResult<Self> {
        let fetcher = DirFetcher::new(root.as_ref(), opts)?;
        Self::new(config, fetcher)
    }
}

impl<F: FrameFetcher> PlayerSession<F> {
    pub fn new(config: PlayerConfig, fetcher: F) -> PlayerResult<Self> {
        config.validate()?;
        let store = FrameStore::new(config.frame_count);
        let loader = AssetLoader::new(
            store,
            config.frames.clone(),
            config.batch_size,
            fetcher,
        );
        Ok(Self { config, loader })
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn store(&self) -> &FrameStore {
        self.loader.store()
    }

    pub fn loader_stats(&self) -> LoaderStats {
        self.loader.stats()
    }

    pub fn fetcher_mut(&mut self) -> &mut F {
        self.loader.fetcher_mut()
    }

    pub fn fetcher(&self) -> &F {
        self.loader.fetcher()
    }

    /// Start loading every frame. Idempotent.
    pub fn initiate(&mut self) {
        self.loader.initiate(self.config.frame_count);
    }

    /// Apply ready fetch completions on this thread.
    pub fn pump(&mut self) -> usize {
        self.loader.pump()
    }

    /// Apply ready completions, blocking for at least one if none are ready. Returns how
    /// many were applied.
    pub fn wait_any(&mut self) -> usize {
        self.loader.wait_any()
    }

    /// Block until every outstanding fetch has settled.
    pub fn wait_idle(&mut self) -> bool {
        self.loader.wait_idle()
    }

    /// Mount a player on `container` of `host` and start loading.
    pub fn mount(&mut self, host: &ScrollHost, container: &str) -> Player {
        let store = self.store().clone();
        let renderer = Rc::new(RefCell::new(Renderer::new(store.clone(), self.config.canvas)));

        let gate = Rc::new(RefCell::new(LoadingGate::new(
            self.config.ready_threshold,
            self.config.poster.clone(),
        )));
        gate.borrow_mut().observe(store.resolved_count());

        let g = Rc::clone(&gate);
        let r = Rc::clone(&renderer);
        let resolved_sub = store.subscribe_resolved(move |count| {
            let update = g.borrow_mut().observe(*count);
            if update == GateUpdate::Loading {
                r.borrow_mut().render(0);
            }
        });

        let r = Rc::clone(&renderer);
        let binding = bind(
            host,
            container,
            self.config.frame_count,
            self.config.timeline,
            move |frame| {
                r.borrow_mut().render(frame);
            },
        );

        self.initiate();

        Player {
            renderer,
            gate,
            binding,
            resolved_sub: Some(resolved_sub),
        }
    }
}

/// One mounted player.
#[derive(Debug)]
pub struct Player {
    renderer: Rc<RefCell<Renderer>>,
    gate: Rc<RefCell<LoadingGate>>,
    binding: ScrollBinding,
    resolved_sub: Option<Subscription<usize>>,
}

impl Player {
    pub fn gate_state(&self) -> GateState {
        self.gate.borrow().state()
    }

    /// Poster path while the overlay is up.
    pub fn overlay(&self) -> Option<String> {
        self.gate.borrow().overlay().map(str::to_owned)
    }

    pub fn is_bound(&self) -> bool {
        self.binding.is_bound()
    }

    /// Frame the timeline last asked for.
    pub fn target_frame(&self) -> Option<usize> {
        self.binding.current_frame()
    }

    /// Frame actually on the raster.
    pub fn shown_frame(&self) -> Option<usize> {
        self.renderer.borrow().shown()
    }

    pub fn paint_count(&self) -> u64 {
        self.renderer.borrow().paint_count()
    }

    pub fn with_surface<R>(&self, f: impl FnOnce(&Surface) -> R) -> Option<R> {
        self.renderer.borrow().surface().map(f)
    }

    /// Release this mount's listeners. In-flight fetches are left running.
    pub fn unmount(mut self) {
        self.release();
    }

    fn release(&mut self) {
        self.binding.unbind();
        if self.resolved_sub.take().is_some() {
            tracing::debug!("player unmounted");
        }
    }
}

impl Drop for Player {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
#[path = "../tests/unit/player/player.rs"]
mod tests;
