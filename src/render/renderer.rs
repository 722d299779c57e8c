use crate::foundation::core::Canvas;
use crate::foundation::error::PlayerResult;
use crate::render::surface::Surface;
use crate::store::FrameStore;

/// Paints frame-store entries onto a fixed-resolution surface.
///
/// A target that is not loaded leaves the raster exactly as it was, so the last successfully
/// painted frame stays visible. If no surface could be acquired the renderer is a permanent
/// no-op.
#[derive(Debug)]
pub struct Renderer {
    store: FrameStore,
    surface: Option<Surface>,
    shown: Option<usize>,
    paints: u64,
}

impl Renderer {
    /// Acquire a surface of `canvas` size; acquisition failures are logged and absorbed.
    pub fn new(store: FrameStore, canvas: Canvas) -> Self {
        Self::with_surface(store, Surface::acquire(canvas))
    }

    pub fn with_surface(store: FrameStore, surface: PlayerResult<Surface>) -> Self {
        let surface = match surface {
            Ok(s) => Some(s),
            Err(e) => {
                tracing::warn!(error = %e, "drawing surface unavailable; renderer disabled");
                None
            }
        };
        Self {
            store,
            surface,
            shown: None,
            paints: 0,
        }
    }

    /// Paint slot `index` if it is loaded. Returns whether the raster now shows `index`.
    pub fn render(&mut self, index: usize) -> bool {
        let Some(surface) = self.surface.as_mut() else {
            return false;
        };
        if self.shown == Some(index) {
            return true;
        }
        let Some(frame) = self.store.frame(index) else {
            return false;
        };

        let pixels = match frame.scaled_rgba8(surface.width(), surface.height()) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(index, error = %e, "could not scale frame; keeping current raster");
                return false;
            }
        };

        if let Err(e) = surface.present(&pixels) {
            tracing::warn!(index, error = %e, "frame draw failed");
            return false;
        }
        self.shown = Some(index);
        self.paints += 1;
        true
    }

    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    pub fn is_enabled(&self) -> bool {
        self.surface.is_some()
    }

    /// Slot currently on the raster.
    pub fn shown(&self) -> Option<usize> {
        self.shown
    }

    /// Number of raster updates so far.
    pub fn paint_count(&self) -> u64 {
        self.paints
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/renderer.rs"]
mod tests;
