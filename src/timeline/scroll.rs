//! Host-side scroll model.
//!
//! [`ScrollHost`] stands in for the page: it owns the viewport, the registered pinned
//! containers, the document scroll offset, and the frame clock. Scroll offsets and frame ticks
//! are broadcast through topics that bindings subscribe to.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::foundation::core::{Rect, Size};
use crate::foundation::error::{PlayerError, PlayerResult};
use crate::foundation::topic::{Subscription, Topic};

#[derive(Debug)]
struct HostInner {
    viewport: Cell<Size>,
    scroll_y: Cell<f64>,
    containers: RefCell<BTreeMap<String, Rect>>,
    scrolled: Topic<f64>,
    ticks: Topic<f64>,
}

/// Shared handle to the page that hosts one or more players.
#[derive(Clone, Debug)]
pub struct ScrollHost {
    inner: Rc<HostInner>,
}

impl ScrollHost {
    pub fn new(viewport: Size) -> Self {
        Self {
            inner: Rc::new(HostInner {
                viewport: Cell::new(viewport),
                scroll_y: Cell::new(0.0),
                containers: RefCell::new(BTreeMap::new()),
                scrolled: Topic::new(),
                ticks: Topic::new(),
            }),
        }
    }

    pub fn viewport(&self) -> Size {
        self.inner.viewport.get()
    }

    pub fn set_viewport(&self, viewport: Size) {
        self.inner.viewport.set(viewport);
    }

    /// Register a container region in document coordinates.
    pub fn add_container(&self, id: impl Into<String>, bounds: Rect) {
        self.inner.containers.borrow_mut().insert(id.into(), bounds);
    }

    /// Add a pinned container directly below `top` that is `viewports` viewport-heights tall.
    pub fn add_pinned_container(&self, id: impl Into<String>, top: f64, viewports: f64) -> Rect {
        let vp = self.viewport();
        let bounds = Rect::new(0.0, top, vp.width, top + vp.height * viewports);
        self.add_container(id, bounds);
        bounds
    }

    pub fn remove_container(&self, id: &str) -> Option<Rect> {
        self.inner.containers.borrow_mut().remove(id)
    }

    pub fn container(&self, id: &str) -> Option<Rect> {
        self.inner.containers.borrow().get(id).copied()
    }

    pub fn scroll_y(&self) -> f64 {
        self.inner.scroll_y.get()
    }

    /// Move the document scroll offset and notify listeners.
    pub fn scroll_to(&self, y: f64) {
        let y = if y.is_finite() { y.max(0.0) } else { 0.0 };
        self.inner.scroll_y.set(y);
        self.inner.scrolled.publish(&y);
    }

    /// Advance the frame clock by `dt_secs` and run scheduled updates.
    pub fn tick(&self, dt_secs: f64) {
        if !dt_secs.is_finite() || dt_secs < 0.0 {
            return;
        }
        self.inner.ticks.publish(&dt_secs);
    }

    pub fn on_scroll(&self, callback: impl FnMut(&f64) + 'static) -> Subscription<f64> {
        self.inner.scrolled.subscribe(callback)
    }

    pub fn on_tick(&self, callback: impl FnMut(&f64) + 'static) -> Subscription<f64> {
        self.inner.ticks.subscribe(callback)
    }

    /// Listener counts as `(scroll, tick)`.
    pub fn listener_counts(&self) -> (usize, usize) {
        (
            self.inner.scrolled.subscriber_count(),
            self.inner.ticks.subscriber_count(),
        )
    }
}

/// Scroll range over which a pinned container plays back.
///
/// Playback starts when the container's top reaches the viewport top and ends when its bottom
/// reaches the viewport bottom.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ScrollRange {
    pub(crate) start: f64,
    pub(crate) extent: f64,
}

impl ScrollRange {
    pub(crate) fn new(container: Rect, viewport: Size) -> PlayerResult<Self> {
        let extent = container.height() - viewport.height;
        if !extent.is_finite() || extent <= 0.0 {
            return Err(PlayerError::binding_setup(format!(
                "container height {} leaves no scroll extent in a {} px viewport",
                container.height(),
                viewport.height
            )));
        }
        Ok(Self {
            start: container.y0,
            extent,
        })
    }

    pub(crate) fn progress(self, scroll_y: f64) -> f64 {
        ((scroll_y - self.start) / self.extent).clamp(0.0, 1.0)
    }
}

/// Progress in `[0, 1]` through `container` at document offset `scroll_y`.
///
/// Returns `None` when the container is not taller than the viewport.
pub fn scroll_progress(container: Rect, viewport: Size, scroll_y: f64) -> Option<f64> {
    ScrollRange::new(container, viewport)
        .ok()
        .map(|r| r.progress(scroll_y))
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/scroll.rs"]
mod tests;
