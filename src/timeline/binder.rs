//! Scroll-driven frame timeline.
//!
//! A binding maps scroll progress through a pinned container onto a continuous frame value in
//! `[0, len - 1]`. With a non-zero scrub the value trails the scroll target and catches up over
//! roughly `scrub_secs` on the host frame clock; with zero scrub it jumps on every scroll event.
//! Each visual update publishes the value snapped to the nearest slot.

use std::cell::RefCell;
use std::rc::Rc;

use crate::foundation::core::snap_frame;
use crate::foundation::error::{PlayerError, PlayerResult};
use crate::foundation::topic::{Subscription, Topic};
use crate::timeline::ease::Ease;
use crate::timeline::scroll::{ScrollHost, ScrollRange};

// Fraction of a frame under which the smoothed value is considered caught up.
const SETTLE_EPSILON: f64 = 1e-3;

/// Timeline shaping for a binding.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TimelineOpts {
    /// Catch-up lag in seconds; `0` disables smoothing.
    pub scrub_secs: f64,
    /// Mapping from scroll progress to timeline position.
    pub ease: Ease,
}

impl Default for TimelineOpts {
    fn default() -> Self {
        Self {
            scrub_secs: 0.5,
            ease: Ease::Linear,
        }
    }
}

#[derive(Debug)]
struct Timeline {
    range: ScrollRange,
    len: usize,
    opts: TimelineOpts,
    target: f64,
    value: f64,
    published: Option<usize>,
}

impl Timeline {
    fn max_frame(&self) -> f64 {
        self.len.saturating_sub(1) as f64
    }

    fn set_scroll(&mut self, scroll_y: f64) {
        let t = self.opts.ease.apply(self.range.progress(scroll_y));
        self.target = t * self.max_frame();
        if self.opts.scrub_secs <= 0.0 {
            self.value = self.target;
        }
    }

    fn advance(&mut self, dt_secs: f64) {
        if self.opts.scrub_secs <= 0.0 {
            self.value = self.target;
            return;
        }
        let tau = self.opts.scrub_secs / 4.0;
        let k = 1.0 - (-dt_secs / tau).exp();
        self.value += (self.target - self.value) * k;
        if (self.target - self.value).abs() < SETTLE_EPSILON {
            self.value = self.target;
        }
    }

    /// Snapped frame if it differs from the last published one.
    fn take_update(&mut self) -> Option<usize> {
        let frame = snap_frame(self.value, self.len);
        if self.published == Some(frame) {
            return None;
        }
        self.published = Some(frame);
        Some(frame)
    }
}

struct Active {
    timeline: Rc<RefCell<Timeline>>,
    frames: Topic<usize>,
    _sink: Subscription<usize>,
    _scroll: Subscription<f64>,
    _tick: Subscription<f64>,
}

/// Live link between a host container and a frame sink.
///
/// Dropping the binding or calling [`ScrollBinding::unbind`] releases only this binding's
/// listeners.
pub struct ScrollBinding {
    active: Option<Active>,
}

impl std::fmt::Debug for ScrollBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollBinding")
            .field("bound", &self.is_bound())
            .field("frame", &self.current_frame())
            .finish()
    }
}

/// Bind `container` on `host` to a sequence of `len` frames.
///
/// `on_frame` is invoked synchronously for frame 0, then for every snapped frame change. A
/// missing or degenerate container is logged and yields an inert binding that never fires.
pub fn bind(
    host: &ScrollHost,
    container: &str,
    len: usize,
    opts: TimelineOpts,
    mut on_frame: impl FnMut(usize) + 'static,
) -> ScrollBinding {
    on_frame(0);
    match try_bind(host, container, len, opts, on_frame) {
        Ok(active) => ScrollBinding {
            active: Some(active),
        },
        Err(e) => {
            tracing::warn!(container, error = %e, "scroll binding not established");
            ScrollBinding { active: None }
        }
    }
}

fn try_bind(
    host: &ScrollHost,
    container: &str,
    len: usize,
    opts: TimelineOpts,
    mut on_frame: impl FnMut(usize) + 'static,
) -> PlayerResult<Active> {
    let bounds = host
        .container(container)
        .ok_or_else(|| PlayerError::binding_setup(format!("container '{container}' not found")))?;
    if len == 0 {
        return Err(PlayerError::binding_setup("sequence has no frames"));
    }
    let range = ScrollRange::new(bounds, host.viewport())?;

    let timeline = Rc::new(RefCell::new(Timeline {
        range,
        len,
        opts,
        target: 0.0,
        value: 0.0,
        published: Some(0),
    }));
    let frames = Topic::<usize>::new();
    let sink = frames.subscribe(move |f| on_frame(*f));

    timeline.borrow_mut().set_scroll(host.scroll_y());

    let tl = Rc::clone(&timeline);
    let out = frames.clone();
    let scroll = host.on_scroll(move |y| {
        let update = {
            let mut tl = tl.borrow_mut();
            tl.set_scroll(*y);
            tl.take_update()
        };
        if let Some(frame) = update {
            out.publish(&frame);
        }
    });

    let tl = Rc::clone(&timeline);
    let out = frames.clone();
    let tick = host.on_tick(move |dt| {
        let update = {
            let mut tl = tl.borrow_mut();
            tl.advance(*dt);
            tl.take_update()
        };
        if let Some(frame) = update {
            out.publish(&frame);
        }
    });

    tracing::debug!(container, len, scrub = opts.scrub_secs, "scroll binding established");
    Ok(Active {
        timeline,
        frames,
        _sink: sink,
        _scroll: scroll,
        _tick: tick,
    })
}

impl ScrollBinding {
    pub fn is_bound(&self) -> bool {
        self.active.is_some()
    }

    /// Release this binding's scroll and tick listeners.
    pub fn unbind(&mut self) {
        if self.active.take().is_some() {
            tracing::debug!("scroll binding released");
        }
    }

    /// Last published snapped frame.
    pub fn current_frame(&self) -> Option<usize> {
        self.active
            .as_ref()
            .and_then(|a| a.timeline.borrow().published)
    }

    /// Continuous (unsnapped) timeline value.
    pub fn virtual_frame(&self) -> Option<f64> {
        self.active.as_ref().map(|a| a.timeline.borrow().value)
    }

    /// Frame value the timeline is heading toward.
    pub fn target_frame(&self) -> Option<f64> {
        self.active.as_ref().map(|a| a.timeline.borrow().target)
    }

    /// Additional observer of snapped frame changes.
    pub fn subscribe_frames(
        &self,
        callback: impl FnMut(&usize) + 'static,
    ) -> Option<Subscription<usize>> {
        self.active.as_ref().map(|a| a.frames.subscribe(callback))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/binder.rs"]
mod tests;
