//! Session-lifetime storage for decoded frames.
//!
//! The store is written only by the asset loader (claim, resolve, release) and read by the
//! renderer and the loading gate. All access happens on one thread; handles are `Rc` clones of
//! the same slots.

use std::cell::RefCell;
use std::rc::Rc;

use crate::assets::FrameImage;
use crate::foundation::topic::{Subscription, Topic};

/// Load state of one position in the sequence.
///
/// Transitions are one-way: `Unloaded -> Loaded` or `Unloaded -> Failed`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Slot {
    Unloaded,
    Loaded(FrameImage),
    Failed,
}

/// Payload-free view of a [`Slot`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SlotState {
    Unloaded,
    Loaded,
    Failed,
}

impl Slot {
    pub fn state(&self) -> SlotState {
        match self {
            Self::Unloaded => SlotState::Unloaded,
            Self::Loaded(_) => SlotState::Loaded,
            Self::Failed => SlotState::Failed,
        }
    }
}

#[derive(Debug)]
struct StoreInner {
    slots: Vec<Slot>,
    // In-flight marks; never set on a resolved slot.
    claimed: Vec<bool>,
    resolved: usize,
}

/// Shared handle to the frame slots of one sequence.
#[derive(Clone, Debug)]
pub struct FrameStore {
    inner: Rc<RefCell<StoreInner>>,
    resolved_changed: Topic<usize>,
}

impl FrameStore {
    /// Create a store of `len` unloaded slots.
    pub fn new(len: usize) -> Self {
        Self {
            inner: Rc::new(RefCell::new(StoreInner {
                slots: vec![Slot::Unloaded; len],
                claimed: vec![false; len],
                resolved: 0,
            })),
            resolved_changed: Topic::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of slots that have left `Unloaded`. Never decreases.
    pub fn resolved_count(&self) -> usize {
        self.inner.borrow().resolved
    }

    /// Number of slots holding a decoded frame.
    pub fn loaded_count(&self) -> usize {
        self.inner
            .borrow()
            .slots
            .iter()
            .filter(|s| matches!(s, Slot::Loaded(_)))
            .count()
    }

    /// Clone of the slot at `index`; `None` when out of range.
    pub fn slot(&self, index: usize) -> Option<Slot> {
        self.inner.borrow().slots.get(index).cloned()
    }

    pub fn state(&self, index: usize) -> Option<SlotState> {
        self.inner.borrow().slots.get(index).map(Slot::state)
    }

    /// Decoded frame at `index`, if loaded.
    pub fn frame(&self, index: usize) -> Option<FrameImage> {
        match self.inner.borrow().slots.get(index) {
            Some(Slot::Loaded(img)) => Some(img.clone()),
            _ => None,
        }
    }

    /// Whether a fetch for `index` is currently in flight.
    pub fn is_claimed(&self, index: usize) -> bool {
        self.inner
            .borrow()
            .claimed
            .get(index)
            .copied()
            .unwrap_or(false)
    }

    pub fn in_flight_count(&self) -> usize {
        self.inner.borrow().claimed.iter().filter(|c| **c).count()
    }

    /// Observe resolved-count changes. The callback receives the new count.
    pub fn subscribe_resolved(
        &self,
        callback: impl FnMut(&usize) + 'static,
    ) -> Subscription<usize> {
        self.resolved_changed.subscribe(callback)
    }

    /// Mark `index` as in flight. Returns `false` when the slot is resolved, already claimed,
    /// or out of range; the caller must not fetch it then.
    pub(crate) fn claim(&self, index: usize) -> bool {
        let mut inner = self.inner.borrow_mut();
        let unloaded = matches!(inner.slots.get(index), Some(Slot::Unloaded));
        match inner.claimed.get_mut(index) {
            Some(c) if unloaded && !*c => {
                *c = true;
                true
            }
            _ => false,
        }
    }

    /// Drop the in-flight mark without resolving; the slot stays `Unloaded` and claimable.
    pub(crate) fn release(&self, index: usize) {
        if let Some(c) = self.inner.borrow_mut().claimed.get_mut(index) {
            *c = false;
        }
    }

    /// Settle `index` with a decoded frame (`Some`) or a permanent failure (`None`).
    ///
    /// Returns `false` and changes nothing when the slot is already resolved or out of range.
    /// Otherwise the resolved count grows by one and subscribers are notified.
    pub(crate) fn resolve(&self, index: usize, frame: Option<FrameImage>) -> bool {
        let count = {
            let mut inner = self.inner.borrow_mut();
            match inner.slots.get(index) {
                Some(Slot::Unloaded) => {}
                _ => return false,
            }
            inner.slots[index] = match frame {
                Some(img) => Slot::Loaded(img),
                None => Slot::Failed,
            };
            inner.claimed[index] = false;
            inner.resolved += 1;
            inner.resolved
        };
        self.resolved_changed.publish(&count);
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/store/frame_store.rs"]
mod tests;
