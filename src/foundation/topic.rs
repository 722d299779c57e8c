//! Single-threaded publish/subscribe channel.
//!
//! A [`Topic`] fans a value out to every live subscriber in subscription order. Each
//! [`Subscription`] is an owned handle: cancelling (or dropping) it removes exactly that
//! subscriber and nothing else, which is what keeps teardown of one player binding from
//! touching another.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// Identifier of one subscriber within a topic.
pub type SubId = u64;

type Callback<T> = Rc<RefCell<dyn FnMut(&T)>>;

struct TopicInner<T> {
    next_id: Cell<SubId>,
    subscribers: RefCell<Vec<(SubId, Callback<T>)>>,
}

impl<T> TopicInner<T> {
    fn contains(&self, id: SubId) -> bool {
        self.subscribers.borrow().iter().any(|(sid, _)| *sid == id)
    }

    fn remove(&self, id: SubId) -> bool {
        let mut subs = self.subscribers.borrow_mut();
        let before = subs.len();
        subs.retain(|(sid, _)| *sid != id);
        subs.len() != before
    }
}

/// Cloneable handle to a shared subscriber list.
pub struct Topic<T> {
    inner: Rc<TopicInner<T>>,
}

impl<T> Clone for Topic<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> Default for Topic<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for Topic<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Topic")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl<T> Topic<T> {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(TopicInner {
                next_id: Cell::new(1),
                subscribers: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Register `callback`; it stays registered while the returned handle is alive.
    pub fn subscribe(&self, callback: impl FnMut(&T) + 'static) -> Subscription<T> {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        let cb: Callback<T> = Rc::new(RefCell::new(callback));
        self.inner.subscribers.borrow_mut().push((id, cb));
        Subscription {
            id,
            topic: Rc::downgrade(&self.inner),
        }
    }

    /// Deliver `value` to every subscriber registered at call time.
    ///
    /// Subscribers removed by an earlier callback of the same publish are skipped. A callback
    /// that re-publishes into a topic it is currently handling is not re-entered.
    pub fn publish(&self, value: &T) {
        let snapshot: Vec<(SubId, Callback<T>)> = self
            .inner
            .subscribers
            .borrow()
            .iter()
            .map(|(id, cb)| (*id, Rc::clone(cb)))
            .collect();

        for (id, cb) in snapshot {
            if !self.inner.contains(id) {
                continue;
            }
            let Ok(mut f) = cb.try_borrow_mut() else {
                tracing::trace!(sub = id, "skipping re-entrant publish");
                continue;
            };
            (*f)(value);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.borrow().len()
    }
}

/// Owned registration in a [`Topic`]. Dropping it unsubscribes.
pub struct Subscription<T> {
    id: SubId,
    topic: Weak<TopicInner<T>>,
}

impl<T> std::fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}

impl<T> Subscription<T> {
    pub fn id(&self) -> SubId {
        self.id
    }

    /// Whether the subscriber is still registered with a live topic.
    pub fn is_active(&self) -> bool {
        self.topic
            .upgrade()
            .is_some_and(|inner| inner.contains(self.id))
    }

    /// Remove this subscriber. Other subscribers of the topic are unaffected.
    pub fn cancel(self) {
        // Drop does the work.
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        if let Some(inner) = self.topic.upgrade() {
            inner.remove(self.id);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/topic.rs"]
mod tests;
