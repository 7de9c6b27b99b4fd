use std::cell::RefCell;
use std::rc::{Rc, Weak};

type Callback<T> = Box<dyn FnMut(&T)>;

struct Subscribers<T> {
    next_id: u64,
    entries: Vec<(u64, Callback<T>)>,
}

/// A multicast push stream for one kind of event.
///
/// Delivery is synchronous and follows subscription order: `fire` runs every
/// callback before returning. Cloning yields another handle to the same
/// subscriber list. Single-threaded; callbacks must not subscribe to the
/// stream they are being delivered from.
pub struct EventStream<T> {
    inner: Rc<RefCell<Subscribers<T>>>,
}

impl<T> Clone for EventStream<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> Default for EventStream<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for EventStream<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventStream")
            .field("subscribers", &self.inner.borrow().entries.len())
            .finish()
    }
}

impl<T> EventStream<T> {
    /// Creates a new stream with no subscribers
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Subscribers {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }

    /// Subscribe a callback to receive events. The callback stays registered
    /// until the returned [`Subscription`] is dropped.
    #[must_use = "dropping the subscription unregisters the callback"]
    pub fn subscribe(&self, callback: impl FnMut(&T) + 'static) -> Subscription
    where
        T: 'static,
    {
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.entries.push((id, Box::new(callback)));
            id
        };
        let weak: Weak<RefCell<Subscribers<T>>> = Rc::downgrade(&self.inner);
        Subscription {
            cancel: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.borrow_mut().entries.retain(|(entry_id, _)| *entry_id != id);
                }
            })),
        }
    }

    /// Emit an event to all registered callbacks
    pub fn fire(&self, event: &T) {
        for (_, callback) in &mut self.inner.borrow_mut().entries {
            callback(event);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().entries.len()
    }
}

/// Owns one registration on an [`EventStream`]; dropping it unregisters the
/// callback, so a subscriber that goes away can never be called again.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Subscription")
    }
}
