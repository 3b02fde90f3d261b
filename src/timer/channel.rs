//! One-to-many state broadcast.
//!
//! A [`Channel`] holds the current value and a list of subscribers. Every
//! [`Channel::set_state`] call overwrites the value and synchronously hands it
//! to each subscriber in attach order. If a subscriber publishes again while
//! being notified, the nested value is queued and delivered after the current
//! round, so every subscriber sees values in the order they were produced.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use tracing::warn;

/// Receiver of channel updates.
pub trait Subscriber<T> {
    /// Called with each new state.
    fn update(&self, state: &T);
}

/// Closure adapter for [`Subscriber`].
pub struct Observer<F>(F);

impl<T, F> Subscriber<T> for Observer<F>
where
    F: Fn(&T),
{
    fn update(&self, state: &T) {
        (self.0)(state)
    }
}

/// Wraps a closure as a shareable subscriber.
///
/// Keep the returned `Rc` to detach the subscriber later.
pub fn observer<T, F>(f: F) -> Rc<dyn Subscriber<T>>
where
    T: 'static,
    F: Fn(&T) + 'static,
{
    Rc::new(Observer(f))
}

/// Publish/subscribe primitive holding a current state.
pub struct Channel<T> {
    state: RefCell<T>,
    subscribers: RefCell<Vec<Rc<dyn Subscriber<T>>>>,
    pending: RefCell<VecDeque<T>>,
    dispatching: Cell<bool>,
}

impl<T: Clone> Channel<T> {
    /// Creates a channel with an initial state and no subscribers.
    pub fn new(initial: T) -> Self {
        Self {
            state: RefCell::new(initial),
            subscribers: RefCell::new(Vec::new()),
            pending: RefCell::new(VecDeque::new()),
            dispatching: Cell::new(false),
        }
    }

    /// Adds a subscriber. Returns false (and warns) if it is already attached.
    pub fn attach(&self, subscriber: Rc<dyn Subscriber<T>>) -> bool {
        let mut subscribers = self.subscribers.borrow_mut();
        if subscribers.iter().any(|s| Rc::ptr_eq(s, &subscriber)) {
            warn!("Subscriber has been attached already");
            return false;
        }
        subscribers.push(subscriber);
        true
    }

    /// Removes a subscriber. Returns false (and warns) if it was not attached.
    pub fn detach(&self, subscriber: &Rc<dyn Subscriber<T>>) -> bool {
        let mut subscribers = self.subscribers.borrow_mut();
        match subscribers.iter().position(|s| Rc::ptr_eq(s, subscriber)) {
            Some(index) => {
                subscribers.remove(index);
                true
            }
            None => {
                warn!("Subscriber is not attached");
                false
            }
        }
    }

    /// Returns the current state.
    pub fn state(&self) -> T {
        self.state.borrow().clone()
    }

    /// Number of attached subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }

    /// Overwrites the state and notifies every subscriber.
    pub fn set_state(&self, state: T) {
        *self.state.borrow_mut() = state.clone();
        self.pending.borrow_mut().push_back(state);

        if self.dispatching.replace(true) {
            return;
        }
        let _guard = DispatchGuard(self);

        while let Some(next) = self.pop_pending() {
            // Subscribers may attach/detach while being notified.
            let subscribers = self.subscribers.borrow().clone();
            for subscriber in subscribers {
                subscriber.update(&next);
            }
        }
    }

    fn pop_pending(&self) -> Option<T> {
        self.pending.borrow_mut().pop_front()
    }
}

struct DispatchGuard<'a, T>(&'a Channel<T>);

impl<T> Drop for DispatchGuard<'_, T> {
    fn drop(&mut self) {
        self.0.pending.borrow_mut().clear();
        self.0.dispatching.set(false);
    }
}

impl<T: fmt::Debug> fmt::Debug for Channel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel")
            .field("state", &self.state.borrow())
            .field("subscribers", &self.subscribers.borrow().len())
            .finish_non_exhaustive()
    }
}
