use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use flume::Sender;
use log::trace;

use crate::Subscription;

/// Shared, observable state value.
///
/// Cloning a `Store` is cheap and yields a handle onto the same state.
#[derive(Debug)]
pub struct Store<S> {
    inner: Arc<Inner<S>>,
}

#[derive(Debug)]
struct Inner<S> {
    state: Mutex<S>,
    subscribers: Mutex<Vec<Sender<S>>>,
}

impl<S> Clone for Store<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: Default + Clone + Send + 'static> Default for Store<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S> Store<S>
where
    S: Clone + Send + 'static,
{
    pub fn new(initial: S) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(initial),
                subscribers: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Returns a clone of the current state.
    pub fn get(&self) -> S {
        self.lock_state().clone()
    }

    /// Reads the current state without cloning all of it.
    pub fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.lock_state())
    }

    /// Applies `f` to the state and publishes the result.
    ///
    /// Subscribers are notified while the state lock is still held, so
    /// concurrent updates reach every subscriber in the order they were applied.
    pub fn update<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        let mut state = self.lock_state();
        let ret = f(&mut state);
        self.publish(&state);
        ret
    }

    /// Subscribes to state changes.
    ///
    /// The current state is queued as the first item, so a new subscriber
    /// can render immediately without calling [`Store::get`].
    pub fn subscribe(&self) -> Subscription<S> {
        let state = self.lock_state();
        let (send, recv) = flume::unbounded();
        // A fresh unbounded channel always accepts the first item.
        let _ = send.send(state.clone());
        self.lock_subscribers().push(send);
        Subscription::new(recv)
    }

    pub fn subscriber_count(&self) -> usize {
        let mut subscribers = self.lock_subscribers();
        subscribers.retain(|send| !send.is_disconnected());
        subscribers.len()
    }

    fn publish(&self, state: &S) {
        let mut subscribers = self.lock_subscribers();
        subscribers.retain(|send| send.send(state.clone()).is_ok());
        trace!("State published to {} subscribers", subscribers.len());
    }

    fn lock_state(&self) -> MutexGuard<'_, S> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_subscribers(&self) -> MutexGuard<'_, Vec<Sender<S>>> {
        self.inner
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
