use flume::Receiver;

use crate::Error;

/// Receiving end of a [`Store`](crate::Store) subscription.
#[derive(Debug)]
pub struct Subscription<S> {
    recv: Receiver<S>,
}

impl<S> Subscription<S> {
    pub(crate) fn new(recv: Receiver<S>) -> Self {
        Self { recv }
    }

    /// Drains everything queued and returns the newest snapshot, if any.
    ///
    /// Meant for render loops that only care about the latest state.
    pub fn try_latest(&self) -> Option<S> {
        self.recv.try_iter().last()
    }

    /// Drains everything queued, oldest first.
    pub fn drain(&self) -> Vec<S> {
        self.recv.try_iter().collect()
    }

    /// Waits for the next published snapshot.
    pub async fn recv_async(&self) -> Result<S, Error> {
        self.recv
            .recv_async()
            .await
            .map_err(|_| Error::store_closed("subscription recv"))
    }
}
