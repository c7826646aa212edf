//! Live snapshot subscription.

use super::Snapshot;
use tokio::sync::watch;

/// Continuously-updating read of all contacts.
///
/// Snapshots published while the subscriber is busy are coalesced; `next`
/// always returns the newest one. Dropping the subscription cancels it.
pub struct ContactSubscription {
    receiver: watch::Receiver<Snapshot>,
    primed: bool,
}

impl ContactSubscription {
    pub(super) fn new(receiver: watch::Receiver<Snapshot>) -> Self {
        Self {
            receiver,
            primed: false,
        }
    }

    /// Waits for the next snapshot.
    ///
    /// The first call returns immediately with the current snapshot.
    /// Returns `None` once every handle to the store has been dropped.
    pub async fn next(&mut self) -> Option<Snapshot> {
        if self.primed {
            self.receiver.changed().await.ok()?;
        }
        self.primed = true;
        Some(self.receiver.borrow_and_update().clone())
    }

    /// Returns the newest snapshot without waiting or marking it seen.
    pub fn latest(&self) -> Snapshot {
        self.receiver.borrow().clone()
    }
}
