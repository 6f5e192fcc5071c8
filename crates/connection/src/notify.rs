//! State-change fan-out.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use tokio::sync::broadcast;

use crate::state::{ConnectionState, ConnectionStateChange};

/// Buffered transitions per subscriber before it starts lagging.
const CHANGE_CAPACITY: usize = 128;

/// Publishes [`ConnectionStateChange`]s to any number of subscribers.
///
/// Subscribers own their receivers; dropping one unregisters it. Delivery
/// order equals publish order, so publishing must happen under the same lock
/// that serializes transitions.
pub struct StateNotifier {
    tx: broadcast::Sender<ConnectionStateChange>,
    sequence: AtomicU64,
}

impl Default for StateNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl StateNotifier {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANGE_CAPACITY);
        Self {
            tx,
            sequence: AtomicU64::new(0),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ConnectionStateChange> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    pub fn publish(&self, state: ConnectionState) -> ConnectionStateChange {
        let change = ConnectionStateChange {
            sequence: self.sequence.fetch_add(1, Ordering::SeqCst) + 1,
            state,
            at: Utc::now(),
        };
        // No subscribers is not an error.
        let _ = self.tx.send(change.clone());
        change
    }
}
