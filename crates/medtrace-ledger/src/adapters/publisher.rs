//! Ledger notification publishers.

use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::trace;

use crate::domain::LedgerEvent;
use crate::ports::outbound::LedgerEventPublisher;

/// Discards every notification.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopEventPublisher;

#[async_trait]
impl LedgerEventPublisher for NoopEventPublisher {
    async fn publish(&self, _event: LedgerEvent) {}
}

/// Fans notifications out to any number of `tokio::sync::broadcast`
/// subscribers. Slow subscribers lag and lose old notifications; with no
/// subscribers the notification is dropped.
#[derive(Clone, Debug)]
pub struct BroadcastEventPublisher {
    sender: broadcast::Sender<LedgerEvent>,
}

impl BroadcastEventPublisher {
    /// Default channel capacity.
    pub const DEFAULT_CAPACITY: usize = 256;

    /// Create a publisher with room for `capacity` undelivered notifications.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Subscribe to notifications published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<LedgerEvent> {
        self.sender.subscribe()
    }

    /// Current number of subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for BroadcastEventPublisher {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

#[async_trait]
impl LedgerEventPublisher for BroadcastEventPublisher {
    async fn publish(&self, event: LedgerEvent) {
        if self.sender.send(event).is_err() {
            trace!("[medtrace] No subscribers for ledger notification");
        }
    }
}
