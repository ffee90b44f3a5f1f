use super::hub::{Hub, Outbox, Target};
use crate::protocol::CounterServerMessage;
use crate::types::ConnectionId;
use std::sync::Arc;
use tokio::sync::RwLock;

struct CounterInner {
    count: i64,
    hub: Hub<CounterServerMessage>,
}

/// Shared counter gateway state. Starts at zero, lives as long as the process.
#[derive(Clone)]
pub struct CounterState {
    inner: Arc<RwLock<CounterInner>>,
}

impl Default for CounterState {
    fn default() -> Self {
        Self::new()
    }
}

impl CounterState {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(CounterInner {
                count: 0,
                hub: Hub::new(),
            })),
        }
    }

    /// Open a session; the new client privately receives the current count
    pub async fn connect(&self) -> (ConnectionId, Outbox<CounterServerMessage>) {
        let mut inner = self.inner.write().await;
        let (id, outbox) = inner.hub.connect();
        let count = inner.count;
        inner.hub.fanout(
            Target::Connection(&id),
            CounterServerMessage::CountUpdated { count },
        );
        tracing::info!(connection = %id, count, "Counter connection opened");
        (id, outbox)
    }

    pub async fn increment(&self) -> i64 {
        self.update(|count| count.saturating_add(1)).await
    }

    pub async fn decrement(&self) -> i64 {
        self.update(|count| count.saturating_sub(1)).await
    }

    pub async fn reset(&self) -> i64 {
        self.update(|_| 0).await
    }

    pub async fn disconnect(&self, id: &str) {
        if self.inner.write().await.hub.disconnect(id) {
            tracing::info!(connection = %id, "Counter connection closed");
        }
    }

    pub async fn count(&self) -> i64 {
        self.inner.read().await.count
    }

    /// Apply a change and broadcast the new value to everyone
    async fn update(&self, change: impl FnOnce(i64) -> i64) -> i64 {
        let mut inner = self.inner.write().await;
        let count = change(inner.count);
        inner.count = count;
        let delivered = inner
            .hub
            .fanout(Target::All, CounterServerMessage::CountUpdated { count });
        tracing::debug!(count, delivered, "Count updated");
        count
    }
}
