use async_trait::async_trait;
use dashmap::DashMap;

use crate::models::order::TrackingAttributes;

/// Keeps the UTM attribution of each PIX charge until it is paid.
///
/// Implementations must be safe to share across request tasks. `get` never
/// fails: an unknown id yields [`TrackingAttributes::default`].
#[async_trait]
pub trait TrackingStore: Send + Sync {
    async fn put(&self, transaction_id: &str, attrs: TrackingAttributes);
    async fn get(&self, transaction_id: &str) -> TrackingAttributes;
}

/// Process-local store. Entries live until shutdown.
#[derive(Debug, Default)]
pub struct InMemoryTrackingStore {
    entries: DashMap<String, TrackingAttributes>,
}

impl InMemoryTrackingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TrackingStore for InMemoryTrackingStore {
    async fn put(&self, transaction_id: &str, attrs: TrackingAttributes) {
        self.entries.insert(transaction_id.to_string(), attrs);
    }

    async fn get(&self, transaction_id: &str) -> TrackingAttributes {
        self.entries
            .get(transaction_id)
            .map(|entry| entry.clone())
            .unwrap_or_default()
    }
}
