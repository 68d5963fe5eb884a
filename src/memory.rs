use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::models::SettingsRecord;
use crate::store::{RecordStore, StoreResult};

/// In-process record store for local development and tests
///
/// This store is its own TTL backend: a record whose expiry has passed is
/// dropped when `get` finds it, and every `put` sweeps the whole map first.
#[derive(Clone, Default)]
pub struct MemoryStore {
    records: Arc<RwLock<HashMap<String, SettingsRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records held, including expired ones not yet swept
    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Raw access to a stored record, ignoring expiry
    #[cfg(test)]
    pub async fn raw(&self, id: &str) -> Option<SettingsRecord> {
        self.records.read().await.get(id).cloned()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn put(&self, record: SettingsRecord) -> StoreResult<()> {
        let now = Utc::now().timestamp();
        let mut records = self.records.write().await;

        let before = records.len();
        records.retain(|_, r| r.expiry > now);
        let swept = before - records.len();
        if swept > 0 {
            tracing::debug!("Reclaimed {} expired records", swept);
        }

        tracing::debug!("Stored record with id: {}", record.id);
        records.insert(record.id.clone(), record);
        Ok(())
    }

    async fn get(&self, id: &str) -> StoreResult<Option<SettingsRecord>> {
        let now = Utc::now().timestamp();

        {
            let records = self.records.read().await;
            match records.get(id) {
                Some(record) if record.expiry > now => return Ok(Some(record.clone())),
                Some(_) => {}
                None => return Ok(None),
            }
        }

        let mut records = self.records.write().await;
        if records.get(id).is_some_and(|r| r.expiry <= now) {
            records.remove(id);
            tracing::debug!("Reclaimed expired record with id: {}", id);
        }
        Ok(None)
    }
}
