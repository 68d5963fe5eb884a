//! Record store abstraction.
//!
//! The service only ever needs two operations from its backend: an
//! unconditional write and a point lookup. Expiry is the backend's job;
//! every implementation must reclaim records once their `expiry` has
//! passed without any help from the caller.

use async_trait::async_trait;

use crate::models::SettingsRecord;

/// Failures reported by a record store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backend rejected the request as malformed (e.g. a key it cannot accept)
    #[error("backend rejected request: {0}")]
    BadRequest(String),
    /// Any failure not attributable to the caller
    #[error("backend unavailable: {0:#}")]
    Unavailable(#[source] anyhow::Error),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[async_trait]
pub trait RecordStore: Send + Sync + 'static {
    /// Write the record, overwriting any record stored under the same id.
    async fn put(&self, record: SettingsRecord) -> StoreResult<()>;

    /// Look up a record by exact id.
    ///
    /// Returns `Ok(None)` when the record never existed or has been reclaimed.
    async fn get(&self, id: &str) -> StoreResult<Option<SettingsRecord>>;

    /// Verify the backend is reachable.
    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }
}
