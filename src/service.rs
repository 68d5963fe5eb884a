use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::models::SettingsRecord;
use crate::store::{RecordStore, StoreError};

/// Errors surfaced by the settings operations
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("record store unavailable")]
    StoreUnavailable(#[source] StoreError),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::BadRequest(msg) => ServiceError::InvalidInput(msg),
            other => ServiceError::StoreUnavailable(other),
        }
    }
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

/// Outcome of a retrieve; absence is a normal result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Retrieved {
    Found(String),
    NotFound,
}

/// Creates and retrieves shared settings payloads
#[derive(Clone)]
pub struct SettingsService {
    store: Arc<dyn RecordStore>,
    ttl: Duration,
}

impl SettingsService {
    pub fn new(store: Arc<dyn RecordStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    #[cfg(test)]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn health_check(&self) -> Result<(), StoreError> {
        self.store.health_check().await
    }

    /// Store a base64 payload and return the id it can be retrieved by.
    ///
    /// The payload is decoded before anything is written, so malformed input
    /// never reaches the store.
    pub async fn create(&self, settings: Option<&str>) -> ServiceResult<String> {
        self.create_at(settings, Utc::now()).await
    }

    async fn create_at(&self, settings: Option<&str>, now: DateTime<Utc>) -> ServiceResult<String> {
        // Line-wrapped payloads are accepted; whitespace is not part of the alphabet
        let encoded: String = settings
            .unwrap_or_default()
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();
        if encoded.is_empty() {
            return Err(ServiceError::InvalidInput("settings is required".to_string()));
        }

        let data = BASE64
            .decode(&encoded)
            .map_err(|e| ServiceError::InvalidInput(format!("settings is not valid base64: {}", e)))?;

        let record = SettingsRecord {
            id: Uuid::new_v4().to_string(),
            data,
            expiry: (now + self.ttl).timestamp(),
        };
        let id = record.id.clone();
        let size = record.data.len();

        self.store.put(record).await.map_err(ServiceError::StoreUnavailable)?;

        tracing::info!("Created settings record {} ({} bytes)", id, size);
        Ok(id)
    }

    /// Look up a payload by id, re-encoded as base64.
    pub async fn retrieve(&self, key: Option<&str>) -> ServiceResult<Retrieved> {
        let key = match key {
            Some(k) if !k.trim().is_empty() => k,
            _ => return Err(ServiceError::InvalidInput("settingsKey is required".to_string())),
        };

        match self.store.get(key).await? {
            Some(record) if !record.data.is_empty() => {
                tracing::info!("Retrieved settings record {}", key);
                Ok(Retrieved::Found(BASE64.encode(&record.data)))
            }
            Some(_) => {
                tracing::warn!("Settings record {} has no payload, treating as not found", key);
                Ok(Retrieved::NotFound)
            }
            None => {
                tracing::info!("Settings record not found: {}", key);
                Ok(Retrieved::NotFound)
            }
        }
    }
}
