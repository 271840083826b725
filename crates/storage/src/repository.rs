use async_trait::async_trait;
use quiz_core::model::{IdRange, ProgressRecord, QuizDirection, SessionLength};
use serde::{Serialize, de::DeserializeOwned};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("word source error: {0}")]
    WordSource(String),
}

/// Keys under which values are stored. One key per independently persisted value.
pub mod keys {
    pub const PROGRESS: &str = "word_progress";
    pub const DIRECTION: &str = "quiz_direction";
    pub const RANGE: &str = "id_range";
    pub const LIMIT: &str = "session_length";
}

/// Raw string storage keyed by name. Values are JSON documents.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn get_value(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Insert or overwrite a value. Last writer wins.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    async fn set_value(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    async fn remove_value(&self, key: &str) -> Result<(), StorageError>;
}

/// Per-word learning counters.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Load every stored record; an empty list when nothing was saved yet.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the stored value is corrupt.
    async fn load_progress(&self) -> Result<Vec<ProgressRecord>, StorageError>;

    /// Replace the stored records.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the records cannot be stored.
    async fn save_progress(&self, records: &[ProgressRecord]) -> Result<(), StorageError>;

    /// Drop all stored counters.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    async fn clear_progress(&self) -> Result<(), StorageError>;
}

/// Quiz configuration. `None` means "never saved".
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    async fn get_direction(&self) -> Result<Option<QuizDirection>, StorageError>;
    async fn save_direction(&self, direction: QuizDirection) -> Result<(), StorageError>;

    async fn get_range(&self) -> Result<Option<IdRange>, StorageError>;
    async fn save_range(&self, range: IdRange) -> Result<(), StorageError>;

    async fn get_limit(&self) -> Result<Option<SessionLength>, StorageError>;
    async fn save_limit(&self, limit: SessionLength) -> Result<(), StorageError>;
}

fn decode<T: DeserializeOwned>(key: &str, raw: &str) -> Result<T, StorageError> {
    serde_json::from_str(raw).map_err(|err| StorageError::Serialization(format!("{key}: {err}")))
}

fn encode<T: Serialize + ?Sized>(key: &str, value: &T) -> Result<String, StorageError> {
    serde_json::to_string(value)
        .map_err(|err| StorageError::Serialization(format!("{key}: {err}")))
}

async fn get_typed<S, T>(store: &S, key: &str) -> Result<Option<T>, StorageError>
where
    S: KeyValueStore + ?Sized,
    T: DeserializeOwned,
{
    match store.get_value(key).await? {
        Some(raw) => decode(key, &raw).map(Some),
        None => Ok(None),
    }
}

async fn set_typed<S, T>(store: &S, key: &str, value: &T) -> Result<(), StorageError>
where
    S: KeyValueStore + ?Sized,
    T: Serialize + Sync + ?Sized,
{
    let raw = encode(key, value)?;
    store.set_value(key, &raw).await
}

#[async_trait]
impl<S: KeyValueStore> ProgressRepository for S {
    async fn load_progress(&self) -> Result<Vec<ProgressRecord>, StorageError> {
        Ok(get_typed(self, keys::PROGRESS).await?.unwrap_or_default())
    }

    async fn save_progress(&self, records: &[ProgressRecord]) -> Result<(), StorageError> {
        set_typed(self, keys::PROGRESS, records).await
    }

    async fn clear_progress(&self) -> Result<(), StorageError> {
        self.remove_value(keys::PROGRESS).await
    }
}

#[async_trait]
impl<S: KeyValueStore> SettingsRepository for S {
    async fn get_direction(&self) -> Result<Option<QuizDirection>, StorageError> {
        get_typed(self, keys::DIRECTION).await
    }

    async fn save_direction(&self, direction: QuizDirection) -> Result<(), StorageError> {
        set_typed(self, keys::DIRECTION, &direction).await
    }

    async fn get_range(&self) -> Result<Option<IdRange>, StorageError> {
        get_typed(self, keys::RANGE).await
    }

    async fn save_range(&self, range: IdRange) -> Result<(), StorageError> {
        set_typed(self, keys::RANGE, &range).await
    }

    async fn get_limit(&self) -> Result<Option<SessionLength>, StorageError> {
        get_typed(self, keys::LIMIT).await
    }

    async fn save_limit(&self, limit: SessionLength) -> Result<(), StorageError> {
        set_typed(self, keys::LIMIT, &limit).await
    }
}

/// Simple in-memory store for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw value currently stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn raw(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    /// Store an arbitrary raw value, bypassing serialization.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn put_raw(&self, key: &str, value: impl Into<String>) -> Result<(), StorageError> {
        let mut guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_owned(), value.into());
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for InMemoryRepository {
    async fn get_value(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.raw(key)
    }

    async fn set_value(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.put_raw(key, value)
    }

    async fn remove_value(&self, key: &str) -> Result<(), StorageError> {
        let mut guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(key);
        Ok(())
    }
}

/// Aggregates the repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub progress: Arc<dyn ProgressRepository>,
    pub settings: Arc<dyn SettingsRepository>,
}

impl Storage {
    /// Wire both repositories to the same key/value backend.
    #[must_use]
    pub fn from_store<S: KeyValueStore + Clone + 'static>(store: S) -> Self {
        let progress: Arc<dyn ProgressRepository> = Arc::new(store.clone());
        let settings: Arc<dyn SettingsRepository> = Arc::new(store);
        Self { progress, settings }
    }
}
