use std::sync::Arc;

use quiz_core::model::{IdRange, QuizDirection, QuizSettings, SessionLength};
use storage::repository::{SettingsRepository, StorageError};
use tracing::warn;

use crate::error::SettingsServiceError;

#[derive(Clone)]
pub struct SettingsService {
    repo: Arc<dyn SettingsRepository>,
}

/// Missing or unreadable values fall back to the default for that field only.
fn or_default<T: Default>(
    field: &'static str,
    value: Result<Option<T>, StorageError>,
) -> Result<T, StorageError> {
    match value {
        Ok(value) => Ok(value.unwrap_or_default()),
        Err(StorageError::Serialization(reason)) => {
            warn!(field, %reason, "stored setting is corrupt, using default");
            Ok(T::default())
        }
        Err(err) => Err(err),
    }
}

impl SettingsService {
    #[must_use]
    pub fn new(repo: Arc<dyn SettingsRepository>) -> Self {
        Self { repo }
    }

    /// Load persisted settings (or defaults where missing or corrupt).
    ///
    /// # Errors
    ///
    /// Returns `SettingsServiceError` if the backend itself is unreachable.
    pub async fn load(&self) -> Result<QuizSettings, SettingsServiceError> {
        let direction = or_default("direction", self.repo.get_direction().await)?;
        let range = or_default("range", self.repo.get_range().await)?;
        let limit = or_default("limit", self.repo.get_limit().await)?;
        Ok(QuizSettings {
            direction,
            range,
            limit,
        })
    }

    /// # Errors
    ///
    /// Returns `SettingsServiceError` if persistence fails.
    pub async fn save_direction(&self, direction: QuizDirection) -> Result<(), SettingsServiceError> {
        self.repo.save_direction(direction).await?;
        Ok(())
    }

    /// Validate and persist a new id range.
    ///
    /// # Errors
    ///
    /// Returns `SettingsServiceError` if `start > end` or persistence fails.
    pub async fn save_range(&self, start: u64, end: u64) -> Result<IdRange, SettingsServiceError> {
        let range = IdRange::new(start, end)?;
        self.repo.save_range(range).await?;
        Ok(range)
    }

    /// Validate and persist a new session length.
    ///
    /// # Errors
    ///
    /// Returns `SettingsServiceError` if `limit` is zero or persistence fails.
    pub async fn save_limit(&self, limit: u32) -> Result<SessionLength, SettingsServiceError> {
        let limit = SessionLength::new(limit)?;
        self.repo.save_limit(limit).await?;
        Ok(limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::SettingsError;
    use storage::repository::{InMemoryRepository, keys};

    fn service() -> (SettingsService, InMemoryRepository) {
        let repo = InMemoryRepository::new();
        (SettingsService::new(Arc::new(repo.clone())), repo)
    }

    #[tokio::test]
    async fn empty_store_loads_defaults() {
        let (service, _) = service();
        let settings = service.load().await.unwrap();
        assert_eq!(settings, QuizSettings::default());
        assert_eq!(settings.range.start(), 1);
        assert_eq!(settings.range.end(), 100);
        assert_eq!(settings.limit.get(), 10);
    }

    #[tokio::test]
    async fn saved_values_are_loaded_back() {
        let (service, _) = service();
        service
            .save_direction(QuizDirection::TargetToPrompt)
            .await
            .unwrap();
        service.save_range(20, 30).await.unwrap();
        service.save_limit(5).await.unwrap();

        let settings = service.load().await.unwrap();
        assert_eq!(settings.direction, QuizDirection::TargetToPrompt);
        assert_eq!(settings.range, IdRange::new(20, 30).unwrap());
        assert_eq!(settings.limit.get(), 5);
    }

    #[tokio::test]
    async fn corrupt_field_falls_back_alone() {
        let (service, repo) = service();
        service.save_limit(7).await.unwrap();
        repo.put_raw(keys::RANGE, "[oops").unwrap();

        let settings = service.load().await.unwrap();
        assert_eq!(settings.range, IdRange::default());
        assert_eq!(settings.limit.get(), 7);
    }

    #[tokio::test]
    async fn invalid_values_are_rejected_and_not_stored() {
        let (service, repo) = service();

        let err = service.save_range(9, 3).await.unwrap_err();
        assert!(matches!(
            err,
            SettingsServiceError::Settings(SettingsError::InvertedRange { start: 9, end: 3 })
        ));
        let err = service.save_limit(0).await.unwrap_err();
        assert!(matches!(
            err,
            SettingsServiceError::Settings(SettingsError::ZeroSessionLength)
        ));

        assert!(repo.raw(keys::RANGE).unwrap().is_none());
        assert!(repo.raw(keys::LIMIT).unwrap().is_none());
    }
}
