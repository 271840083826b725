//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::SettingsError;
use storage::repository::StorageError;

/// Errors emitted by `SettingsService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SettingsServiceError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by the session controller.
///
/// Engine transitions never fail; these only come from the persistence
/// collaborators.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error(transparent)]
    Settings(#[from] SettingsServiceError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
