use rand::Rng;
use rand::rngs::ThreadRng;
use std::sync::Arc;
use tracing::{debug, info, warn};

use quiz_core::Clock;
use quiz_core::model::{
    IdRange, LoadReport, ProgressRecord, QuizDirection, QuizSettings, SessionLength, SessionType,
    WordPool, WordRecord,
};
use storage::repository::{ProgressRepository, Storage, StorageError};

use super::engine::{AdvanceOutcome, AnswerOutcome, SessionEngine, StartOutcome};
use crate::error::SessionError;
use crate::settings_service::SettingsService;

/// Result of answering a question through the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitResult {
    pub outcome: AnswerOutcome,
    /// `false` when the updated counters could not be written. The in-memory
    /// pool is updated either way.
    pub persisted: bool,
}

/// Wires the session engine to storage: restores counters and settings on
/// startup and writes them back as they change.
pub struct SessionController<R = ThreadRng> {
    engine: SessionEngine<R>,
    progress: Arc<dyn ProgressRepository>,
    settings: SettingsService,
    report: LoadReport,
    /// Stored counters for ids missing from the current word list.
    retained: Vec<ProgressRecord>,
}

impl SessionController<ThreadRng> {
    /// Build the pool from `records` and restore everything persisted in `storage`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the storage backend cannot be reached.
    pub async fn bootstrap(records: Vec<WordRecord>, storage: &Storage) -> Result<Self, SessionError> {
        Self::bootstrap_with_rng(records, storage, rand::rng()).await
    }
}

impl<R: Rng> SessionController<R> {
    /// Same as `bootstrap`, with an explicit random source.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the storage backend cannot be reached.
    pub async fn bootstrap_with_rng(
        records: Vec<WordRecord>,
        storage: &Storage,
        rng: R,
    ) -> Result<Self, SessionError> {
        let persisted = load_persisted_progress(storage.progress.as_ref()).await?;
        let settings = SettingsService::new(Arc::clone(&storage.settings));
        let quiz_settings = settings.load().await?;

        let (pool, report) = WordPool::load(records, &persisted);
        for (id, err) in &report.rejected {
            debug!(id = %id, %err, "rejected word record");
        }
        for id in &report.duplicates {
            debug!(id = %id, "duplicate word id ignored");
        }
        info!(
            accepted = report.accepted,
            restored = report.restored,
            rejected = report.rejected.len(),
            duplicates = report.duplicates.len(),
            "word pool loaded"
        );

        if !report.unmatched.is_empty() {
            debug!(
                count = report.unmatched.len(),
                "keeping stored progress for ids not in the word list"
            );
        }

        Ok(Self {
            engine: SessionEngine::with_rng(pool, quiz_settings, rng),
            progress: Arc::clone(&storage.progress),
            settings,
            retained: report.unmatched.clone(),
            report,
        })
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.engine = self.engine.with_clock(clock);
        self
    }

    #[must_use]
    pub fn engine(&self) -> &SessionEngine<R> {
        &self.engine
    }

    /// What happened to the raw records at startup.
    #[must_use]
    pub fn load_report(&self) -> &LoadReport {
        &self.report
    }

    #[must_use]
    pub fn settings(&self) -> QuizSettings {
        self.engine.settings()
    }

    pub fn start_session(&mut self, session_type: SessionType) -> StartOutcome {
        let outcome = self.engine.start_session(session_type);
        debug!(?session_type, ?outcome, "start session");
        outcome
    }

    /// Score an answer and persist the updated counters.
    ///
    /// Stored counters for ids absent from the word list are written back
    /// unchanged.
    ///
    /// Returns `None` when no question is waiting for an answer.
    pub async fn submit_answer(&mut self, answer: &str) -> Option<SubmitResult> {
        let outcome = self.engine.submit_answer(answer)?;
        let mut records = self.engine.pool().progress_records();
        records.extend(self.retained.iter().cloned());
        let persisted = match self.progress.save_progress(&records).await {
            Ok(()) => true,
            Err(err) => {
                warn!(word_id = %outcome.word_id, %err, "failed to persist word progress");
                false
            }
        };
        Some(SubmitResult { outcome, persisted })
    }

    pub fn advance(&mut self) -> AdvanceOutcome {
        let outcome = self.engine.advance();
        if let AdvanceOutcome::Finished(reason) = outcome {
            if let Some(summary) = self.engine.summary() {
                info!(
                    ?reason,
                    solved = summary.solved(),
                    correct = summary.correct(),
                    "session finished"
                );
            }
        }
        outcome
    }

    pub fn return_to_lobby(&mut self) -> bool {
        self.engine.return_to_lobby()
    }

    /// Forget all learning counters, in storage and in memory. Settings are kept.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if storage cannot be cleared; the in-memory pool
    /// is then left untouched.
    pub async fn reset_progress(&mut self) -> Result<(), SessionError> {
        self.progress.clear_progress().await?;
        self.engine.reset_progress();
        self.retained.clear();
        info!("word progress reset");
        Ok(())
    }

    /// Persist a new direction. Takes effect from the next session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if persistence fails.
    pub async fn set_direction(&mut self, direction: QuizDirection) -> Result<(), SessionError> {
        self.settings.save_direction(direction).await?;
        self.engine.set_settings(QuizSettings {
            direction,
            ..self.engine.settings()
        });
        Ok(())
    }

    /// Persist a new id range. Takes effect from the next session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if `start > end` or persistence fails.
    pub async fn set_range(&mut self, start: u64, end: u64) -> Result<IdRange, SessionError> {
        let range = self.settings.save_range(start, end).await?;
        self.engine.set_settings(QuizSettings {
            range,
            ..self.engine.settings()
        });
        Ok(range)
    }

    /// Persist a new session length. Takes effect from the next session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if `limit` is zero or persistence fails.
    pub async fn set_limit(&mut self, limit: u32) -> Result<SessionLength, SessionError> {
        let limit = self.settings.save_limit(limit).await?;
        self.engine.set_settings(QuizSettings {
            limit,
            ..self.engine.settings()
        });
        Ok(limit)
    }
}

/// Stored counters, or none at all when the stored value is unreadable.
async fn load_persisted_progress(
    repo: &dyn ProgressRepository,
) -> Result<Vec<ProgressRecord>, StorageError> {
    match repo.load_progress().await {
        Ok(records) => Ok(records),
        Err(StorageError::Serialization(reason)) => {
            warn!(%reason, "stored word progress is corrupt, starting fresh");
            Ok(Vec::new())
        }
        Err(err) => Err(err),
    }
}
