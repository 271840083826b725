use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How the next word of a session is chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionType {
    /// Uniform random pick among eligible words.
    #[default]
    Normal,
    /// Always the eligible word with the most outstanding mistakes.
    Training,
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    LimitReached,
    PoolExhausted,
}

/// Aggregate summary for a finished quiz session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    session_type: SessionType,
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
    solved: u32,
    correct: u32,
    reason: FinishReason,
}

impl SessionSummary {
    /// Build a summary; `completed_at` earlier than `started_at` is clamped and
    /// `correct` is capped at `solved`.
    #[must_use]
    pub fn new(
        session_type: SessionType,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
        solved: u32,
        correct: u32,
        reason: FinishReason,
    ) -> Self {
        Self {
            session_type,
            started_at,
            completed_at: completed_at.max(started_at),
            solved,
            correct: correct.min(solved),
            reason,
        }
    }

    #[must_use]
    pub fn session_type(&self) -> SessionType {
        self.session_type
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    #[must_use]
    pub fn solved(&self) -> u32 {
        self.solved
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn reason(&self) -> FinishReason {
        self.reason
    }

    /// `correct / max(solved, 1)`.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        f64::from(self.correct) / f64::from(self.solved.max(1))
    }

    /// Accuracy as a whole percentage, rounded to nearest.
    #[must_use]
    pub fn accuracy_percent(&self) -> u32 {
        let solved = u64::from(self.solved.max(1));
        let scaled = (u64::from(self.correct) * 100 + solved / 2) / solved;
        u32::try_from(scaled).unwrap_or(100)
    }
}
