use serde::{Deserialize, Serialize};

use crate::model::ids::WordId;

/// Learning counters carried by every word.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct WordProgress {
    pub wrong_count: u32,
    pub correct_total: u32,
}

impl WordProgress {
    #[must_use]
    pub fn new(wrong_count: u32, correct_total: u32) -> Self {
        Self {
            wrong_count,
            correct_total,
        }
    }

    /// Counters after a single answer.
    ///
    /// A correct answer walks `wrong_count` back toward zero and sets
    /// `correct_total` to 1; a wrong answer bumps `wrong_count` and clears
    /// `correct_total`.
    #[must_use]
    pub fn after_answer(self, is_correct: bool) -> Self {
        if is_correct {
            Self {
                wrong_count: self.wrong_count.saturating_sub(1),
                correct_total: 1,
            }
        } else {
            Self {
                wrong_count: self.wrong_count.saturating_add(1),
                correct_total: 0,
            }
        }
    }
}

/// Persisted shape of a word's counters, keyed by word id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    pub id: WordId,
    pub wrong_count: u32,
    pub correct_total: u32,
}

impl ProgressRecord {
    #[must_use]
    pub fn new(id: WordId, progress: WordProgress) -> Self {
        Self {
            id,
            wrong_count: progress.wrong_count,
            correct_total: progress.correct_total,
        }
    }

    #[must_use]
    pub fn progress(&self) -> WordProgress {
        WordProgress::new(self.wrong_count, self.correct_total)
    }
}
