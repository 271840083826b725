use thiserror::Error;

use crate::model::{ids::WordId, progress::WordProgress, settings::QuizDirection};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum WordError {
    #[error("word id cannot be empty")]
    EmptyId,

    #[error("prompt term cannot be empty")]
    EmptyPrompt,

    #[error("target term cannot be empty")]
    EmptyTarget,
}

//
// ─── RAW RECORD ────────────────────────────────────────────────────────────────
//

/// A row as delivered by the word source, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordRecord {
    pub id: String,
    pub prompt: Option<String>,
    pub target: Option<String>,
}

impl WordRecord {
    #[must_use]
    pub fn new(id: impl Into<String>, prompt: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            prompt: Some(prompt.into()),
            target: Some(target.into()),
        }
    }

    /// Validate the row into a fresh `Word` with zeroed counters.
    ///
    /// # Errors
    ///
    /// Returns `WordError` if the id or either term is missing or blank.
    pub fn validate(self) -> Result<Word, WordError> {
        let id = WordId::new(self.id);
        if id.is_empty() {
            return Err(WordError::EmptyId);
        }
        let prompt = normalize_term(self.prompt).ok_or(WordError::EmptyPrompt)?;
        let target = normalize_term(self.target).ok_or(WordError::EmptyTarget)?;

        Ok(Word {
            id,
            prompt,
            target,
            progress: WordProgress::default(),
        })
    }
}

fn normalize_term(value: Option<String>) -> Option<String> {
    value
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}

//
// ─── WORD ──────────────────────────────────────────────────────────────────────
//

/// A vocabulary pair together with its learning counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    id: WordId,
    prompt: String,
    target: String,
    progress: WordProgress,
}

impl Word {
    #[must_use]
    pub fn id(&self) -> &WordId {
        &self.id
    }

    /// Source-language term.
    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Translated term.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    #[must_use]
    pub fn progress(&self) -> WordProgress {
        self.progress
    }

    #[must_use]
    pub fn wrong_count(&self) -> u32 {
        self.progress.wrong_count
    }

    #[must_use]
    pub fn correct_total(&self) -> u32 {
        self.progress.correct_total
    }

    /// A word with outstanding mistakes is "in training".
    #[must_use]
    pub fn is_in_training(&self) -> bool {
        self.progress.wrong_count > 0
    }

    /// The term shown to the learner for the given direction.
    #[must_use]
    pub fn question_term(&self, direction: QuizDirection) -> &str {
        match direction {
            QuizDirection::PromptToTarget => &self.prompt,
            QuizDirection::TargetToPrompt => &self.target,
        }
    }

    /// The term the learner is expected to pick for the given direction.
    #[must_use]
    pub fn answer_term(&self, direction: QuizDirection) -> &str {
        match direction {
            QuizDirection::PromptToTarget => &self.target,
            QuizDirection::TargetToPrompt => &self.prompt,
        }
    }

    #[must_use]
    pub fn with_progress(&self, progress: WordProgress) -> Self {
        Self {
            progress,
            ..self.clone()
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
