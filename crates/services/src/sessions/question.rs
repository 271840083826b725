use quiz_core::model::{QuizDirection, Word, WordId};

/// Answer state of the question on screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Feedback {
    #[default]
    Unanswered,
    Correct,
    Wrong,
}

/// A multiple-choice question derived from a word at build time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    word_id: WordId,
    prompt: String,
    correct_answer: String,
    options: Vec<String>,
    feedback: Feedback,
    submitted: Option<String>,
}

impl Question {
    pub(crate) fn new(word: &Word, direction: QuizDirection, options: Vec<String>) -> Self {
        Self {
            word_id: word.id().clone(),
            prompt: word.question_term(direction).to_owned(),
            correct_answer: word.answer_term(direction).to_owned(),
            options,
            feedback: Feedback::Unanswered,
            submitted: None,
        }
    }

    #[must_use]
    pub fn word_id(&self) -> &WordId {
        &self.word_id
    }

    /// The term shown to the learner.
    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    /// Candidate answers in display order.
    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn feedback(&self) -> Feedback {
        self.feedback
    }

    /// What the learner picked, once answered.
    #[must_use]
    pub fn submitted(&self) -> Option<&str> {
        self.submitted.as_deref()
    }

    #[must_use]
    pub fn is_answered(&self) -> bool {
        self.feedback != Feedback::Unanswered
    }

    pub(crate) fn record(&mut self, submitted: &str, is_correct: bool) {
        self.submitted = Some(submitted.to_owned());
        self.feedback = if is_correct {
            Feedback::Correct
        } else {
            Feedback::Wrong
        };
    }
}
