use chrono::{DateTime, Utc};
use rand::Rng;
use rand::rngs::ThreadRng;
use std::collections::HashSet;
use std::fmt;

use quiz_core::Clock;
use quiz_core::model::{
    FinishReason, IdRange, QuizDirection, QuizSettings, SessionSummary, SessionType, WordId,
    WordPool, WordProgress,
};
use quiz_core::scoring::score_answer;

use super::progress::SessionProgress;
use super::question::Question;
use super::select::{build_options, pick_next};

//
// ─── TRANSITION OUTCOMES ───────────────────────────────────────────────────────
//

/// Result of `SessionEngine::start_session`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// A first question is on screen.
    Started,
    /// The range filter left nothing to ask; the session went straight to `Finished`.
    NoEligibleWords,
    /// A session is already running.
    Ignored,
}

/// Result of `SessionEngine::advance`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    NextQuestion,
    Finished(FinishReason),
    Ignored,
}

/// What happened when an answer was scored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub word_id: WordId,
    pub is_correct: bool,
    pub correct_answer: String,
    pub progress: WordProgress,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One bounded run of questions. Holds word ids only; counters live in the pool.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    session_type: SessionType,
    direction: QuizDirection,
    range: IdRange,
    limit: u32,
    solved_count: u32,
    correct_count: u32,
    used_ids: HashSet<WordId>,
    asked: Vec<WordId>,
    current: Option<Question>,
    started_at: DateTime<Utc>,
}

impl Session {
    fn new(session_type: SessionType, settings: QuizSettings, started_at: DateTime<Utc>) -> Self {
        Self {
            session_type,
            direction: settings.direction,
            range: settings.range,
            limit: settings.limit.get(),
            solved_count: 0,
            correct_count: 0,
            used_ids: HashSet::new(),
            asked: Vec::new(),
            current: None,
            started_at,
        }
    }

    fn ask(&mut self, question: Question) {
        self.used_ids.insert(question.word_id().clone());
        self.asked.push(question.word_id().clone());
        self.current = Some(question);
    }

    fn has_unanswered(&self) -> bool {
        self.current.as_ref().is_some_and(|q| !q.is_answered())
    }

    fn has_answered(&self) -> bool {
        self.current.as_ref().is_some_and(Question::is_answered)
    }

    #[must_use]
    pub fn session_type(&self) -> SessionType {
        self.session_type
    }

    #[must_use]
    pub fn direction(&self) -> QuizDirection {
        self.direction
    }

    #[must_use]
    pub fn range(&self) -> IdRange {
        self.range
    }

    #[must_use]
    pub fn limit(&self) -> u32 {
        self.limit
    }

    #[must_use]
    pub fn solved_count(&self) -> u32 {
        self.solved_count
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    /// Ids asked so far in this session.
    #[must_use]
    pub fn used_ids(&self) -> &HashSet<WordId> {
        &self.used_ids
    }

    /// Ids in the order they were asked.
    #[must_use]
    pub fn asked(&self) -> &[WordId] {
        &self.asked
    }

    #[must_use]
    pub fn current(&self) -> Option<&Question> {
        self.current.as_ref()
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            limit: self.limit,
            solved: self.solved_count,
            correct: self.correct_count,
            remaining: self.limit.saturating_sub(self.solved_count),
        }
    }
}

//
// ─── PHASE ─────────────────────────────────────────────────────────────────────
//

/// Lifecycle state: `Lobby → InProgress → Finished → Lobby`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SessionPhase {
    #[default]
    Lobby,
    InProgress(Session),
    Finished {
        session: Session,
        summary: SessionSummary,
    },
}

//
// ─── ENGINE ────────────────────────────────────────────────────────────────────
//

/// Owns the word pool and drives one session at a time.
///
/// Every transition either applies completely or is ignored without touching
/// any state, so repeated or out-of-order UI events are harmless.
pub struct SessionEngine<R = ThreadRng> {
    pool: WordPool,
    settings: QuizSettings,
    phase: SessionPhase,
    rng: R,
    clock: Clock,
}

impl<R: Rng> SessionEngine<R> {
    #[must_use]
    pub fn with_rng(pool: WordPool, settings: QuizSettings, rng: R) -> Self {
        Self {
            pool,
            settings,
            phase: SessionPhase::Lobby,
            rng,
            clock: Clock::default(),
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Current pool snapshot. Cheap to clone.
    #[must_use]
    pub fn pool(&self) -> &WordPool {
        &self.pool
    }

    #[must_use]
    pub fn settings(&self) -> QuizSettings {
        self.settings
    }

    /// New settings take effect from the next `start_session`.
    pub fn set_settings(&mut self, settings: QuizSettings) {
        self.settings = settings;
    }

    #[must_use]
    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    /// The running or just-finished session.
    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        match &self.phase {
            SessionPhase::Lobby => None,
            SessionPhase::InProgress(session) | SessionPhase::Finished { session, .. } => {
                Some(session)
            }
        }
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        match &self.phase {
            SessionPhase::InProgress(session) => session.current(),
            _ => None,
        }
    }

    #[must_use]
    pub fn summary(&self) -> Option<&SessionSummary> {
        match &self.phase {
            SessionPhase::Finished { summary, .. } => Some(summary),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        matches!(self.phase, SessionPhase::Finished { .. })
    }

    /// Zero every counter in the pool. The phase is left alone.
    pub fn reset_progress(&mut self) {
        self.pool = self.pool.reset_progress();
    }

    /// Begin a new session from `Lobby` or `Finished`.
    pub fn start_session(&mut self, session_type: SessionType) -> StartOutcome {
        if matches!(self.phase, SessionPhase::InProgress(_)) {
            return StartOutcome::Ignored;
        }

        let mut session = Session::new(session_type, self.settings, self.clock.now());
        if let Some(question) = self.next_question(&session) {
            session.ask(question);
            self.phase = SessionPhase::InProgress(session);
            StartOutcome::Started
        } else {
            self.phase = self.finish(session, FinishReason::PoolExhausted);
            StartOutcome::NoEligibleWords
        }
    }

    /// Score `answer` against the current question and update the pool.
    ///
    /// Returns `None` (and changes nothing) unless a question is waiting for
    /// an answer.
    pub fn submit_answer(&mut self, answer: &str) -> Option<AnswerOutcome> {
        let (phase, outcome) = match std::mem::take(&mut self.phase) {
            SessionPhase::InProgress(mut session) if session.has_unanswered() => {
                let outcome = self.score_current(&mut session, answer);
                (SessionPhase::InProgress(session), outcome)
            }
            other => (other, None),
        };
        self.phase = phase;
        outcome
    }

    /// Move past an answered question: next question or `Finished`.
    pub fn advance(&mut self) -> AdvanceOutcome {
        let (phase, outcome) = match std::mem::take(&mut self.phase) {
            SessionPhase::InProgress(mut session) if session.has_answered() => {
                session.solved_count = session.solved_count.saturating_add(1);
                session.current = None;

                if session.solved_count >= session.limit {
                    (
                        self.finish(session, FinishReason::LimitReached),
                        AdvanceOutcome::Finished(FinishReason::LimitReached),
                    )
                } else if let Some(question) = self.next_question(&session) {
                    session.ask(question);
                    (SessionPhase::InProgress(session), AdvanceOutcome::NextQuestion)
                } else {
                    (
                        self.finish(session, FinishReason::PoolExhausted),
                        AdvanceOutcome::Finished(FinishReason::PoolExhausted),
                    )
                }
            }
            other => (other, AdvanceOutcome::Ignored),
        };
        self.phase = phase;
        outcome
    }

    /// Leave the results screen. Only valid from `Finished`.
    pub fn return_to_lobby(&mut self) -> bool {
        if self.is_finished() {
            self.phase = SessionPhase::Lobby;
            true
        } else {
            false
        }
    }

    fn next_question(&mut self, session: &Session) -> Option<Question> {
        let available = self.pool.available(session.range, &session.used_ids);
        let word = pick_next(&available, session.session_type, &mut self.rng)?;
        let options = build_options(&word, session.direction, &self.pool, &mut self.rng);
        Some(Question::new(&word, session.direction, options))
    }

    fn score_current(&mut self, session: &mut Session, answer: &str) -> Option<AnswerOutcome> {
        let question = session.current.as_mut()?;
        let word = self.pool.get(question.word_id())?;

        let scored = score_answer(word, answer, question.correct_answer());
        self.pool = self
            .pool
            .apply_answer_result(question.word_id(), scored.is_correct);

        question.record(answer, scored.is_correct);
        if scored.is_correct {
            session.correct_count = session.correct_count.saturating_add(1);
        }

        Some(AnswerOutcome {
            word_id: question.word_id().clone(),
            is_correct: scored.is_correct,
            correct_answer: question.correct_answer().to_owned(),
            progress: scored.updated_word.progress(),
        })
    }

    fn finish(&self, session: Session, reason: FinishReason) -> SessionPhase {
        let summary = SessionSummary::new(
            session.session_type,
            session.started_at,
            self.clock.now(),
            session.solved_count,
            session.correct_count,
            reason,
        );
        SessionPhase::Finished { session, summary }
    }
}

impl<R> fmt::Debug for SessionEngine<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionEngine")
            .field("pool_len", &self.pool.len())
            .field("settings", &self.settings)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
