#![forbid(unsafe_code)]

pub mod error;
pub mod sessions;
pub mod settings_service;

pub use quiz_core::Clock;
pub use sessions as session;

pub use error::{SessionError, SettingsServiceError};
pub use settings_service::SettingsService;

pub use sessions::{
    AdvanceOutcome, AnswerOutcome, Feedback, Question, Session, SessionController, SessionEngine,
    SessionPhase, SessionProgress, StartOutcome, SubmitResult,
};
