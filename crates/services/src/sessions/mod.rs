mod engine;
mod progress;
mod question;
mod select;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use engine::{AdvanceOutcome, AnswerOutcome, Session, SessionEngine, SessionPhase, StartOutcome};
pub use progress::SessionProgress;
pub use question::{Feedback, Question};
pub use select::{OPTION_COUNT, build_options, pick_most_wrong, pick_next};
pub use workflow::{SessionController, SubmitResult};
