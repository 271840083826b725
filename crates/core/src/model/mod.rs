mod ids;
mod pool;
mod progress;
mod session;
mod settings;
mod word;

pub use ids::WordId;

pub use pool::{LoadReport, WordPool};
pub use progress::{ProgressRecord, WordProgress};
pub use session::{FinishReason, SessionSummary, SessionType};
pub use settings::{IdRange, QuizDirection, QuizSettings, SessionLength, SettingsError};
pub use word::{Word, WordError, WordRecord};
