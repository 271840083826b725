use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("range start ({start}) must be <= range end ({end})")]
    InvertedRange { start: u64, end: u64 },

    #[error("session length must be > 0")]
    ZeroSessionLength,
}

//
// ─── DIRECTION ─────────────────────────────────────────────────────────────────
//

/// Which term of a pair is shown and which one is expected as the answer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizDirection {
    #[default]
    PromptToTarget,
    TargetToPrompt,
}

impl QuizDirection {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            QuizDirection::PromptToTarget => "prompt_to_target",
            QuizDirection::TargetToPrompt => "target_to_prompt",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "prompt_to_target" | "forward" => Some(Self::PromptToTarget),
            "target_to_prompt" | "reverse" => Some(Self::TargetToPrompt),
            _ => None,
        }
    }
}

//
// ─── ID RANGE ──────────────────────────────────────────────────────────────────
//

/// Inclusive numeric window applied to word ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawIdRange")]
pub struct IdRange {
    start: u64,
    end: u64,
}

#[derive(Deserialize)]
struct RawIdRange {
    start: u64,
    end: u64,
}

impl TryFrom<RawIdRange> for IdRange {
    type Error = SettingsError;

    fn try_from(raw: RawIdRange) -> Result<Self, Self::Error> {
        IdRange::new(raw.start, raw.end)
    }
}

impl IdRange {
    pub const DEFAULT_START: u64 = 1;
    pub const DEFAULT_END: u64 = 100;

    /// # Errors
    ///
    /// Returns `SettingsError::InvertedRange` if `start > end`.
    pub fn new(start: u64, end: u64) -> Result<Self, SettingsError> {
        if start > end {
            return Err(SettingsError::InvertedRange { start, end });
        }
        Ok(Self { start, end })
    }

    #[must_use]
    pub fn start(&self) -> u64 {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> u64 {
        self.end
    }

    #[must_use]
    pub fn contains(&self, value: u64) -> bool {
        (self.start..=self.end).contains(&value)
    }
}

impl Default for IdRange {
    fn default() -> Self {
        Self {
            start: Self::DEFAULT_START,
            end: Self::DEFAULT_END,
        }
    }
}

//
// ─── SESSION LENGTH ────────────────────────────────────────────────────────────
//

/// Number of questions a session aims for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct SessionLength(u32);

impl SessionLength {
    pub const DEFAULT: u32 = 10;

    /// # Errors
    ///
    /// Returns `SettingsError::ZeroSessionLength` for `0`.
    pub fn new(value: u32) -> Result<Self, SettingsError> {
        if value == 0 {
            return Err(SettingsError::ZeroSessionLength);
        }
        Ok(Self(value))
    }

    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for SessionLength {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl TryFrom<u32> for SessionLength {
    type Error = SettingsError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SessionLength> for u32 {
    fn from(value: SessionLength) -> Self {
        value.0
    }
}

//
// ─── QUIZ SETTINGS ─────────────────────────────────────────────────────────────
//

/// The three user-facing quiz settings. Each one is persisted on its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuizSettings {
    pub direction: QuizDirection,
    pub range: IdRange,
    pub limit: SessionLength,
}
