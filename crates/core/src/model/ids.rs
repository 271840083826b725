use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a Word, kept in the form it had in the word source.
///
/// Identifiers are ordinal numbers in practice (`"1"`, `"2"`, ...) but nothing
/// guarantees that, so the numeric view is optional.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WordId(String);

impl WordId {
    /// Creates a new `WordId`; surrounding whitespace is trimmed.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        let raw: String = id.into();
        let trimmed = raw.trim();
        if trimmed.len() == raw.len() {
            Self(raw)
        } else {
            Self(trimmed.to_owned())
        }
    }

    /// Returns the identifier as written in the source.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the numeric value of the identifier, if it is one.
    #[must_use]
    pub fn numeric(&self) -> Option<u64> {
        self.0.parse::<u64>().ok()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<u64> for WordId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Debug for WordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WordId({})", self.0)
    }
}

impl fmt::Display for WordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_id_trims_and_displays() {
        let id = WordId::new("  42 ");
        assert_eq!(id.to_string(), "42");
        assert_eq!(id.numeric(), Some(42));
    }

    #[test]
    fn non_numeric_id_has_no_numeric_view() {
        assert_eq!(WordId::new("A-7").numeric(), None);
        assert_eq!(WordId::new("-3").numeric(), None);
        assert_eq!(WordId::new("").numeric(), None);
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&WordId::from(12)).unwrap();
        assert_eq!(json, "\"12\"");
    }
}
