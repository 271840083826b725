use crate::model::Word;

/// Result of checking one submitted answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredAnswer {
    pub is_correct: bool,
    pub updated_word: Word,
}

/// Score a submitted answer against the expected one.
///
/// Matching is exact: no trimming, no case folding. The returned word carries
/// the counters produced by [`crate::model::WordProgress::after_answer`].
#[must_use]
pub fn score_answer(word: &Word, submitted: &str, correct: &str) -> ScoredAnswer {
    let is_correct = submitted == correct;
    ScoredAnswer {
        is_correct,
        updated_word: word.with_progress(word.progress().after_answer(is_correct)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{WordProgress, WordRecord};

    fn word() -> Word {
        WordRecord::new("1", "Hund", "dog").validate().unwrap()
    }

    #[test]
    fn exact_match_is_correct() {
        let scored = score_answer(&word(), "dog", "dog");
        assert!(scored.is_correct);
        assert_eq!(scored.updated_word.progress(), WordProgress::new(0, 1));
    }

    #[test]
    fn near_match_is_wrong() {
        let scored = score_answer(&word(), "Dog", "dog");
        assert!(!scored.is_correct);
        assert_eq!(scored.updated_word.progress(), WordProgress::new(1, 0));
    }

    #[test]
    fn wrong_count_never_negative_over_many_answers() {
        let mut current = word();
        let pattern = [true, false, true, true, true, false, false, true, true, true, true];
        for is_correct in pattern {
            let answer = if is_correct { "dog" } else { "cat" };
            current = score_answer(&current, answer, "dog").updated_word;
        }
        assert_eq!(current.wrong_count(), 0);
    }

    #[test]
    fn correct_total_stays_at_one() {
        let mut current = word();
        for _ in 0..5 {
            current = score_answer(&current, "dog", "dog").updated_word;
            assert_eq!(current.correct_total(), 1);
        }
    }

    #[test]
    fn scoring_is_pure() {
        let original = word().with_progress(WordProgress::new(2, 0));
        let first = score_answer(&original, "cat", "dog");
        let second = score_answer(&original, "cat", "dog");
        assert_eq!(first, second);
        assert_eq!(original.wrong_count(), 2);
    }
}
