use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};
use std::collections::HashSet;
use std::sync::Arc;

use quiz_core::model::{QuizDirection, SessionType, Word, WordPool};

/// Options shown per question when the pool is large enough.
pub const OPTION_COUNT: usize = 4;

/// Pick the next word to ask from the eligible set.
///
/// - `Training`: the word with the highest `wrong_count`, first in order on ties.
/// - `Normal`: a uniformly random word.
///
/// Returns `None` when nothing is eligible.
pub fn pick_next<R: Rng + ?Sized>(
    available: &[Arc<Word>],
    session_type: SessionType,
    rng: &mut R,
) -> Option<Arc<Word>> {
    match session_type {
        SessionType::Training => pick_most_wrong(available),
        SessionType::Normal => available.choose(rng).cloned(),
    }
}

/// Deterministic most-wrong-first pick; the earliest word wins a tie.
#[must_use]
pub fn pick_most_wrong(available: &[Arc<Word>]) -> Option<Arc<Word>> {
    let mut best: Option<&Arc<Word>> = None;
    for word in available {
        if best.is_none_or(|current| word.wrong_count() > current.wrong_count()) {
            best = Some(word);
        }
    }
    best.cloned()
}

/// Build the shuffled answer options for `word`.
///
/// Distractors come from the whole pool, not the range-filtered subset. Terms
/// equal to the correct answer are excluded and duplicates collapse, so at most
/// one option ever matches. With fewer than three distinct distractors the
/// question simply has fewer options.
pub fn build_options<R: Rng + ?Sized>(
    word: &Word,
    direction: QuizDirection,
    pool: &WordPool,
    rng: &mut R,
) -> Vec<String> {
    let correct = word.answer_term(direction);

    let mut seen = HashSet::new();
    let candidates: Vec<&str> = pool
        .iter()
        .filter(|other| other.id() != word.id())
        .map(|other| other.answer_term(direction))
        .filter(|term| *term != correct && seen.insert(*term))
        .collect();

    let mut options: Vec<String> = candidates
        .choose_multiple(rng, OPTION_COUNT - 1)
        .map(|term| (*term).to_owned())
        .collect();
    options.push(correct.to_owned());
    options.shuffle(rng);
    options
}
