use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::model::{
    ids::WordId,
    progress::{ProgressRecord, WordProgress},
    settings::IdRange,
    word::{Word, WordError, WordRecord},
};

/// Outcome of building a pool from raw rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub accepted: usize,
    pub restored: usize,
    pub rejected: Vec<(String, WordError)>,
    pub duplicates: Vec<WordId>,
    /// Persisted counters whose id matched no loaded word.
    pub unmatched: Vec<ProgressRecord>,
}

/// The full, ordered vocabulary set.
///
/// Pools are values: every update returns a new pool. Words are shared behind
/// `Arc`, so a copy only allocates for the word that actually changed and any
/// snapshot held by a reader stays consistent.
#[derive(Debug, Clone, Default)]
pub struct WordPool {
    words: Vec<Arc<Word>>,
    index: Arc<HashMap<WordId, usize>>,
}

impl WordPool {
    /// Build a pool from raw rows, restoring persisted counters by exact id.
    ///
    /// Rows with a blank id or term are rejected. When an id repeats, the
    /// first row wins.
    #[must_use]
    pub fn load(
        records: impl IntoIterator<Item = WordRecord>,
        persisted: &[ProgressRecord],
    ) -> (Self, LoadReport) {
        let saved: HashMap<&WordId, WordProgress> = persisted
            .iter()
            .map(|record| (&record.id, record.progress()))
            .collect();

        let mut report = LoadReport::default();
        let mut words = Vec::new();
        let mut index = HashMap::new();

        for record in records {
            let raw_id = record.id.clone();
            let word = match record.validate() {
                Ok(word) => word,
                Err(err) => {
                    report.rejected.push((raw_id, err));
                    continue;
                }
            };
            if index.contains_key(word.id()) {
                report.duplicates.push(word.id().clone());
                continue;
            }
            let word = match saved.get(word.id()) {
                Some(progress) => {
                    report.restored += 1;
                    word.with_progress(*progress)
                }
                None => word,
            };
            index.insert(word.id().clone(), words.len());
            words.push(Arc::new(word));
        }
        report.accepted = words.len();

        let mut seen = HashSet::new();
        report.unmatched = persisted
            .iter()
            .filter(|record| !index.contains_key(&record.id) && seen.insert(&record.id))
            .cloned()
            .collect();

        (
            Self {
                words,
                index: Arc::new(index),
            },
            report,
        )
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: &WordId) -> Option<&Arc<Word>> {
        self.index.get(id).map(|&pos| &self.words[pos])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Word>> {
        self.words.iter()
    }

    /// Words whose numeric id lies in `range`, in pool order.
    ///
    /// Ids that are not plain non-negative integers are treated as out of range.
    #[must_use]
    pub fn filter_by_range(&self, range: IdRange) -> Vec<Arc<Word>> {
        self.words
            .iter()
            .filter(|word| word.id().numeric().is_some_and(|n| range.contains(n)))
            .cloned()
            .collect()
    }

    /// In-range words that have not been asked yet.
    #[must_use]
    pub fn available(&self, range: IdRange, used: &HashSet<WordId>) -> Vec<Arc<Word>> {
        self.filter_by_range(range)
            .into_iter()
            .filter(|word| !used.contains(word.id()))
            .collect()
    }

    /// New pool with one word's counters updated for an answer.
    ///
    /// An unknown id yields an unchanged pool.
    #[must_use]
    pub fn apply_answer_result(&self, id: &WordId, is_correct: bool) -> Self {
        let Some(&pos) = self.index.get(id) else {
            return self.clone();
        };
        let current = &self.words[pos];
        self.replace_at(pos, current.with_progress(current.progress().after_answer(is_correct)))
    }

    /// New pool with every counter back at zero.
    #[must_use]
    pub fn reset_progress(&self) -> Self {
        let words = self
            .words
            .iter()
            .map(|word| {
                if word.progress() == WordProgress::default() {
                    Arc::clone(word)
                } else {
                    Arc::new(word.with_progress(WordProgress::default()))
                }
            })
            .collect();
        Self {
            words,
            index: Arc::clone(&self.index),
        }
    }

    /// Counters for every word, in pool order.
    #[must_use]
    pub fn progress_records(&self) -> Vec<ProgressRecord> {
        self.words
            .iter()
            .map(|word| ProgressRecord::new(word.id().clone(), word.progress()))
            .collect()
    }

    /// Number of words with outstanding mistakes.
    #[must_use]
    pub fn training_count(&self) -> usize {
        self.words.iter().filter(|word| word.is_in_training()).count()
    }

    fn replace_at(&self, pos: usize, word: Word) -> Self {
        let mut words = self.words.clone();
        words[pos] = Arc::new(word);
        Self {
            words,
            index: Arc::clone(&self.index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(ids: &[&str]) -> Vec<WordRecord> {
        ids.iter()
            .map(|id| WordRecord::new(*id, format!("p{id}"), format!("t{id}")))
            .collect()
    }

    #[test]
    fn load_rejects_rows_with_empty_terms() {
        let mut rows = records(&["1", "2"]);
        rows.push(WordRecord::new("3", "", "t3"));
        rows.push(WordRecord {
            id: "4".into(),
            prompt: Some("p4".into()),
            target: None,
        });

        let (pool, report) = WordPool::load(rows, &[]);

        assert_eq!(pool.len(), 2);
        assert_eq!(report.accepted, 2);
        assert_eq!(report.rejected.len(), 2);
        assert_eq!(report.rejected[0], ("3".to_string(), WordError::EmptyPrompt));
    }

    #[test]
    fn load_restores_persisted_counters_verbatim() {
        let persisted = vec![
            ProgressRecord::new(WordId::from(2), WordProgress::new(4, 1)),
            ProgressRecord::new(WordId::from(99), WordProgress::new(7, 0)),
        ];
        let (pool, report) = WordPool::load(records(&["1", "2"]), &persisted);

        assert_eq!(report.restored, 1);
        assert_eq!(report.unmatched, vec![persisted[1].clone()]);
        assert_eq!(pool.get(&WordId::from(2)).unwrap().progress(), WordProgress::new(4, 1));
        assert_eq!(pool.get(&WordId::from(1)).unwrap().progress(), WordProgress::default());
        assert!(pool.get(&WordId::from(99)).is_none());
    }

    #[test]
    fn load_keeps_first_duplicate() {
        let mut rows = records(&["1"]);
        rows.push(WordRecord::new("1", "other", "other"));
        let (pool, report) = WordPool::load(rows, &[]);

        assert_eq!(pool.len(), 1);
        assert_eq!(pool.get(&WordId::from(1)).unwrap().prompt(), "p1");
        assert_eq!(report.duplicates, vec![WordId::from(1)]);
    }

    #[test]
    fn filter_by_range_is_inclusive_and_skips_non_numeric() {
        let (pool, _) = WordPool::load(records(&["1", "2", "x3", "3", "4", "-1"]), &[]);
        let range = IdRange::new(2, 3).unwrap();

        let ids: Vec<String> = pool
            .filter_by_range(range)
            .iter()
            .map(|w| w.id().to_string())
            .collect();

        assert_eq!(ids, vec!["2", "3"]);
    }

    #[test]
    fn available_excludes_used_ids() {
        let (pool, _) = WordPool::load(records(&["1", "2", "3"]), &[]);
        let used: HashSet<WordId> = [WordId::from(2)].into_iter().collect();

        let available = pool.available(IdRange::default(), &used);

        assert_eq!(available.len(), 2);
        assert!(available.iter().all(|w| w.id() != &WordId::from(2)));
    }

    #[test]
    fn apply_answer_result_is_copy_on_write() {
        let (pool, _) = WordPool::load(records(&["1", "2"]), &[]);
        let updated = pool.apply_answer_result(&WordId::from(1), false);

        assert_eq!(pool.get(&WordId::from(1)).unwrap().wrong_count(), 0);
        assert_eq!(updated.get(&WordId::from(1)).unwrap().wrong_count(), 1);
        assert!(Arc::ptr_eq(
            pool.get(&WordId::from(2)).unwrap(),
            updated.get(&WordId::from(2)).unwrap()
        ));
    }

    #[test]
    fn apply_answer_result_ignores_unknown_id() {
        let (pool, _) = WordPool::load(records(&["1"]), &[]);
        let updated = pool.apply_answer_result(&WordId::from(5), false);
        assert_eq!(updated.progress_records(), pool.progress_records());
    }

    #[test]
    fn reset_zeroes_every_counter() {
        let (pool, _) = WordPool::load(records(&["1", "2"]), &[]);
        let pool = pool
            .apply_answer_result(&WordId::from(1), false)
            .apply_answer_result(&WordId::from(2), true);
        assert_eq!(pool.training_count(), 1);

        let reset = pool.reset_progress();

        assert!(reset
            .progress_records()
            .iter()
            .all(|r| r.wrong_count == 0 && r.correct_total == 0));
        assert_eq!(reset.training_count(), 0);
    }
}
