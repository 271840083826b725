//! Reads the vocabulary list from delimited text with a header row.

use std::path::Path;

use quiz_core::model::WordRecord;
use tracing::debug;

use crate::repository::StorageError;

const ID_HEADERS: &[&str] = &["id", "no", "number", "#"];
const PROMPT_HEADERS: &[&str] = &["prompt", "word", "term", "source", "question"];
const TARGET_HEADERS: &[&str] = &["target", "translation", "meaning", "answer"];

/// Rows accepted from a word list, plus how many were dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordSheet {
    pub records: Vec<WordRecord>,
    pub skipped: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Columns {
    id: usize,
    prompt: usize,
    target: usize,
}

impl Columns {
    /// Named headers win; roles left unnamed take the lowest unclaimed columns
    /// in id, prompt, target order.
    fn from_headers(headers: &csv::StringRecord) -> Self {
        let find = |names: &[&str]| {
            headers
                .iter()
                .position(|h| names.contains(&h.trim().to_lowercase().as_str()))
        };
        let named = [find(ID_HEADERS), find(PROMPT_HEADERS), find(TARGET_HEADERS)];

        let mut free = (0..).filter(|pos| !named.contains(&Some(*pos)));
        let [id, prompt, target] =
            named.map(|slot| slot.or_else(|| free.next()).unwrap_or_default());

        Self { id, prompt, target }
    }
}

/// Comma unless the header line clearly uses tabs or semicolons.
fn sniff_delimiter(content: &str) -> u8 {
    let header = content.lines().next().unwrap_or_default();
    if header.contains(',') {
        b','
    } else if header.contains('\t') {
        b'\t'
    } else if header.contains(';') {
        b';'
    } else {
        b','
    }
}

fn cell(record: &csv::StringRecord, pos: usize) -> Option<String> {
    record
        .get(pos)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}

/// Parse a word list. Rows without an id or with a blank term are dropped.
///
/// # Errors
///
/// Returns `StorageError::WordSource` if the header row cannot be read.
pub fn parse_word_csv(content: &str) -> Result<WordSheet, StorageError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .delimiter(sniff_delimiter(content))
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|err| StorageError::WordSource(err.to_string()))?
        .clone();
    let columns = Columns::from_headers(&headers);

    let mut sheet = WordSheet::default();
    for (row_idx, result) in reader.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(err) => {
                debug!(row = row_idx + 1, %err, "skipping unreadable row");
                sheet.skipped += 1;
                continue;
            }
        };

        let (Some(id), Some(prompt), Some(target)) = (
            cell(&record, columns.id),
            cell(&record, columns.prompt),
            cell(&record, columns.target),
        ) else {
            debug!(row = row_idx + 1, "skipping row with missing id or term");
            sheet.skipped += 1;
            continue;
        };

        sheet.records.push(WordRecord::new(id, prompt, target));
    }

    Ok(sheet)
}

/// Read and parse a word list from disk.
///
/// # Errors
///
/// Returns `StorageError::WordSource` if the file cannot be read or parsed.
pub fn read_word_csv(path: &Path) -> Result<WordSheet, StorageError> {
    let content = std::fs::read_to_string(path)
        .map_err(|err| StorageError::WordSource(format!("{}: {err}", path.display())))?;
    parse_word_csv(&content)
}
