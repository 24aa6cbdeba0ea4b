//! Answer-key parsing and merge.
//!
//! GATE answer keys are published as a table per page with rows shaped like
//! `[question_number, session, type, key, marks]`. The question number is
//! the first cell and the key is the second cell from the right. Header rows
//! and anything else whose first cell is not a plain number are skipped.

use crate::error::{BlockIssue, KeyRowError};
use crate::question::{question_id, QuestionRecord};
use crate::table::{Cell, TableDocument};
use std::collections::HashMap;
use tracing::{info, warn};

/// Question id → raw answer text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerKey {
    entries: HashMap<String, String>,
}

impl AnswerKey {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the answer for `id`.
    pub fn insert(&mut self, id: impl Into<String>, answer: impl Into<String>) {
        self.entries.insert(id.into(), answer.into());
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.entries.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Read one key row into `(id, answer)`.
///
/// `Ok(None)` means the row is a header or otherwise not a question row and
/// is skipped quietly; `Err` means it looked like data but was unusable.
pub fn parse_key_row(row: &[Cell]) -> Result<Option<(String, String)>, KeyRowError> {
    if row.len() < 2 {
        return Err(KeyRowError::TooShort { cells: row.len() });
    }

    let number = row[0]
        .as_deref()
        .ok_or(KeyRowError::MissingCell { column: 0 })?
        .trim();
    let answer_col = row.len() - 2;
    let answer = row[answer_col]
        .as_deref()
        .ok_or(KeyRowError::MissingCell { column: answer_col })?
        .trim();

    if number.is_empty() || !number.chars().all(|c| c.is_ascii_digit()) {
        return Ok(None);
    }

    Ok(Some((question_id(number), answer.to_string())))
}

/// Build an answer key from every table row in `doc`.
///
/// Rows that fail to parse are reported as [`BlockIssue::KeyRow`] and
/// skipped. Later rows overwrite earlier ones with the same id.
pub fn parse_answer_key(doc: &TableDocument) -> (AnswerKey, Vec<BlockIssue>) {
    let mut key = AnswerKey::new();
    let mut issues = Vec::new();

    for (page, row) in doc.rows() {
        match parse_key_row(row) {
            Ok(Some((id, answer))) => key.insert(id, answer),
            Ok(None) => {}
            // Empty and single-cell rows are layout noise, not worth a warning.
            Err(KeyRowError::TooShort { .. }) => {}
            Err(reason) => {
                warn!("Skipping answer-key row {:?} on page {}: {}", row, page, reason);
                issues.push(BlockIssue::KeyRow {
                    page,
                    row: row.clone(),
                    reason,
                });
            }
        }
    }

    info!("Parsed {} answer-key entries", key.len());
    (key, issues)
}

/// Attach answers to every record whose id is in `key`.
///
/// Existing answers are overwritten. Returns the number of records matched.
pub fn merge_answers(questions: &mut [QuestionRecord], key: &AnswerKey) -> usize {
    let mut matched = 0;
    for q in questions.iter_mut() {
        if let Some(answer) = key.get(&q.id) {
            q.answer = Some(answer.to_string());
            matched += 1;
        }
    }
    info!("Injected answers for {}/{} questions", matched, questions.len());
    matched
}
