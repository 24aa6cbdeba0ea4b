//! Error types for the gate-extract library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`ExtractError`] — **Fatal**: the run cannot proceed at all (missing or
//!   unparsable table document, rejected duplicate, unwritable output).
//!   Returned as `Err(ExtractError)` from the top-level `extract*` functions.
//!
//! * [`BlockIssue`] — **Non-fatal**: a single question block or answer-key
//!   row was skipped or degraded to a placeholder. Stored inside
//!   [`crate::output::PageResult`] so callers can audit what was dropped
//!   without losing the rest of the paper.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the gate-extract library.
///
/// Block-level problems use [`BlockIssue`] and are stored in
/// [`crate::output::PageResult`] rather than propagated here.
#[derive(Debug, Error)]
pub enum ExtractError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("Table document not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file was read but is not a table document.
    #[error("'{path}' is not a valid table document: {detail}")]
    InvalidTableDocument { path: PathBuf, detail: String },

    /// The file was read but is not a JSON array of question records.
    #[error("'{path}' is not a valid questions file: {detail}")]
    InvalidQuestions { path: PathBuf, detail: String },

    /// Selected page numbers exceed the actual page count.
    #[error("Page {page} is out of range (document has {total} pages)")]
    PageOutOfRange { page: usize, total: usize },

    // ── Extraction errors ─────────────────────────────────────────────────
    /// A question id appeared twice while duplicates are rejected.
    #[error("Duplicate question id '{id}' on page {page}")]
    DuplicateQuestion { id: String, page: usize },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output JSON file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Why a single answer-key row was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
pub enum KeyRowError {
    #[error("row has {cells} cell(s), need at least 2")]
    TooShort { cells: usize },

    #[error("cell {column} is empty")]
    MissingCell { column: usize },
}

/// A non-fatal problem with one block or one answer-key row.
///
/// The run always continues; the affected unit is either dropped
/// (`MalformedBlock`, `KeyRow`) or degraded to a `FIGURE` placeholder
/// (`EmptyContent`, `NoOptionsFound`).
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
pub enum BlockIssue {
    /// First cell carries no question-number marker; block dropped.
    #[error("Page {page}: block starting with {first_cell:?} has no question marker")]
    MalformedBlock { page: usize, first_cell: String },

    /// Nothing after the marker cell; emitted as a FIGURE question.
    #[error("Page {page}: {id} has no text, emitted as FIGURE")]
    EmptyContent { page: usize, id: String },

    /// Choice question without recognisable options; options set to FIGURE.
    #[error("Page {page}: {id} has no options, emitted FIGURE options")]
    NoOptionsFound { page: usize, id: String },

    /// Answer-key row skipped.
    #[error("Page {page}: answer-key row {row:?} skipped: {reason}")]
    KeyRow {
        page: usize,
        row: Vec<Option<String>>,
        reason: KeyRowError,
    },
}

impl BlockIssue {
    /// True for issues that dropped the unit entirely rather than degrading it.
    pub fn is_skip(&self) -> bool {
        matches!(self, BlockIssue::MalformedBlock { .. } | BlockIssue::KeyRow { .. })
    }
}
