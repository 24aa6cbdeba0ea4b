//! # gate-extract
//!
//! Extract multiple-choice (MCQ), multi-select (MSQ) and numerical-answer
//! (NAT) questions from tabular exam papers such as GATE, and serialize them
//! as structured JSON records, optionally with answers from a key.
//!
//! ## Input
//!
//! PDF table extraction happens upstream. This crate consumes its output: a
//! JSON table document of pages → tables → rows → cells, where a cell is a
//! string or `null` (see [`table`]).
//!
//! ## Pipeline Overview
//!
//! ```text
//! table document
//!  │
//!  ├─ 1. Flatten   drop empty cells, row-major per table
//!  ├─ 2. Segment   split at "Q1" / "Q.2" / "Q 3" marker cells
//!  ├─ 3. Classify  id, stem, MCQ / MSQ / NAT, options A–D
//!  ├─ 4. Dedupe    apply the duplicate-id policy across the run
//!  ├─ 5. Key       (optional) attach answers from an answer-key document
//!  └─ 6. Output    pretty JSON array
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gate_extract::{extract, ExtractionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let output = extract("CS1_tables.json", &ExtractionConfig::default()).await?;
//!     for q in &output.questions {
//!         println!("{} [{}] {}", q.id, q.kind, q.question);
//!     }
//!     eprintln!("{} blocks skipped", output.stats.skipped_blocks);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `gate2json` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod extract;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod question;
pub mod stream;
pub mod table;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{
    DuplicatePolicy, ExtractionConfig, ExtractionConfigBuilder, PageSelection, Segmentation,
};
pub use error::{BlockIssue, ExtractError, KeyRowError};
pub use extract::{
    apply_duplicate_policy, extract, extract_document, extract_sync, extract_to_file,
    merge_answer_key_file, merge_answer_key_into_file, process_page,
};
pub use output::{ExtractionOutput, ExtractionStats, MergeReport, PageResult};
pub use pipeline::answer_key::{merge_answers, parse_answer_key, AnswerKey};
pub use pipeline::classify::{classify_block, CLASSIFICATION_RULES};
pub use pipeline::segment::{segment_table, QuestionBlock};
pub use progress::{ExtractionProgressCallback, NoopProgressCallback, ProgressCallback};
pub use question::{OptionLabel, Options, QuestionRecord, QuestionType, FIGURE};
pub use stream::{extract_stream, PageStream};
pub use table::TableDocument;
