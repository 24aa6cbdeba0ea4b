//! Pipeline stages for question extraction.
//!
//! Each submodule implements exactly one transformation step, so each can be
//! tested on its own.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ segment ──▶ classify ──▶ (answer_key) ──▶ write
//! (JSON)    (blocks)    (records)    (merge key)      (JSON)
//! ```
//!
//! 1. [`input`]      — load the table document (or an earlier questions file)
//! 2. [`segment`]    — flatten each table and cut it into question blocks
//! 3. [`classify`]   — id, stem, MCQ/MSQ/NAT, options for one block
//! 4. [`answer_key`] — parse a key document and attach answers by id
//! 5. [`write`]      — pretty JSON, written atomically

pub mod answer_key;
pub mod classify;
pub mod input;
pub mod segment;
pub mod write;
