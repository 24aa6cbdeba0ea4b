//! Progress-callback trait for per-page extraction events.
//!
//! Inject an [`Arc<dyn ExtractionProgressCallback>`] via
//! [`crate::config::ExtractionConfigBuilder::progress_callback`] to receive
//! events as the driver works through the table document.
//!
//! # Example
//!
//! ```rust
//! use gate_extract::{ExtractionConfig, ExtractionProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     questions: AtomicUsize,
//! }
//!
//! impl ExtractionProgressCallback for CountingCallback {
//!     fn on_page_complete(&self, page_num: usize, total_pages: usize, questions: usize) {
//!         self.questions.fetch_add(questions, Ordering::SeqCst);
//!         eprintln!("Page {}/{}: {} questions", page_num, total_pages, questions);
//!     }
//! }
//!
//! let config = ExtractionConfig::builder()
//!     .progress_callback(Arc::new(CountingCallback { questions: AtomicUsize::new(0) }))
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the extraction driver as it processes each page.
///
/// Implementations must be `Send + Sync`: pages run concurrently on the
/// blocking pool, so `on_page_start` and `on_page_complete` may be called
/// from different threads. All methods default to no-ops.
pub trait ExtractionProgressCallback: Send + Sync {
    /// Called once before any page is processed.
    fn on_extraction_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called just before a page's tables are segmented.
    ///
    /// * `page_num`    — 1-indexed page number
    /// * `total_pages` — pages selected for this run
    fn on_page_start(&self, page_num: usize, total_pages: usize) {
        let _ = (page_num, total_pages);
    }

    /// Called when a page is done.
    ///
    /// * `questions` — records produced on the page (before duplicate handling)
    fn on_page_complete(&self, page_num: usize, total_pages: usize, questions: usize) {
        let _ = (page_num, total_pages, questions);
    }

    /// Called once after all pages have been processed.
    fn on_extraction_complete(&self, total_pages: usize, questions: usize) {
        let _ = (total_pages, questions);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ExtractionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ExtractionConfig`].
pub type ProgressCallback = Arc<dyn ExtractionProgressCallback>;
