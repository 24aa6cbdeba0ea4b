//! Configuration types for question extraction.
//!
//! All extraction behaviour is controlled through [`ExtractionConfig`], built
//! via its [`ExtractionConfigBuilder`]. Every knob has a default matching the
//! classic GATE-paper layout, so `ExtractionConfig::default()` is usually all
//! a caller needs.

use crate::error::ExtractError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Configuration for one extraction run.
///
/// # Example
/// ```rust
/// use gate_extract::{DuplicatePolicy, ExtractionConfig, Segmentation};
///
/// let config = ExtractionConfig::builder()
///     .segmentation(Segmentation::PerRow)
///     .duplicates(DuplicatePolicy::FirstWins)
///     .concurrency(2)
///     .build()
///     .unwrap();
/// assert_eq!(config.segmentation, Segmentation::PerRow);
/// ```
#[derive(Clone)]
pub struct ExtractionConfig {
    /// How table cells are grouped into question blocks. Default: [`Segmentation::MarkerScan`].
    pub segmentation: Segmentation,

    /// What to do when a question id repeats within one run. Default: [`DuplicatePolicy::KeepAll`].
    pub duplicates: DuplicatePolicy,

    /// Number of pages processed at once on the blocking pool. Default: 4.
    ///
    /// Output order never depends on this value.
    pub concurrency: usize,

    /// Rewrite option values of the form `"3\n4"` to `"3/4"`. Default: false.
    ///
    /// Stacked fractions often come out of table extraction as numerator and
    /// denominator on separate lines.
    pub normalize_fractions: bool,

    /// Page selection. Default: all pages.
    pub pages: PageSelection,

    /// Optional per-page progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            segmentation: Segmentation::default(),
            duplicates: DuplicatePolicy::default(),
            concurrency: 4,
            normalize_fractions: false,
            pages: PageSelection::default(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ExtractionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionConfig")
            .field("segmentation", &self.segmentation)
            .field("duplicates", &self.duplicates)
            .field("concurrency", &self.concurrency)
            .field("normalize_fractions", &self.normalize_fractions)
            .field("pages", &self.pages)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ExtractionProgressCallback>"),
            )
            .finish()
    }
}

impl ExtractionConfig {
    /// Create a new builder for `ExtractionConfig`.
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ExtractionConfig`].
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl ExtractionConfigBuilder {
    pub fn segmentation(mut self, s: Segmentation) -> Self {
        self.config.segmentation = s;
        self
    }

    pub fn duplicates(mut self, policy: DuplicatePolicy) -> Self {
        self.config.duplicates = policy;
        self
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.concurrency = n;
        self
    }

    pub fn normalize_fractions(mut self, v: bool) -> Self {
        self.config.normalize_fractions = v;
        self
    }

    pub fn pages(mut self, selection: PageSelection) -> Self {
        self.config.pages = selection;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExtractionConfig, ExtractError> {
        let c = &self.config;
        if c.concurrency == 0 {
            return Err(ExtractError::InvalidConfig(
                "Concurrency must be ≥ 1".into(),
            ));
        }
        if let PageSelection::Range(start, end) = c.pages {
            if start == 0 || start > end {
                return Err(ExtractError::InvalidConfig(format!(
                    "Invalid page range {start}-{end}"
                )));
            }
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Granularity at which table cells become question blocks.
///
/// | Strategy | Block boundary | Use when |
/// |----------|----------------|----------|
/// | `MarkerScan` | every cell matching `Q\.?\s?\d+` | questions span several rows |
/// | `PerRow` | every non-empty row | the extractor isolates one question per row |
/// | `PerTable` | every table | each question sits in its own table |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Segmentation {
    /// Split a table's flattened cells at question-number markers. (default)
    #[default]
    MarkerScan,
    /// One block per non-empty row; no marker scan.
    PerRow,
    /// One block per table; no marker scan.
    PerTable,
}

/// Policy for question ids that appear more than once in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DuplicatePolicy {
    /// Keep every record in encounter order. (default)
    #[default]
    KeepAll,
    /// Keep the first record for an id, drop later ones.
    FirstWins,
    /// The later record replaces the earlier one in the earlier one's position.
    LastWins,
    /// Abort the run with [`ExtractError::DuplicateQuestion`].
    Reject,
}

/// Specifies which pages of the table document to process.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageSelection {
    /// All pages (default).
    #[default]
    All,
    /// A single page (1-indexed).
    Single(usize),
    /// A contiguous range of pages (1-indexed, inclusive).
    Range(usize, usize),
    /// Specific pages (1-indexed, deduplicated).
    Set(Vec<usize>),
}

impl PageSelection {
    /// Expand the selection into a sorted, deduplicated list of 0-indexed page numbers.
    pub fn to_indices(&self, total_pages: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = match self {
            PageSelection::All => (0..total_pages).collect(),
            PageSelection::Single(p) => {
                if *p >= 1 && *p <= total_pages {
                    vec![p - 1]
                } else {
                    vec![]
                }
            }
            PageSelection::Range(start, end) => {
                let s = (*start).max(1) - 1;
                let e = (*end).min(total_pages);
                (s..e).collect()
            }
            PageSelection::Set(pages) => pages
                .iter()
                .filter(|&&p| p >= 1 && p <= total_pages)
                .map(|p| p - 1)
                .collect(),
        };
        indices.sort_unstable();
        indices.dedup();
        indices
    }

    /// Lowest page the selection asks for (1-indexed), whether or not it exists.
    pub fn first_requested(&self) -> usize {
        match self {
            PageSelection::All => 1,
            PageSelection::Single(p) => *p,
            PageSelection::Range(start, _) => *start,
            PageSelection::Set(pages) => pages.iter().copied().min().unwrap_or(1),
        }
    }
}
