//! Result types returned by the extraction entry points.

use crate::error::BlockIssue;
use crate::question::QuestionRecord;
use serde::{Deserialize, Serialize};

/// Everything produced for one page of the table document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResult {
    /// 1-indexed page number.
    pub page_num: usize,
    /// Tables found on the page.
    pub tables: usize,
    /// Blocks produced by segmentation, including ones later dropped.
    pub blocks: usize,
    /// Records in block order, before duplicate handling.
    pub questions: Vec<QuestionRecord>,
    /// Dropped or degraded blocks.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<BlockIssue>,
}

impl PageResult {
    pub fn skipped_blocks(&self) -> usize {
        self.issues.iter().filter(|i| i.is_skip()).count()
    }

    pub fn figure_placeholders(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| {
                matches!(
                    i,
                    BlockIssue::EmptyContent { .. } | BlockIssue::NoOptionsFound { .. }
                )
            })
            .count()
    }
}

/// Aggregate counters for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Pages in the table document.
    pub total_pages: usize,
    /// Pages selected and processed.
    pub processed_pages: usize,
    pub tables: usize,
    pub blocks: usize,
    /// Records in the final output, after duplicate handling.
    pub questions: usize,
    /// Blocks dropped for lacking a question marker.
    pub skipped_blocks: usize,
    /// Records with FIGURE stem or FIGURE options.
    pub figure_placeholders: usize,
    /// Records whose id had already been seen in this run.
    pub duplicate_ids: usize,
    pub total_duration_ms: u64,
}

/// Complete result of an extraction run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionOutput {
    /// Final records in extraction order.
    pub questions: Vec<QuestionRecord>,
    /// Per-page breakdown, in page order.
    pub pages: Vec<PageResult>,
    pub stats: ExtractionStats,
}

/// Outcome of merging an answer key into a set of records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeReport {
    /// Distinct ids found in the key.
    pub key_entries: usize,
    /// Records that received an answer.
    pub matched: usize,
    /// Records in the merged set.
    pub total: usize,
    /// Key rows that were skipped.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<BlockIssue>,
}

impl ExtractionOutput {
    /// All non-fatal issues across pages, in page order.
    pub fn issues(&self) -> impl Iterator<Item = &BlockIssue> {
        self.pages.iter().flat_map(|p| p.issues.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_counters_split_skips_from_degradations() {
        let page = PageResult {
            page_num: 1,
            tables: 1,
            blocks: 3,
            questions: vec![QuestionRecord::figure("Q1")],
            issues: vec![
                BlockIssue::MalformedBlock {
                    page: 1,
                    first_cell: "x".into(),
                },
                BlockIssue::EmptyContent {
                    page: 1,
                    id: "Q1".into(),
                },
                BlockIssue::NoOptionsFound {
                    page: 1,
                    id: "Q2".into(),
                },
            ],
        };
        assert_eq!(page.skipped_blocks(), 1);
        assert_eq!(page.figure_placeholders(), 2);
    }

    #[test]
    fn page_without_issues_omits_field() {
        let page = PageResult {
            page_num: 2,
            ..Default::default()
        };
        let v = serde_json::to_value(&page).unwrap();
        assert!(v.get("issues").is_none());
    }
}
