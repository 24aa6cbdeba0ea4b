//! Block segmentation: group a table's cells into per-question blocks.
//!
//! A question in a GATE paper table starts at a cell that begins with its
//! number (`Q1`, `Q.12`, `Q 7`) and runs until the next such cell. Cells
//! before the first marker (headers, section titles) belong to no question
//! and are dropped. A `Q1` later in a cell (queue or register names in the
//! stem) is plain text. Boundaries are detected per cell only; two markers in
//! one cell still open a single block.

use crate::config::Segmentation;
use crate::table::{flatten_row, flatten_table, Table};
use once_cell::sync::Lazy;
use regex::Regex;

/// Question-number marker anywhere in a cell. Capture 1 is the digit run.
pub(crate) static RE_QUESTION_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Q\.?\s?(\d+)").unwrap());

/// Question-number marker at the start of a cell; opens a block.
static RE_BLOCK_START: Lazy<Regex> = Lazy::new(|| Regex::new(r"^Q\.?\s?\d+").unwrap());

/// Ordered cells believed to belong to one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBlock {
    pub cells: Vec<String>,
}

impl QuestionBlock {
    pub fn new(cells: Vec<String>) -> Self {
        Self { cells }
    }

    /// The cell expected to carry the question marker.
    pub fn first_cell(&self) -> Option<&str> {
        self.cells.first().map(String::as_str)
    }

    /// Cells after the marker cell.
    pub fn body(&self) -> &[String] {
        self.cells.get(1..).unwrap_or_default()
    }
}

/// True if the cell begins with a question-number marker.
pub fn is_marker_cell(cell: &str) -> bool {
    RE_BLOCK_START.is_match(cell)
}

/// Indices of every cell that opens a block.
pub fn marker_indices(cells: &[String]) -> Vec<usize> {
    cells
        .iter()
        .enumerate()
        .filter(|(_, cell)| is_marker_cell(cell))
        .map(|(i, _)| i)
        .collect()
}

/// Split flattened cells at marker cells.
///
/// Blocks are contiguous and non-overlapping; concatenated they equal the
/// suffix of `cells` starting at the first marker. No marker → no blocks.
pub fn split_at_markers(cells: Vec<String>) -> Vec<QuestionBlock> {
    let starts = marker_indices(&cells);
    let Some(&first) = starts.first() else {
        return Vec::new();
    };

    let mut blocks = Vec::with_capacity(starts.len());
    let mut rest = cells;
    // Walk boundaries back to front so each split_off hands over owned cells.
    for &start in starts.iter().rev() {
        let block = rest.split_off(start);
        blocks.push(QuestionBlock::new(block));
    }
    debug_assert_eq!(rest.len(), first);
    blocks.reverse();
    blocks
}

/// Segment one table according to the configured strategy.
pub fn segment_table(table: &Table, strategy: Segmentation) -> Vec<QuestionBlock> {
    match strategy {
        Segmentation::MarkerScan => split_at_markers(flatten_table(table)),
        Segmentation::PerRow => table
            .iter()
            .map(|row| flatten_row(row))
            .filter(|cells| !cells.is_empty())
            .map(QuestionBlock::new)
            .collect(),
        Segmentation::PerTable => {
            let cells = flatten_table(table);
            if cells.is_empty() {
                Vec::new()
            } else {
                vec![QuestionBlock::new(cells)]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    fn row(v: &[Option<&str>]) -> Vec<Option<String>> {
        v.iter().map(|c| c.map(str::to_string)).collect()
    }

    #[test]
    fn marker_variants() {
        for m in ["Q1", "Q.2", "Q 3", "Q. 45", "Q007", "Q12 (1 mark)"] {
            assert!(is_marker_cell(m), "{m} should be a marker");
        }
        for m in ["q1", "Q", "Q.", "Q  3", "Question", "12", "Section Q12 (1 mark)"] {
            assert!(!is_marker_cell(m), "{m} should not be a marker");
        }
    }

    #[test]
    fn splits_at_each_marker_and_drops_preamble() {
        let input = cells(&["Header", "Q.No", "Q1", "a", "b", "Q2", "c", "Q3"]);
        let blocks = split_at_markers(input);
        assert_eq!(
            blocks,
            vec![
                QuestionBlock::new(cells(&["Q1", "a", "b"])),
                QuestionBlock::new(cells(&["Q2", "c"])),
                QuestionBlock::new(cells(&["Q3"])),
            ]
        );
    }

    #[test]
    fn blocks_cover_suffix_from_first_marker_exactly_once() {
        let input = cells(&["x", "y", "Q1", "a", "Q2", "Q3", "b", "c", "Q4", "d"]);
        let first = marker_indices(&input)[0];
        let expected = input[first..].to_vec();
        let joined: Vec<String> = split_at_markers(input)
            .into_iter()
            .flat_map(|b| b.cells)
            .collect();
        assert_eq!(joined, expected);
    }

    #[test]
    fn no_marker_yields_no_blocks() {
        assert!(split_at_markers(cells(&["a", "b"])).is_empty());
        assert!(split_at_markers(Vec::new()).is_empty());
    }

    #[test]
    fn two_markers_in_one_cell_open_one_block() {
        let blocks = split_at_markers(cells(&["Q1 Q2", "text"]));
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].body(), &cells(&["text"])[..]);
    }

    #[test]
    fn question_numbers_inside_stem_do_not_split() {
        let blocks = split_at_markers(cells(&[
            "Q.5",
            "Queues Q1 and Q2 are empty. Which holds?",
            "(A) x (B) y",
        ]));
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].first_cell(), Some("Q.5"));
        assert_eq!(blocks[0].body().len(), 2);
    }

    #[test]
    fn single_cell_block_has_empty_body() {
        let blocks = split_at_markers(cells(&["Q4"]));
        assert_eq!(blocks[0].first_cell(), Some("Q4"));
        assert!(blocks[0].body().is_empty());
    }

    #[test]
    fn marker_scan_flattens_rows_first() {
        let table = vec![
            row(&[Some("Q1"), None, Some("What is 2+2?")]),
            row(&[Some("(A) 3 (B) 4"), Some("")]),
            row(&[Some("Q2"), Some("Next")]),
        ];
        let blocks = segment_table(&table, Segmentation::MarkerScan);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].cells, cells(&["Q1", "What is 2+2?", "(A) 3 (B) 4"]));
    }

    #[test]
    fn per_row_yields_one_block_per_non_empty_row() {
        let table = vec![
            row(&[Some("Q1"), Some("a")]),
            row(&[None, Some("")]),
            row(&[Some("no marker here")]),
            row(&[Some("Q2")]),
        ];
        let blocks = segment_table(&table, Segmentation::PerRow);
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[1].first_cell(), Some("no marker here"));
    }

    #[test]
    fn per_table_yields_one_block() {
        let table = vec![row(&[Some("Q9")]), row(&[Some("a"), Some("b")])];
        let blocks = segment_table(&table, Segmentation::PerTable);
        assert_eq!(blocks, vec![QuestionBlock::new(cells(&["Q9", "a", "b"]))]);
        assert!(segment_table(&vec![row(&[None])], Segmentation::PerTable).is_empty());
    }
}
