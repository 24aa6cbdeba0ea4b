//! Table document: the hand-off format from the PDF table extractor.
//!
//! Table extraction itself happens outside this crate. Whatever extractor is
//! used produces, per page, zero or more tables; each table is a list of rows
//! and each row a list of cells, where a cell is either text or absent
//! (`null`). That nested shape is what `pdfplumber`'s `extract_tables`
//! returns, and it is what this module deserializes.
//!
//! Two JSON layouts are accepted:
//!
//! ```text
//! [[[["Q1", "What is 2+2?"], ["(A) 3", null]]]]        pages → tables → rows → cells
//! {"source": "CS1.pdf", "pages": [ ...same... ]}       wrapped, with provenance
//! ```

use serde::{Deserialize, Serialize};

/// One cell; `None` when the extractor found no text in that grid position.
pub type Cell = Option<String>;

/// One row of cells, left to right.
pub type Row = Vec<Cell>;

/// One table, top to bottom.
pub type Table = Vec<Row>;

/// All tables found on one page, in extraction order.
pub type PageTables = Vec<Table>;

/// A whole document's worth of extracted tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDocument {
    /// Where the tables came from (usually the PDF file name).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    pub pages: Vec<PageTables>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DocumentRepr {
    Bare(Vec<PageTables>),
    Wrapped {
        #[serde(default)]
        source: Option<String>,
        pages: Vec<PageTables>,
    },
}

impl TableDocument {
    pub fn new(pages: Vec<PageTables>) -> Self {
        Self {
            source: None,
            pages,
        }
    }

    /// Parse either accepted JSON layout.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        Ok(match serde_json::from_str::<DocumentRepr>(s)? {
            DocumentRepr::Bare(pages) => Self::new(pages),
            DocumentRepr::Wrapped { source, pages } => Self { source, pages },
        })
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn table_count(&self) -> usize {
        self.pages.iter().map(Vec::len).sum()
    }

    /// Every row of every table on every page, in document order.
    pub fn rows(&self) -> impl Iterator<Item = (usize, &Row)> {
        self.pages.iter().enumerate().flat_map(|(idx, tables)| {
            tables
                .iter()
                .flat_map(move |table| table.iter().map(move |row| (idx + 1, row)))
        })
    }
}

/// Keep a cell only if it carries text.
fn present(cell: &Cell) -> Option<&str> {
    cell.as_deref().filter(|s| !s.is_empty())
}

/// Flatten one row, dropping absent and empty cells.
pub fn flatten_row(row: &[Cell]) -> Vec<String> {
    row.iter().filter_map(present).map(str::to_owned).collect()
}

/// Flatten a table row-major, left to right, dropping absent and empty cells.
pub fn flatten_table(table: &[Row]) -> Vec<String> {
    table.iter().flat_map(|row| flatten_row(row)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(s: &str) -> Cell {
        Some(s.to_string())
    }

    #[test]
    fn flatten_drops_null_and_empty_cells() {
        let table: Table = vec![
            vec![cell("Q1"), None, cell("")],
            vec![cell("stem"), cell("(A) x")],
        ];
        assert_eq!(flatten_table(&table), vec!["Q1", "stem", "(A) x"]);
    }

    #[test]
    fn flatten_keeps_whitespace_only_cells() {
        // only truly empty cells are dropped; trimming happens downstream
        assert_eq!(flatten_row(&[cell(" "), cell("a")]), vec![" ", "a"]);
    }

    #[test]
    fn parses_bare_layout() {
        let doc = TableDocument::from_json(r#"[[[["Q1", null], ["text"]]], []]"#).unwrap();
        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.table_count(), 1);
        assert_eq!(doc.source, None);
        assert_eq!(doc.pages[0][0][0], vec![cell("Q1"), None]);
    }

    #[test]
    fn parses_wrapped_layout() {
        let doc =
            TableDocument::from_json(r#"{"source": "CS1.pdf", "pages": [[[["5", "C"]]]]}"#)
                .unwrap();
        assert_eq!(doc.source.as_deref(), Some("CS1.pdf"));
        assert_eq!(doc.rows().count(), 1);
    }

    #[test]
    fn rejects_non_table_json() {
        assert!(TableDocument::from_json(r#"{"questions": []}"#).is_err());
        assert!(TableDocument::from_json(r#"[1, 2, 3]"#).is_err());
    }

    #[test]
    fn rows_are_tagged_with_one_indexed_page() {
        let doc = TableDocument::new(vec![
            vec![vec![vec![cell("a")]]],
            vec![vec![vec![cell("b")], vec![cell("c")]]],
        ]);
        let pages: Vec<usize> = doc.rows().map(|(p, _)| p).collect();
        assert_eq!(pages, vec![1, 2, 2]);
    }
}
