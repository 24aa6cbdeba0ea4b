//! Input resolution: validate a user-supplied path and load its contents.
//!
//! Both inputs this crate reads are JSON: a table document produced by the
//! PDF table extractor, and (for answer-key merges) a previously written
//! questions file. Missing files and permission problems get their own
//! errors so the CLI can say something more useful than "os error 2".

use crate::error::ExtractError;
use crate::question::QuestionRecord;
use crate::table::TableDocument;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Read a file to a string, mapping I/O failures to fatal input errors.
async fn read_input(path: &Path) -> Result<String, ExtractError> {
    match tokio::fs::read_to_string(path).await {
        Ok(s) => Ok(s),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(ExtractError::FileNotFound {
            path: path.to_path_buf(),
        }),
        Err(e) if e.kind() == ErrorKind::PermissionDenied => Err(ExtractError::PermissionDenied {
            path: path.to_path_buf(),
        }),
        Err(e) if e.kind() == ErrorKind::InvalidData => Err(ExtractError::InvalidTableDocument {
            path: path.to_path_buf(),
            detail: "file is not UTF-8".into(),
        }),
        Err(e) => Err(ExtractError::Internal(format!(
            "Failed to read '{}': {}",
            path.display(),
            e
        ))),
    }
}

/// Load and parse a table document.
pub async fn load_table_document(path: impl AsRef<Path>) -> Result<TableDocument, ExtractError> {
    let path = path.as_ref();
    let text = read_input(path).await?;
    let mut doc =
        TableDocument::from_json(&text).map_err(|e| ExtractError::InvalidTableDocument {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;

    if doc.source.is_none() {
        doc.source = Some(source_name(path));
    }

    debug!(
        "Loaded table document {}: {} pages, {} tables",
        path.display(),
        doc.page_count(),
        doc.table_count()
    );
    Ok(doc)
}

/// Load a JSON array of question records written by an earlier run.
pub async fn load_questions(path: impl AsRef<Path>) -> Result<Vec<QuestionRecord>, ExtractError> {
    let path = path.as_ref();
    let text = read_input(path).await?;
    let questions: Vec<QuestionRecord> =
        serde_json::from_str(&text).map_err(|e| ExtractError::InvalidQuestions {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
    debug!("Loaded {} questions from {}", questions.len(), path.display());
    Ok(questions)
}

/// File name without directories, used as provenance when the document has none.
fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| PathBuf::from(path).display().to_string())
}
