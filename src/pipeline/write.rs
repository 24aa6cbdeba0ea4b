//! Output: pretty-printed JSON written atomically.
//!
//! The file is written next to its final location and renamed into place,
//! so a crash mid-write never leaves a truncated questions file behind.
//! `serde_json` emits non-ASCII characters literally, which keeps Greek
//! letters and math symbols in question text readable.

use crate::error::ExtractError;
use crate::question::QuestionRecord;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Serialize records as a 2-space-indented JSON array.
pub fn to_pretty_json(questions: &[QuestionRecord]) -> Result<String, ExtractError> {
    serde_json::to_string_pretty(questions)
        .map_err(|e| ExtractError::Internal(format!("Failed to serialise questions: {e}")))
}

/// Write records to `path`, creating parent directories as needed.
pub async fn write_questions(
    questions: &[QuestionRecord],
    path: impl AsRef<Path>,
) -> Result<(), ExtractError> {
    let path = path.as_ref().to_path_buf();
    let json = to_pretty_json(questions)?;
    let count = questions.len();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| ExtractError::OutputWriteFailed {
                path: path.clone(),
                source,
            })?;
    }

    let path = tokio::task::spawn_blocking(move || {
        persist_atomically(&path, json.as_bytes()).map(|_| path)
    })
    .await
    .map_err(|e| ExtractError::Internal(format!("Write task panicked: {e}")))??;

    debug!("Wrote {} questions to {}", count, path.display());
    Ok(())
}

/// Temp file in the target directory, then rename over `path`.
fn persist_atomically(path: &Path, bytes: &[u8]) -> Result<(), ExtractError> {
    let write_err = |source| ExtractError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::Builder::new()
        .prefix(".gate_questions")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(write_err)?;
    tmp.write_all(bytes).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}
