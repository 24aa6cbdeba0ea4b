//! Eager (whole-document) extraction entry points.
//!
//! [`extract`] waits for every page, applies the duplicate-id policy across
//! the whole run and returns the final records with per-page detail. Use
//! [`crate::stream::extract_stream`] to receive pages as they finish.

use crate::config::{DuplicatePolicy, ExtractionConfig};
use crate::error::ExtractError;
use crate::output::{ExtractionOutput, ExtractionStats, MergeReport, PageResult};
use crate::pipeline::{answer_key, classify, input, segment, write};
use crate::question::QuestionRecord;
use crate::table::{PageTables, Table, TableDocument};
use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Extract questions from a table document on disk.
///
/// # Errors
/// Returns `Err(ExtractError)` only for fatal errors:
/// - File not found / permission denied / not a table document
/// - Page selection matches no page
/// - Duplicate id under [`DuplicatePolicy::Reject`]
///
/// Dropped and degraded blocks are reported in `output.pages[..].issues`.
pub async fn extract(
    input_path: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, ExtractError> {
    let total_start = Instant::now();
    let input_path = input_path.as_ref();
    info!("Starting extraction: {}", input_path.display());

    // ── Step 1: Load tables ──────────────────────────────────────────────
    let doc = input::load_table_document(input_path).await?;
    let total_pages = doc.page_count();
    info!("Table document has {} pages", total_pages);

    // ── Step 2: Select pages ─────────────────────────────────────────────
    let selected = select_pages(doc, config)?;

    // ── Step 3: Segment and classify, pages in parallel ──────────────────
    let pages = process_concurrent(selected, config).await?;

    // ── Step 4: Duplicate policy and stats ───────────────────────────────
    finish(pages, total_pages, config, total_start)
}

/// Extract and write the resulting questions JSON to `output_path`.
pub async fn extract_to_file(
    input_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<ExtractionStats, ExtractError> {
    let output = extract(input_path, config).await?;
    write::write_questions(&output.questions, output_path).await?;
    Ok(output.stats)
}

/// Synchronous wrapper around [`extract`].
///
/// Creates a temporary tokio runtime internally.
pub fn extract_sync(
    input_path: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, ExtractError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| ExtractError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(extract(input_path, config))
}

/// Extract from an already-loaded document, on the calling thread.
///
/// Same semantics as [`extract`] minus the file I/O; progress callbacks
/// fire in page order.
pub fn extract_document(
    doc: &TableDocument,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, ExtractError> {
    let start = Instant::now();
    let indices = page_indices(doc.page_count(), config)?;
    let total = indices.len();

    if let Some(ref cb) = config.progress_callback {
        cb.on_extraction_start(total);
    }
    let pages = indices
        .into_iter()
        .map(|idx| run_page(idx + 1, &doc.pages[idx], config, total))
        .collect();

    finish(pages, doc.page_count(), config, start)
}

/// Segment and classify every table on one page.
pub fn process_page(page_num: usize, tables: &[Table], config: &ExtractionConfig) -> PageResult {
    let mut result = PageResult {
        page_num,
        tables: tables.len(),
        ..Default::default()
    };

    for table in tables {
        for block in segment::segment_table(table, config.segmentation) {
            result.blocks += 1;
            match classify::classify_block(&block, page_num, config.normalize_fractions) {
                Ok(classified) => {
                    result.issues.extend(classified.degradation);
                    result.questions.push(classified.record);
                }
                Err(issue) => {
                    debug!("Dropping block: {}", issue);
                    result.issues.push(issue);
                }
            }
        }
    }

    debug!(
        "Page {}: {} tables, {} blocks, {} questions",
        page_num,
        result.tables,
        result.blocks,
        result.questions.len()
    );
    result
}

/// Parse the answer-key document at `key_path` and attach answers to `questions`.
pub async fn merge_answer_key_file(
    questions: &mut [QuestionRecord],
    key_path: impl AsRef<Path>,
) -> Result<MergeReport, ExtractError> {
    let key_doc = input::load_table_document(key_path).await?;
    let (key, issues) = answer_key::parse_answer_key(&key_doc);
    let matched = answer_key::merge_answers(questions, &key);
    Ok(MergeReport {
        key_entries: key.len(),
        matched,
        total: questions.len(),
        issues,
    })
}

/// Merge an answer key into a questions file written by an earlier run.
pub async fn merge_answer_key_into_file(
    questions_path: impl AsRef<Path>,
    key_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
) -> Result<MergeReport, ExtractError> {
    let mut questions = input::load_questions(questions_path).await?;
    let report = merge_answer_key_file(&mut questions, key_path).await?;
    write::write_questions(&questions, output_path).await?;
    Ok(report)
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// 0-indexed pages selected by the config; empty selection is an error.
pub(crate) fn page_indices(
    total_pages: usize,
    config: &ExtractionConfig,
) -> Result<Vec<usize>, ExtractError> {
    let indices = config.pages.to_indices(total_pages);
    if indices.is_empty() && total_pages > 0 {
        return Err(ExtractError::PageOutOfRange {
            page: config.pages.first_requested(),
            total: total_pages,
        });
    }
    debug!("Selected {} of {} pages", indices.len(), total_pages);
    Ok(indices)
}

/// Move the selected pages out of `doc` as `(page_num, tables)` pairs.
pub(crate) fn select_pages(
    doc: TableDocument,
    config: &ExtractionConfig,
) -> Result<Vec<(usize, PageTables)>, ExtractError> {
    let indices = page_indices(doc.page_count(), config)?;
    let mut wanted = indices.into_iter().peekable();
    Ok(doc
        .pages
        .into_iter()
        .enumerate()
        .filter(|(idx, _)| wanted.next_if_eq(idx).is_some())
        .map(|(idx, tables)| (idx + 1, tables))
        .collect())
}

/// `process_page` wrapped in progress callbacks.
pub(crate) fn run_page(
    page_num: usize,
    tables: &[Table],
    config: &ExtractionConfig,
    total: usize,
) -> PageResult {
    if let Some(ref cb) = config.progress_callback {
        cb.on_page_start(page_num, total);
    }
    let result = process_page(page_num, tables, config);
    if let Some(ref cb) = config.progress_callback {
        cb.on_page_complete(page_num, total, result.questions.len());
    }
    result
}

/// Process pages on the blocking pool, at most `config.concurrency` at a
/// time, returning results in page order.
async fn process_concurrent(
    pages: Vec<(usize, PageTables)>,
    config: &ExtractionConfig,
) -> Result<Vec<PageResult>, ExtractError> {
    let total = pages.len();
    if let Some(ref cb) = config.progress_callback {
        cb.on_extraction_start(total);
    }

    let joined: Vec<_> = stream::iter(pages.into_iter().map(|(page_num, tables)| {
        let config = config.clone();
        tokio::task::spawn_blocking(move || run_page(page_num, &tables, &config, total))
    }))
    .buffered(config.concurrency)
    .collect()
    .await;

    joined
        .into_iter()
        .map(|r| r.map_err(|e| ExtractError::Internal(format!("Page task panicked: {}", e))))
        .collect()
}

/// Apply the duplicate policy across pages and compute stats.
fn finish(
    pages: Vec<PageResult>,
    total_pages: usize,
    config: &ExtractionConfig,
    start: Instant,
) -> Result<ExtractionOutput, ExtractError> {
    let (questions, duplicate_ids) = apply_duplicate_policy(&pages, config.duplicates)?;

    let stats = ExtractionStats {
        total_pages,
        processed_pages: pages.len(),
        tables: pages.iter().map(|p| p.tables).sum(),
        blocks: pages.iter().map(|p| p.blocks).sum(),
        questions: questions.len(),
        skipped_blocks: pages.iter().map(PageResult::skipped_blocks).sum(),
        figure_placeholders: pages.iter().map(PageResult::figure_placeholders).sum(),
        duplicate_ids,
        total_duration_ms: start.elapsed().as_millis() as u64,
    };

    info!(
        "Extraction complete: {} questions from {}/{} pages, {}ms",
        stats.questions, stats.processed_pages, total_pages, stats.total_duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_extraction_complete(pages.len(), questions.len());
    }

    Ok(ExtractionOutput {
        questions,
        pages,
        stats,
    })
}

/// Flatten page records into the final list under `policy`.
///
/// Returns the records and how many of them repeated an earlier id.
pub fn apply_duplicate_policy(
    pages: &[PageResult],
    policy: DuplicatePolicy,
) -> Result<(Vec<QuestionRecord>, usize), ExtractError> {
    let mut out: Vec<QuestionRecord> = Vec::new();
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut duplicates = 0;

    for page in pages {
        for record in &page.questions {
            let Some(&earlier) = seen.get(&record.id) else {
                seen.insert(record.id.clone(), out.len());
                out.push(record.clone());
                continue;
            };

            duplicates += 1;
            warn!("Duplicate question id {} on page {}", record.id, page.page_num);
            match policy {
                DuplicatePolicy::KeepAll => out.push(record.clone()),
                DuplicatePolicy::FirstWins => {}
                DuplicatePolicy::LastWins => out[earlier] = record.clone(),
                DuplicatePolicy::Reject => {
                    return Err(ExtractError::DuplicateQuestion {
                        id: record.id.clone(),
                        page: page.page_num,
                    })
                }
            }
        }
    }

    Ok((out, duplicates))
}
