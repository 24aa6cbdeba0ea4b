//! Streaming extraction API: emit pages as they complete.
//!
//! Unlike the eager [`crate::extract::extract`], which returns only after
//! all pages finish, [`extract_stream`] yields one [`PageResult`] per page.
//! Pages run concurrently but are yielded in page order.
//!
//! The duplicate-id policy needs the whole run, so it is not applied here;
//! pass collected pages to [`crate::extract::apply_duplicate_policy`] if
//! you need it.

use crate::config::ExtractionConfig;
use crate::error::ExtractError;
use crate::extract::{run_page, select_pages};
use crate::output::PageResult;
use crate::pipeline::input;
use futures::future;
use futures::stream::{self, Stream, StreamExt};
use std::path::Path;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::info;

/// A boxed stream of page results.
pub type PageStream = Pin<Box<dyn Stream<Item = Result<PageResult, ExtractError>> + Send>>;

/// Extract questions page by page.
///
/// Progress callbacks fire as in the eager API; `on_extraction_complete`
/// runs once the stream has yielded its last page, so it needs the stream
/// drained.
///
/// # Returns
/// - `Ok(PageStream)` — one item per selected page, in page order
/// - `Err(ExtractError)` — fatal error (file not found, bad selection, etc.)
pub async fn extract_stream(
    input_path: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<PageStream, ExtractError> {
    let input_path = input_path.as_ref();
    info!("Starting streaming extraction: {}", input_path.display());

    let doc = input::load_table_document(input_path).await?;
    let selected = select_pages(doc, config)?;
    let total = selected.len();
    let concurrency = config.concurrency;
    let config = config.clone();
    let callback = config.progress_callback.clone();

    if let Some(ref cb) = callback {
        cb.on_extraction_start(total);
    }

    let questions = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&questions);

    let pages = stream::iter(selected)
        .map(move |(page_num, tables)| {
            let cfg = config.clone();
            async move {
                tokio::task::spawn_blocking(move || run_page(page_num, &tables, &cfg, total))
                    .await
                    .map_err(|e| ExtractError::Internal(format!("Page task panicked: {}", e)))
            }
        })
        .buffered(concurrency)
        .inspect(move |page| {
            if let Ok(page) = page {
                counter.fetch_add(page.questions.len(), Ordering::Relaxed);
            }
        });

    let complete = stream::once(async move {
        if let Some(cb) = callback {
            cb.on_extraction_complete(total, questions.load(Ordering::Relaxed));
        }
    })
    .filter_map(|()| future::ready(None));

    Ok(Box::pin(pages.chain(complete)))
}
