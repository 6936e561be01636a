//! Operation context shared by every tool invocation.
//!
//! A [`Workspace`] wraps the one remote accessor the process builds at
//! startup. Each operation is an independent read-then-write sequence: it
//! reads a fresh snapshot, plans a batch, and submits it. There is no caching
//! and no locking between operations; two writes to the same resource race
//! at the remote service and the last batch to commit wins.
//!
//! Every remote call is bound to the caller's [`CancellationToken`]. A token
//! cancelled before the write means the write is never issued.

use std::future::Future;
use std::sync::Arc;

use gdrive_types::{DriveFile, ValueRange};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::document::{extract_document_text, plan_document_replacement};
use crate::error::{EngineError, Result, UpstreamError, require_non_empty};
use crate::remote::RemoteResources;
use crate::sheets::rows_from_json;
use crate::slides::{plan_slide_rewrite, render_presentation_text};

/// Default page size for file queries.
pub const DEFAULT_MAX_RESULTS: i64 = 10;

/// Largest page the Drive API accepts.
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Clamp a caller-supplied result limit into the accepted page-size range.
pub fn clamp_page_size(max_results: i64) -> u32 {
    max_results.clamp(1, MAX_PAGE_SIZE as i64) as u32
}

/// Run one remote call under the caller's cancellation token.
async fn guarded<T, F>(cancel: &CancellationToken, call: F) -> Result<T>
where
    F: Future<Output = std::result::Result<T, UpstreamError>>,
{
    if cancel.is_cancelled() {
        return Err(EngineError::Cancelled);
    }
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(EngineError::Cancelled),
        result = call => result.map_err(EngineError::from),
    }
}

/// Explicitly constructed context handed to every operation.
#[derive(Clone)]
pub struct Workspace {
    remote: Arc<dyn RemoteResources>,
}

impl std::fmt::Debug for Workspace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workspace").finish_non_exhaustive()
    }
}

impl Workspace {
    pub fn new(remote: Arc<dyn RemoteResources>) -> Self {
        Self { remote }
    }

    // ========================================================================
    // Documents
    // ========================================================================

    /// Plain text of every paragraph run in a document.
    #[tracing::instrument(skip(self, cancel), level = "debug")]
    pub async fn document_text(&self, document_id: &str, cancel: &CancellationToken) -> Result<String> {
        let document_id = require_non_empty("document ID", document_id)?;
        let doc = guarded(cancel, self.remote.get_document(document_id)).await?;
        Ok(extract_document_text(&doc))
    }

    /// Replace the whole body of a document with `content`.
    #[tracing::instrument(skip(self, content, cancel), fields(content_len = content.len()), level = "debug")]
    pub async fn replace_document_content(
        &self,
        document_id: &str,
        content: &str,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let document_id = require_non_empty("document ID", document_id)?;

        let doc = guarded(cancel, self.remote.get_document(document_id)).await?;
        let mut requests = plan_document_replacement(&doc, content);

        // The service rejects empty ranges and empty inserts
        requests.retain(|req| !req.is_noop());
        if requests.is_empty() {
            debug!(document_id, "document already empty, nothing to submit");
            return Ok(());
        }

        let count = requests.len();
        guarded(cancel, self.remote.submit_document_batch(document_id, requests)).await?;
        info!(document_id, requests = count, "document content replaced");
        Ok(())
    }

    // ========================================================================
    // Presentations
    // ========================================================================

    /// Title line plus the text of every slide.
    #[tracing::instrument(skip(self, cancel), level = "debug")]
    pub async fn presentation_text(&self, presentation_id: &str, cancel: &CancellationToken) -> Result<String> {
        let presentation_id = require_non_empty("presentation ID", presentation_id)?;
        let deck = guarded(cancel, self.remote.get_presentation(presentation_id)).await?;
        Ok(render_presentation_text(&deck))
    }

    /// Clear a slide's text regions and write a new title and body.
    #[tracing::instrument(skip(self, title, content, cancel), level = "debug")]
    pub async fn rewrite_slide(
        &self,
        presentation_id: &str,
        slide_index: i64,
        title: &str,
        content: &str,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let presentation_id = require_non_empty("presentation ID", presentation_id)?;

        let deck = guarded(cancel, self.remote.get_presentation(presentation_id)).await?;
        let requests = plan_slide_rewrite(&deck, slide_index, title, content)?;
        if requests.is_empty() {
            debug!(presentation_id, slide_index, "slide has no text regions, nothing to submit");
            return Ok(());
        }

        let count = requests.len();
        guarded(cancel, self.remote.submit_presentation_batch(presentation_id, requests)).await?;
        info!(presentation_id, slide_index, requests = count, "slide rewritten");
        Ok(())
    }

    // ========================================================================
    // Files
    // ========================================================================

    #[tracing::instrument(skip(self, cancel), level = "debug")]
    pub async fn search_files(
        &self,
        query: &str,
        max_results: i64,
        cancel: &CancellationToken,
    ) -> Result<Vec<DriveFile>> {
        let query = require_non_empty("search query", query)?;
        guarded(cancel, self.remote.search_files(query, clamp_page_size(max_results))).await
    }

    /// List a folder, or My Drive root when `folder_id` is empty.
    #[tracing::instrument(skip(self, cancel), level = "debug")]
    pub async fn list_files(
        &self,
        folder_id: &str,
        max_results: i64,
        cancel: &CancellationToken,
    ) -> Result<Vec<DriveFile>> {
        let folder = Some(folder_id.trim()).filter(|id| !id.is_empty());
        guarded(cancel, self.remote.list_files(folder, clamp_page_size(max_results))).await
    }

    // ========================================================================
    // Spreadsheets
    // ========================================================================

    #[tracing::instrument(skip(self, cancel), level = "debug")]
    pub async fn spreadsheet_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<Vec<Value>>> {
        let spreadsheet_id = require_non_empty("spreadsheet ID", spreadsheet_id)?;
        let range = require_non_empty("range", range)?;
        let vr = guarded(cancel, self.remote.get_values(spreadsheet_id, range)).await?;
        Ok(vr.values)
    }

    /// Write a 2-D JSON array into `range`.
    #[tracing::instrument(skip(self, values, cancel), level = "debug")]
    pub async fn update_spreadsheet_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        values: &Value,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let spreadsheet_id = require_non_empty("spreadsheet ID", spreadsheet_id)?;
        let range = require_non_empty("range", range)?;
        let rows = rows_from_json(values)?;

        let row_count = rows.len();
        guarded(cancel, self.remote.update_values(spreadsheet_id, range, ValueRange::rows(rows))).await?;
        info!(spreadsheet_id, range, rows = row_count, "spreadsheet values updated");
        Ok(())
    }
}
