//! Remote resource accessor seam.
//!
//! The engine never talks HTTP itself. It reads snapshots and submits batches
//! through this trait, which the Google client implements for production and
//! the in-memory double implements for tests.

use async_trait::async_trait;
use gdrive_types::{Document, DocumentRequest, DriveFile, Presentation, PresentationRequest, ValueRange};

use crate::error::UpstreamError;

/// Result type for remote calls.
pub type RemoteResult<T> = std::result::Result<T, UpstreamError>;

/// Authenticated read/write access to the four resource kinds.
///
/// Batch submissions must be applied by the remote side strictly in array
/// order and all-or-nothing. Implementations never retry.
#[async_trait]
pub trait RemoteResources: Send + Sync {
    // ========================================================================
    // Documents
    // ========================================================================

    /// Fetch the full structure of a document.
    async fn get_document(&self, document_id: &str) -> RemoteResult<Document>;

    /// Apply an ordered batch of edits to a document.
    async fn submit_document_batch(
        &self,
        document_id: &str,
        requests: Vec<DocumentRequest>,
    ) -> RemoteResult<()>;

    // ========================================================================
    // Presentations
    // ========================================================================

    /// Fetch the full structure of a presentation.
    async fn get_presentation(&self, presentation_id: &str) -> RemoteResult<Presentation>;

    /// Apply an ordered batch of edits to a presentation.
    async fn submit_presentation_batch(
        &self,
        presentation_id: &str,
        requests: Vec<PresentationRequest>,
    ) -> RemoteResult<()>;

    // ========================================================================
    // Files
    // ========================================================================

    /// Files whose name contains `name_fragment`.
    async fn search_files(&self, name_fragment: &str, page_size: u32) -> RemoteResult<Vec<DriveFile>>;

    /// Untrashed children of a folder, or of My Drive root when `folder_id` is `None`.
    async fn list_files(&self, folder_id: Option<&str>, page_size: u32) -> RemoteResult<Vec<DriveFile>>;

    // ========================================================================
    // Spreadsheets
    // ========================================================================

    async fn get_values(&self, spreadsheet_id: &str, range: &str) -> RemoteResult<ValueRange>;

    async fn update_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        values: ValueRange,
    ) -> RemoteResult<()>;
}
