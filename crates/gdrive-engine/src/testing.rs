//! In-memory [`RemoteResources`] double.
//!
//! Simulates enough of the remote services to check real outcomes, not just
//! request shapes: document bodies are kept as UTF-16 units and edit batches
//! are applied in order, all-or-nothing, with the same rejections the service
//! makes (empty ranges, deleting the final newline, empty inserts, unknown
//! object IDs). Every call is counted.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use gdrive_types::{
    Document, DocumentRequest, DriveFile, Page, PageElement, Presentation, PresentationRequest,
    StructuralElement, TextContent, TextElement, TextRun, ValueRange,
};
use parking_lot::Mutex;

use crate::error::UpstreamError;
use crate::remote::{RemoteResources, RemoteResult};

/// Per-method call counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub get_document: usize,
    pub submit_document_batch: usize,
    pub get_presentation: usize,
    pub submit_presentation_batch: usize,
    pub search_files: usize,
    pub list_files: usize,
    pub get_values: usize,
    pub update_values: usize,
}

impl CallCounts {
    pub fn total(&self) -> usize {
        self.get_document
            + self.submit_document_batch
            + self.get_presentation
            + self.submit_presentation_batch
            + self.search_files
            + self.list_files
            + self.get_values
            + self.update_values
    }
}

#[derive(Default)]
struct State {
    documents: HashMap<String, Vec<u16>>,
    presentations: HashMap<String, Presentation>,
    files: Vec<DriveFile>,
    sheets: HashMap<(String, String), Vec<Vec<serde_json::Value>>>,
    calls: CallCounts,
    write_failure: Option<String>,
    read_delay: Option<Duration>,
    write_delay: Option<Duration>,
    last_list_folder: Option<String>,
    last_document_batch: Option<Vec<DocumentRequest>>,
    last_presentation_batch: Option<Vec<PresentationRequest>>,
    last_page_size: Option<u32>,
}

/// Recording in-memory remote.
#[derive(Default)]
pub struct MockRemote {
    state: Mutex<State>,
}

impl MockRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a document whose body text is `text`. A trailing newline is
    /// added when missing, since every body ends with one.
    pub fn put_document(&self, document_id: &str, text: &str) {
        let mut body: Vec<u16> = text.encode_utf16().collect();
        if body.last() != Some(&(b'\n' as u16)) {
            body.push(b'\n' as u16);
        }
        self.state.lock().documents.insert(document_id.to_string(), body);
    }

    /// Store a presentation with one page per entry of `slides`.
    pub fn put_presentation(&self, presentation_id: &str, slides: Vec<Vec<PageElement>>) {
        let deck = Presentation {
            presentation_id: presentation_id.to_string(),
            title: presentation_id.to_string(),
            slides: slides
                .into_iter()
                .enumerate()
                .map(|(i, page_elements)| Page {
                    object_id: format!("{presentation_id}-p{i}"),
                    page_elements,
                })
                .collect(),
        };
        self.state.lock().presentations.insert(presentation_id.to_string(), deck);
    }

    pub fn put_file(&self, id: &str, name: &str, mime_type: &str) {
        self.state.lock().files.push(DriveFile {
            id: id.to_string(),
            name: name.to_string(),
            mime_type: mime_type.to_string(),
        });
    }

    /// Make every subsequent write fail with `cause`.
    pub fn fail_writes(&self, cause: &str) {
        self.state.lock().write_failure = Some(cause.to_string());
    }

    /// Delay every read by `delay`.
    pub fn set_read_delay(&self, delay: Duration) {
        self.state.lock().read_delay = Some(delay);
    }

    /// Delay every batch submission by `delay`, before it is applied.
    pub fn set_write_delay(&self, delay: Duration) {
        self.state.lock().write_delay = Some(delay);
    }

    pub fn calls(&self) -> CallCounts {
        self.state.lock().calls
    }

    /// Full body text of a stored document, trailing newline included.
    pub fn document_text(&self, document_id: &str) -> Option<String> {
        self.state
            .lock()
            .documents
            .get(document_id)
            .map(|units| String::from_utf16_lossy(units))
    }

    /// Current text of one shape in a stored presentation.
    pub fn shape_text(&self, presentation_id: &str, object_id: &str) -> Option<String> {
        let state = self.state.lock();
        let deck = state.presentations.get(presentation_id)?;
        let element = deck
            .slides
            .iter()
            .flat_map(|s| s.page_elements.iter())
            .find(|el| el.object_id == object_id)?;
        let text = element.shape.as_ref()?.text.as_ref();
        Some(text.map(|t| t.plain_text()).unwrap_or_default())
    }

    pub fn last_document_batch(&self) -> Option<Vec<DocumentRequest>> {
        self.state.lock().last_document_batch.clone()
    }

    pub fn last_presentation_batch(&self) -> Option<Vec<PresentationRequest>> {
        self.state.lock().last_presentation_batch.clone()
    }

    pub fn last_page_size(&self) -> Option<u32> {
        self.state.lock().last_page_size
    }

    /// Folder named by the last `list_files` call; `root` when none was given.
    pub fn last_list_folder(&self) -> Option<String> {
        self.state.lock().last_list_folder.clone()
    }

    async fn read_pause(&self) {
        let delay = self.state.lock().read_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }

    async fn write_pause(&self) {
        let delay = self.state.lock().write_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }

    fn check_writable(&self, operation: &str) -> RemoteResult<()> {
        match &self.state.lock().write_failure {
            Some(cause) => Err(UpstreamError::new(operation, cause)),
            None => Ok(()),
        }
    }
}

/// Build the document structure for a body: a section break, then one
/// paragraph per line.
fn document_from_units(document_id: &str, units: &[u16]) -> Document {
    let mut content = vec![StructuralElement {
        end_index: 1,
        section_break: Some(serde_json::json!({})),
        ..Default::default()
    }];

    let mut start = 0usize;
    for (i, unit) in units.iter().enumerate() {
        if *unit == b'\n' as u16 {
            let line = String::from_utf16_lossy(&units[start..=i]);
            content.push(StructuralElement::paragraph(start as i64 + 1, line));
            start = i + 1;
        }
    }

    Document::with_content(document_id, content)
}

fn apply_document_request(units: &mut Vec<u16>, idx: usize, req: &DocumentRequest) -> Result<(), String> {
    let len = units.len() as i64;
    match req {
        DocumentRequest::DeleteContentRange { range } => {
            if range.start_index < 1 {
                return Err(format!("requests[{idx}]: index must be at least 1"));
            }
            if range.is_empty() {
                return Err(format!("requests[{idx}]: the range cannot be empty"));
            }
            if range.end_index > len {
                return Err(format!(
                    "requests[{idx}]: cannot delete the final newline of the body"
                ));
            }
            units.drain((range.start_index - 1) as usize..(range.end_index - 1) as usize);
        }
        DocumentRequest::InsertText { location, text } => {
            if text.is_empty() {
                return Err(format!("requests[{idx}]: insert text cannot be empty"));
            }
            if location.index < 1 || location.index > len {
                return Err(format!(
                    "requests[{idx}]: index {} must be less than the end index of the segment ({})",
                    location.index,
                    len + 1
                ));
            }
            let at = (location.index - 1) as usize;
            units.splice(at..at, text.encode_utf16());
        }
    }
    Ok(())
}

fn set_shape_text(element: &mut PageElement, text: &str) {
    if let Some(shape) = element.shape.as_mut() {
        let end_index = text.encode_utf16().count() as i64;
        let text_elements = if text.is_empty() {
            Vec::new()
        } else {
            vec![
                TextElement {
                    end_index,
                    paragraph_marker: Some(serde_json::json!({})),
                    ..Default::default()
                },
                TextElement {
                    end_index,
                    text_run: Some(TextRun { content: text.to_string() }),
                    ..Default::default()
                },
            ]
        };
        shape.text = Some(TextContent { text_elements });
    }
}

fn apply_presentation_request(
    deck: &mut Presentation,
    idx: usize,
    req: &PresentationRequest,
) -> Result<(), String> {
    let object_id = req.object_id();
    let element = deck
        .slides
        .iter_mut()
        .flat_map(|s| s.page_elements.iter_mut())
        .find(|el| el.object_id == object_id)
        .ok_or_else(|| format!("requests[{idx}]: object ({object_id}) could not be found"))?;

    match req {
        PresentationRequest::DeleteText(_) => {
            if element.text_body().is_none() {
                return Err(format!("requests[{idx}]: object ({object_id}) has no text to delete"));
            }
            set_shape_text(element, "");
        }
        PresentationRequest::InsertText(insert) => {
            if element.shape.is_none() {
                return Err(format!("requests[{idx}]: object ({object_id}) does not allow text"));
            }
            let current: Vec<u16> = element
                .text_body()
                .map(|t| t.plain_text())
                .unwrap_or_default()
                .encode_utf16()
                .collect();
            let at = insert.insertion_index;
            if at < 0 || at > current.len() as i64 {
                return Err(format!("requests[{idx}]: insertion index {at} out of bounds"));
            }
            let mut updated = current;
            let at = at as usize;
            updated.splice(at..at, insert.text.encode_utf16());
            set_shape_text(element, &String::from_utf16_lossy(&updated));
        }
    }
    Ok(())
}

#[async_trait]
impl RemoteResources for MockRemote {
    async fn get_document(&self, document_id: &str) -> RemoteResult<Document> {
        self.state.lock().calls.get_document += 1;
        self.read_pause().await;
        let state = self.state.lock();
        state
            .documents
            .get(document_id)
            .map(|units| document_from_units(document_id, units))
            .ok_or_else(|| {
                UpstreamError::new(
                    "docs.documents.get",
                    format!("404 Not Found: document {document_id} not found"),
                )
            })
    }

    async fn submit_document_batch(
        &self,
        document_id: &str,
        requests: Vec<DocumentRequest>,
    ) -> RemoteResult<()> {
        const OP: &str = "docs.documents.batchUpdate";
        self.state.lock().calls.submit_document_batch += 1;
        self.write_pause().await;
        self.check_writable(OP)?;

        let mut state = self.state.lock();
        state.last_document_batch = Some(requests.clone());
        let current = state
            .documents
            .get(document_id)
            .ok_or_else(|| UpstreamError::new(OP, format!("404 Not Found: document {document_id} not found")))?;

        let mut staged = current.clone();
        for (idx, req) in requests.iter().enumerate() {
            apply_document_request(&mut staged, idx, req)
                .map_err(|e| UpstreamError::new(OP, format!("400 Bad Request: {e}")))?;
        }
        state.documents.insert(document_id.to_string(), staged);
        Ok(())
    }

    async fn get_presentation(&self, presentation_id: &str) -> RemoteResult<Presentation> {
        self.state.lock().calls.get_presentation += 1;
        self.read_pause().await;
        self.state
            .lock()
            .presentations
            .get(presentation_id)
            .cloned()
            .ok_or_else(|| {
                UpstreamError::new(
                    "slides.presentations.get",
                    format!("404 Not Found: presentation {presentation_id} not found"),
                )
            })
    }

    async fn submit_presentation_batch(
        &self,
        presentation_id: &str,
        requests: Vec<PresentationRequest>,
    ) -> RemoteResult<()> {
        const OP: &str = "slides.presentations.batchUpdate";
        self.state.lock().calls.submit_presentation_batch += 1;
        self.write_pause().await;
        self.check_writable(OP)?;

        let mut state = self.state.lock();
        state.last_presentation_batch = Some(requests.clone());
        let mut staged = state
            .presentations
            .get(presentation_id)
            .cloned()
            .ok_or_else(|| UpstreamError::new(OP, format!("404 Not Found: presentation {presentation_id} not found")))?;

        for (idx, req) in requests.iter().enumerate() {
            apply_presentation_request(&mut staged, idx, req)
                .map_err(|e| UpstreamError::new(OP, format!("400 Bad Request: {e}")))?;
        }
        state.presentations.insert(presentation_id.to_string(), staged);
        Ok(())
    }

    async fn search_files(&self, name_fragment: &str, page_size: u32) -> RemoteResult<Vec<DriveFile>> {
        let mut state = self.state.lock();
        state.calls.search_files += 1;
        state.last_page_size = Some(page_size);
        Ok(state
            .files
            .iter()
            .filter(|f| f.name.contains(name_fragment))
            .take(page_size as usize)
            .cloned()
            .collect())
    }

    async fn list_files(&self, folder_id: Option<&str>, page_size: u32) -> RemoteResult<Vec<DriveFile>> {
        let mut state = self.state.lock();
        state.calls.list_files += 1;
        state.last_page_size = Some(page_size);
        state.last_list_folder = Some(folder_id.unwrap_or("root").to_string());
        Ok(state.files.iter().take(page_size as usize).cloned().collect())
    }

    async fn get_values(&self, spreadsheet_id: &str, range: &str) -> RemoteResult<ValueRange> {
        let mut state = self.state.lock();
        state.calls.get_values += 1;
        let values = state
            .sheets
            .get(&(spreadsheet_id.to_string(), range.to_string()))
            .cloned()
            .unwrap_or_default();
        Ok(ValueRange {
            range: Some(range.to_string()),
            major_dimension: Some("ROWS".to_string()),
            values,
        })
    }

    async fn update_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        values: ValueRange,
    ) -> RemoteResult<()> {
        self.state.lock().calls.update_values += 1;
        self.check_writable("sheets.spreadsheets.values.update")?;
        self.state
            .lock()
            .sheets
            .insert((spreadsheet_id.to_string(), range.to_string()), values.values);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rejects_deleting_final_newline() {
        let remote = MockRemote::new();
        remote.put_document("doc", "abc\n");

        let err = remote
            .submit_document_batch("doc", vec![DocumentRequest::delete_range(1, 5)])
            .await
            .unwrap_err();
        assert!(err.cause.contains("final newline"));
        assert_eq!(remote.document_text("doc").as_deref(), Some("abc\n"));
    }

    #[tokio::test]
    async fn test_batch_is_all_or_nothing() {
        let remote = MockRemote::new();
        remote.put_document("doc", "abc\n");

        let err = remote
            .submit_document_batch(
                "doc",
                vec![
                    DocumentRequest::delete_range(1, 4),
                    DocumentRequest::insert_text(9, "x"),
                ],
            )
            .await
            .unwrap_err();
        assert!(err.cause.contains("requests[1]"));
        assert_eq!(remote.document_text("doc").as_deref(), Some("abc\n"));
    }

    #[tokio::test]
    async fn test_document_structure_indices() {
        let remote = MockRemote::new();
        remote.put_document("doc", "ab\ncd\n");
        let doc = remote.get_document("doc").await.unwrap();

        assert_eq!(doc.elements().len(), 3);
        assert_eq!(doc.elements()[1].start_index, 1);
        assert_eq!(doc.elements()[1].end_index, 4);
        assert_eq!(doc.elements()[2].end_index, 7);
    }

    #[tokio::test]
    async fn test_clear_then_insert_on_shape() {
        let remote = MockRemote::new();
        remote.put_presentation("deck", vec![vec![PageElement::text_box("a", "old")]]);

        remote
            .submit_presentation_batch(
                "deck",
                vec![
                    PresentationRequest::delete_all_text("a"),
                    PresentationRequest::insert_text("a", 0, "new"),
                ],
            )
            .await
            .unwrap();
        assert_eq!(remote.shape_text("deck", "a").as_deref(), Some("new"));

        // Clearing an already-empty shape is rejected
        let err = remote
            .submit_presentation_batch("deck", vec![
                PresentationRequest::delete_all_text("a"),
                PresentationRequest::delete_all_text("a"),
            ])
            .await
            .unwrap_err();
        assert!(err.cause.contains("no text"));
        assert_eq!(remote.shape_text("deck", "a").as_deref(), Some("new"));
    }
}
