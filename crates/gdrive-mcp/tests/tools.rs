//! Tool-surface tests against the in-memory remote.

use std::sync::Arc;
use std::time::Duration;

use gdrive_engine::CancellationToken;
use gdrive_engine::testing::MockRemote;
use gdrive_mcp::*;
use gdrive_types::PageElement;
use rmcp::model::CallToolResult;
use serde_json::{Value, json};

fn setup() -> (Arc<MockRemote>, GdriveMcp) {
    let remote = Arc::new(MockRemote::new());
    let mcp = GdriveMcp::new(remote.clone());
    (remote, mcp)
}

fn text(result: &CallToolResult) -> String {
    result
        .content
        .iter()
        .filter_map(|c| c.as_text())
        .map(|t| t.text.clone())
        .collect()
}

fn failed(result: &CallToolResult) -> bool {
    result.is_error == Some(true)
}

fn replace(id: &str, content: &str) -> ReplaceDocumentRequest {
    ReplaceDocumentRequest {
        document_id: id.into(),
        content: content.into(),
    }
}

fn rewrite(id: &str, index: Value, title: &str, content: &str) -> RewriteSlideRequest {
    RewriteSlideRequest {
        presentation_id: id.into(),
        slide_index: Some(index),
        title: title.into(),
        content: content.into(),
    }
}

// ============================================================================
// Documents
// ============================================================================

#[tokio::test]
async fn replace_document_round_trips_multiline_unicode() {
    let (remote, mcp) = setup();
    remote.put_document("doc", "Intro\nSecond paragraph\nThird\n");
    let cancel = CancellationToken::new();

    let content = "Grüße 👋\nline two";
    let result = mcp.run_replace_document_content(replace("doc", content), &cancel).await;
    assert!(!failed(&result), "{}", text(&result));

    let read = mcp
        .run_get_document(GetDocumentRequest { document_id: "doc".into() }, &cancel)
        .await;
    assert_eq!(text(&read).trim_end_matches('\n'), content);
    assert_eq!(remote.calls().submit_document_batch, 1);
}

#[tokio::test]
async fn replace_empty_document_with_empty_content_makes_no_write() {
    let (remote, mcp) = setup();
    remote.put_document("doc", "");

    let result = mcp
        .run_replace_document_content(replace("doc", ""), &CancellationToken::new())
        .await;
    assert_eq!(text(&result), "Document updated successfully");
    assert_eq!(remote.calls().submit_document_batch, 0);
    assert_eq!(remote.document_text("doc").as_deref(), Some("\n"));
}

#[tokio::test]
async fn rejected_batch_reports_upstream_cause_and_leaves_document() {
    let (remote, mcp) = setup();
    remote.put_document("doc", "Keep me\n");
    remote.fail_writes("quota exceeded");

    let result = mcp
        .run_replace_document_content(replace("doc", "Replaced"), &CancellationToken::new())
        .await;
    assert!(failed(&result));
    let message = text(&result);
    assert!(message.starts_with("Failed to update document: [upstream_failure] docs.documents.batchUpdate"));
    assert!(message.contains("quota exceeded"));
    assert_eq!(remote.document_text("doc").as_deref(), Some("Keep me\n"));
}

#[tokio::test]
async fn missing_document_is_upstream_failure() {
    let (_remote, mcp) = setup();
    let result = mcp
        .run_get_document(GetDocumentRequest { document_id: "nope".into() }, &CancellationToken::new())
        .await;
    assert!(failed(&result));
    assert!(text(&result).starts_with("Failed to get document content: [upstream_failure] docs.documents.get"));
}

#[tokio::test]
async fn cancellation_during_read_never_writes() {
    let (remote, mcp) = setup();
    remote.put_document("doc", "Original\n");
    remote.set_read_delay(Duration::from_secs(30));
    let cancel = CancellationToken::new();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        trigger.cancel();
    });

    let result = mcp.run_replace_document_content(replace("doc", "New"), &cancel).await;
    assert_eq!(text(&result), "Failed to update document: [cancelled] operation cancelled");
    assert_eq!(remote.calls().submit_document_batch, 0);
    assert_eq!(remote.document_text("doc").as_deref(), Some("Original\n"));
}

#[tokio::test]
async fn cancellation_during_document_write_reports_cancelled() {
    let (remote, mcp) = setup();
    remote.put_document("doc", "Original\n");
    remote.set_write_delay(Duration::from_secs(30));
    let cancel = CancellationToken::new();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        trigger.cancel();
    });

    let result = mcp.run_replace_document_content(replace("doc", "New"), &cancel).await;
    assert!(failed(&result));
    assert_eq!(text(&result), "Failed to update document: [cancelled] operation cancelled");
    assert_eq!(remote.calls().submit_document_batch, 1);
    assert_eq!(remote.document_text("doc").as_deref(), Some("Original\n"));
}

// ============================================================================
// Presentations
// ============================================================================

fn two_slide_deck(remote: &MockRemote) {
    remote.put_presentation(
        "deck",
        vec![
            vec![
                PageElement::text_box("t0", "Welcome"),
                PageElement::text_box("b0", "Agenda"),
            ],
            vec![
                PageElement::text_box("t1", "Old Title"),
                PageElement::blank_shape("img"),
                PageElement::text_box("b1", "Old body"),
                PageElement::text_box("n1", "Footnote"),
            ],
        ],
    );
}

#[tokio::test]
async fn rewrite_slide_clears_all_regions_and_fills_first_two() {
    let (remote, mcp) = setup();
    two_slide_deck(&remote);

    let result = mcp
        .run_rewrite_slide(rewrite("deck", json!(1), "New Title", "New body"), &CancellationToken::new())
        .await;
    assert_eq!(text(&result), "Presentation slide updated successfully");

    assert_eq!(remote.shape_text("deck", "t1").as_deref(), Some("New Title"));
    assert_eq!(remote.shape_text("deck", "b1").as_deref(), Some("New body"));
    assert_eq!(remote.shape_text("deck", "n1").as_deref(), Some(""));
    assert_eq!(remote.shape_text("deck", "t0").as_deref(), Some("Welcome"));
    assert_eq!(remote.calls().submit_presentation_batch, 1);
}

#[tokio::test]
async fn rewrite_slide_defaults_to_first_slide() {
    let (remote, mcp) = setup();
    two_slide_deck(&remote);

    let req = RewriteSlideRequest {
        presentation_id: "deck".into(),
        slide_index: None,
        title: "Hello".into(),
        content: "World".into(),
    };
    let result = mcp.run_rewrite_slide(req, &CancellationToken::new()).await;
    assert!(!failed(&result));
    assert_eq!(remote.shape_text("deck", "t0").as_deref(), Some("Hello"));
    assert_eq!(remote.shape_text("deck", "b0").as_deref(), Some("World"));
}

#[tokio::test]
async fn rewrite_slide_out_of_range_makes_no_write() {
    let (remote, mcp) = setup();
    two_slide_deck(&remote);

    for index in [json!(2), json!(-1)] {
        let result = mcp
            .run_rewrite_slide(rewrite("deck", index, "T", "C"), &CancellationToken::new())
            .await;
        assert!(failed(&result));
        assert!(text(&result).contains("[out_of_range]"));
    }
    assert_eq!(remote.calls().submit_presentation_batch, 0);
}

#[tokio::test]
async fn rewrite_slide_empty_id_is_invalid_argument() {
    let (remote, mcp) = setup();
    let result = mcp
        .run_rewrite_slide(rewrite("", json!(0), "T", "C"), &CancellationToken::new())
        .await;
    assert!(failed(&result));
    assert_eq!(
        text(&result),
        "Failed to update presentation: [invalid_argument] presentation ID is empty"
    );
    assert_eq!(remote.calls().total(), 0);
}

#[tokio::test]
async fn rewrite_slide_missing_deck_is_upstream_failure() {
    let (remote, mcp) = setup();
    let result = mcp
        .run_rewrite_slide(rewrite("gone", json!(0), "T", "C"), &CancellationToken::new())
        .await;
    assert!(failed(&result));
    assert!(text(&result).starts_with("Failed to update presentation: [upstream_failure] slides.presentations.get"));
    assert_eq!(remote.calls().submit_presentation_batch, 0);
}

#[tokio::test]
async fn rewrite_slide_rejected_batch_keeps_old_text() {
    let (remote, mcp) = setup();
    two_slide_deck(&remote);
    remote.fail_writes("quota exceeded");

    let result = mcp
        .run_rewrite_slide(rewrite("deck", json!(1), "New", "Body"), &CancellationToken::new())
        .await;
    assert!(failed(&result));
    assert_eq!(
        text(&result),
        "Failed to update presentation: [upstream_failure] slides.presentations.batchUpdate: quota exceeded"
    );
    assert_eq!(remote.shape_text("deck", "t1").as_deref(), Some("Old Title"));
    assert_eq!(remote.shape_text("deck", "b1").as_deref(), Some("Old body"));
}

#[tokio::test]
async fn cancellation_during_slide_write_reports_cancelled() {
    let (remote, mcp) = setup();
    two_slide_deck(&remote);
    remote.set_write_delay(Duration::from_secs(30));
    let cancel = CancellationToken::new();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        trigger.cancel();
    });

    let result = mcp
        .run_rewrite_slide(rewrite("deck", json!(0), "New", "Body"), &cancel)
        .await;
    assert_eq!(text(&result), "Failed to update presentation: [cancelled] operation cancelled");
    assert_eq!(remote.shape_text("deck", "t0").as_deref(), Some("Welcome"));
}

#[tokio::test]
async fn get_presentation_renders_slides() {
    let (remote, mcp) = setup();
    two_slide_deck(&remote);

    let result = mcp
        .run_get_presentation(GetPresentationRequest { presentation_id: "deck".into() }, &CancellationToken::new())
        .await;
    let rendered = text(&result);
    assert!(rendered.starts_with("Title: deck\n\n--- Slide 1 ---\nWelcome\nAgenda\n\n"));
    assert!(rendered.contains("--- Slide 2 ---\nOld Title\nOld body\nFootnote\n\n"));
}

// ============================================================================
// Drive
// ============================================================================

#[tokio::test]
async fn list_files_clamps_max_results() {
    let (remote, mcp) = setup();
    remote.put_file("1", "a", "text/plain");

    let req = ListFilesRequest {
        folder_id: None,
        max_results: Some(json!("5000")),
    };
    let result = mcp.run_list_files(req, &CancellationToken::new()).await;
    let value: Value = serde_json::from_str(&text(&result)).unwrap();
    assert_eq!(value["count"], 1);
    assert_eq!(remote.last_page_size(), Some(1000));

    let req = ListFilesRequest {
        folder_id: Some(String::new()),
        max_results: Some(json!(0)),
    };
    mcp.run_list_files(req, &CancellationToken::new()).await;
    assert_eq!(remote.last_page_size(), Some(1));
}

#[tokio::test]
async fn search_files_rejects_empty_query() {
    let (remote, mcp) = setup();
    let req = SearchFilesRequest {
        query: "   ".into(),
        max_results: None,
    };
    let result = mcp.run_search_files(req, &CancellationToken::new()).await;
    assert_eq!(text(&result), "Failed to search files: [invalid_argument] search query is empty");
    assert_eq!(remote.calls().total(), 0);
}

// ============================================================================
// Spreadsheets
// ============================================================================

#[tokio::test]
async fn spreadsheet_write_then_read() {
    let (remote, mcp) = setup();
    let cancel = CancellationToken::new();

    let write = UpdateSpreadsheetRequest {
        spreadsheet_id: "s1".into(),
        range: "Sheet1!A1:B2".into(),
        values: json!([["name", "qty"], ["apples", 3]]),
    };
    let result = mcp.run_update_spreadsheet(write, &cancel).await;
    assert_eq!(text(&result), "Spreadsheet updated successfully");

    let read = GetSpreadsheetRequest {
        spreadsheet_id: "s1".into(),
        range: "Sheet1!A1:B2".into(),
    };
    let result = mcp.run_get_spreadsheet(read, &cancel).await;
    let value: Value = serde_json::from_str(&text(&result)).unwrap();
    assert_eq!(value["range"], "Sheet1!A1:B2");
    assert_eq!(value["values"], json!([["name", "qty"], ["apples", 3]]));
    assert_eq!(remote.calls().update_values, 1);
}

#[tokio::test]
async fn spreadsheet_rejects_empty_range() {
    let (remote, mcp) = setup();
    let read = GetSpreadsheetRequest {
        spreadsheet_id: "s1".into(),
        range: "".into(),
    };
    let result = mcp.run_get_spreadsheet(read, &CancellationToken::new()).await;
    assert_eq!(text(&result), "Failed to get spreadsheet values: [invalid_argument] range is empty");
    assert_eq!(remote.calls().total(), 0);
}
