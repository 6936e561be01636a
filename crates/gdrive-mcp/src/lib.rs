//! MCP server exposing Google Drive, Docs, Slides and Sheets.
//!
//! Each tool validates its parameters, runs one [`Workspace`] operation, and
//! renders the outcome as text. Failures come back as error results, never as
//! protocol errors.
//!
//! ## Module Structure
//!
//! - `models`: Request and response types for MCP tools
//! - `helpers`: Number coercion and result formatting

mod helpers;
mod models;

use std::sync::Arc;

use gdrive_engine::{CancellationToken, DEFAULT_MAX_RESULTS, RemoteResources, Workspace};
use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, ServerCapabilities, ServerInfo},
    service::RequestContext,
    tool, tool_handler, tool_router,
};

pub use helpers::coerce_integer;
pub use models::*;
use helpers::{failure, json_result, success};

/// MCP server over a [`Workspace`].
#[derive(Clone)]
pub struct GdriveMcp {
    workspace: Workspace,
    tool_router: ToolRouter<Self>,
}

impl std::fmt::Debug for GdriveMcp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GdriveMcp")
            .field("workspace", &self.workspace)
            .field("tool_router", &self.tool_router)
            .finish()
    }
}

impl GdriveMcp {
    pub fn new(remote: Arc<dyn RemoteResources>) -> Self {
        Self::with_workspace(Workspace::new(remote))
    }

    pub fn with_workspace(workspace: Workspace) -> Self {
        Self {
            workspace,
            tool_router: Self::tool_router(),
        }
    }

    // ========================================================================
    // Handlers
    // ========================================================================
    //
    // Tool bodies without the transport. Tests call these directly.

    pub async fn run_search_files(&self, req: SearchFilesRequest, cancel: &CancellationToken) -> CallToolResult {
        const PREFIX: &str = "Failed to search files";
        let max = match coerce_integer("maxResults", req.max_results.as_ref(), DEFAULT_MAX_RESULTS) {
            Ok(n) => n,
            Err(e) => return failure(PREFIX, &e),
        };
        match self.workspace.search_files(&req.query, max, cancel).await {
            Ok(files) => json_result(&FileListing::from(files)),
            Err(e) => failure(PREFIX, &e),
        }
    }

    pub async fn run_list_files(&self, req: ListFilesRequest, cancel: &CancellationToken) -> CallToolResult {
        const PREFIX: &str = "Failed to list files";
        let max = match coerce_integer("maxResults", req.max_results.as_ref(), DEFAULT_MAX_RESULTS) {
            Ok(n) => n,
            Err(e) => return failure(PREFIX, &e),
        };
        let folder = req.folder_id.as_deref().unwrap_or_default();
        match self.workspace.list_files(folder, max, cancel).await {
            Ok(files) => json_result(&FileListing::from(files)),
            Err(e) => failure(PREFIX, &e),
        }
    }

    pub async fn run_get_document(&self, req: GetDocumentRequest, cancel: &CancellationToken) -> CallToolResult {
        match self.workspace.document_text(&req.document_id, cancel).await {
            Ok(text) => success(text),
            Err(e) => failure("Failed to get document content", &e),
        }
    }

    pub async fn run_replace_document_content(
        &self,
        req: ReplaceDocumentRequest,
        cancel: &CancellationToken,
    ) -> CallToolResult {
        match self
            .workspace
            .replace_document_content(&req.document_id, &req.content, cancel)
            .await
        {
            Ok(()) => success("Document updated successfully"),
            Err(e) => failure("Failed to update document", &e),
        }
    }

    pub async fn run_get_presentation(&self, req: GetPresentationRequest, cancel: &CancellationToken) -> CallToolResult {
        match self.workspace.presentation_text(&req.presentation_id, cancel).await {
            Ok(text) => success(text),
            Err(e) => failure("Failed to get presentation content", &e),
        }
    }

    pub async fn run_rewrite_slide(&self, req: RewriteSlideRequest, cancel: &CancellationToken) -> CallToolResult {
        const PREFIX: &str = "Failed to update presentation";
        let index = match coerce_integer("slideIndex", req.slide_index.as_ref(), 0) {
            Ok(n) => n,
            Err(e) => return failure(PREFIX, &e),
        };
        match self
            .workspace
            .rewrite_slide(&req.presentation_id, index, &req.title, &req.content, cancel)
            .await
        {
            Ok(()) => success("Presentation slide updated successfully"),
            Err(e) => failure(PREFIX, &e),
        }
    }

    pub async fn run_get_spreadsheet(&self, req: GetSpreadsheetRequest, cancel: &CancellationToken) -> CallToolResult {
        match self
            .workspace
            .spreadsheet_values(&req.spreadsheet_id, &req.range, cancel)
            .await
        {
            Ok(values) => json_result(&SpreadsheetValues {
                values,
                range: req.range,
            }),
            Err(e) => failure("Failed to get spreadsheet values", &e),
        }
    }

    pub async fn run_update_spreadsheet(
        &self,
        req: UpdateSpreadsheetRequest,
        cancel: &CancellationToken,
    ) -> CallToolResult {
        match self
            .workspace
            .update_spreadsheet_values(&req.spreadsheet_id, &req.range, &req.values, cancel)
            .await
        {
            Ok(()) => success("Spreadsheet updated successfully"),
            Err(e) => failure("Failed to update spreadsheet", &e),
        }
    }
}

#[tool_router]
impl GdriveMcp {
    // ========================================================================
    // Drive Tools
    // ========================================================================

    #[tool(description = "Search files in Google Drive by name. Returns JSON with files (id, name, mimeType) and count.")]
    #[tracing::instrument(skip(self, req, context), name = "mcp.search_files")]
    async fn search_files(
        &self,
        Parameters(req): Parameters<SearchFilesRequest>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.run_search_files(req, &context.ct).await)
    }

    #[tool(description = "List files in a Google Drive folder. Lists My Drive root when folderId is empty. Trashed files are excluded.")]
    #[tracing::instrument(skip(self, req, context), name = "mcp.list_files")]
    async fn list_files(
        &self,
        Parameters(req): Parameters<ListFilesRequest>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.run_list_files(req, &context.ct).await)
    }

    // ========================================================================
    // Document Tools
    // ========================================================================

    #[tool(description = "Get the plain-text content of a Google Document.")]
    #[tracing::instrument(skip(self, req, context), name = "mcp.get_document")]
    async fn get_document(
        &self,
        Parameters(req): Parameters<GetDocumentRequest>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.run_get_document(req, &context.ct).await)
    }

    #[tool(description = "Replace the entire content of a Google Document with the given text. Existing text and formatting are removed.")]
    #[tracing::instrument(skip(self, req, context), name = "mcp.replace_document_content")]
    async fn replace_document_content(
        &self,
        Parameters(req): Parameters<ReplaceDocumentRequest>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.run_replace_document_content(req, &context.ct).await)
    }

    // ========================================================================
    // Presentation Tools
    // ========================================================================

    #[tool(description = "Get the text content of a Google Slides presentation, slide by slide.")]
    #[tracing::instrument(skip(self, req, context), name = "mcp.get_presentation")]
    async fn get_presentation(
        &self,
        Parameters(req): Parameters<GetPresentationRequest>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.run_get_presentation(req, &context.ct).await)
    }

    #[tool(description = "Rewrite one slide of a Google Slides presentation: clears every text box on the slide, then writes the title into the first and the content into the second.")]
    #[tracing::instrument(skip(self, req, context), name = "mcp.rewrite_slide")]
    async fn rewrite_slide(
        &self,
        Parameters(req): Parameters<RewriteSlideRequest>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.run_rewrite_slide(req, &context.ct).await)
    }

    // ========================================================================
    // Spreadsheet Tools
    // ========================================================================

    #[tool(description = "Get values from a range of a Google Spreadsheet. Returns JSON with values and range.")]
    #[tracing::instrument(skip(self, req, context), name = "mcp.get_spreadsheet")]
    async fn get_spreadsheet(
        &self,
        Parameters(req): Parameters<GetSpreadsheetRequest>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.run_get_spreadsheet(req, &context.ct).await)
    }

    #[tool(description = "Write a 2D array of values into a range of a Google Spreadsheet. Values are parsed as if typed by a user.")]
    #[tracing::instrument(skip(self, req, context), name = "mcp.update_spreadsheet")]
    async fn update_spreadsheet(
        &self,
        Parameters(req): Parameters<UpdateSpreadsheetRequest>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.run_update_spreadsheet(req, &context.ct).await)
    }
}

#[tool_handler]
impl ServerHandler for GdriveMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo::new(ServerCapabilities::builder().enable_tools().build()).with_instructions(
            "Google Drive MCP server. Search and list Drive files, read and replace Google Docs, read and rewrite Google Slides, read and write Google Sheets ranges.",
        )
    }
}
