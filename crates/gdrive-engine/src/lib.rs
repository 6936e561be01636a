//! Structured-document mutation engine.
//!
//! Reconciles a fresh snapshot of a remote document or slide with the content
//! a caller wants, by planning an ordered batch of positional edits and
//! submitting it in one call.
//!
//! ## Module Structure
//!
//! - `document`: whole-body replacement planning and text extraction
//! - `slides`: slide region inference, rewrite planning, deck rendering
//! - `sheets`: spreadsheet value shaping
//! - `remote`: the [`RemoteResources`] accessor trait
//! - `workspace`: the [`Workspace`] operation context
//! - `error`: [`EngineError`] taxonomy
//!
//! Planning functions are pure; only [`Workspace`] performs remote calls.

pub mod document;
pub mod error;
pub mod remote;
pub mod sheets;
pub mod slides;
pub mod workspace;

#[cfg(any(test, feature = "test-mock"))]
pub mod testing;

pub use document::{document_end_index, extract_document_text, plan_document_replacement};
pub use error::{EngineError, Result, UpstreamError};
pub use remote::{RemoteResources, RemoteResult};
pub use slides::{SlideRegions, plan_slide_rewrite, render_presentation_text};
pub use workspace::{DEFAULT_MAX_RESULTS, Workspace, clamp_page_size};

pub use tokio_util::sync::CancellationToken;
