//! Wire types for the four remote resource kinds.
//!
//! These mirror the JSON shapes of the Drive v3, Docs v1, Slides v1 and
//! Sheets v4 REST APIs closely enough to round-trip what the engine reads and
//! writes. Fields the engine never looks at are left out; serde ignores them
//! on the way in.
//!
//! # Resource Model
//!
//! ```text
//! Document
//!     └── body.content: [StructuralElement]   ← global index space, starts at 1
//!             └── paragraph.elements: [ParagraphElement]
//!                     └── textRun.content
//!
//! Presentation
//!     └── slides: [Page]                        ← addressed by 0-based position
//!             └── pageElements: [PageElement]
//!                     └── shape.text.textElements: [TextElement]
//! ```
//!
//! # Key Types
//!
//! |-------------------------|-------------------------------------------|
//! | Type                    | Purpose                                   |
//! |-------------------------|-------------------------------------------|
//! | [`Document`]            | Rich-text document snapshot               |
//! | [`DocumentRequest`]     | One positional edit in a document batch   |
//! | [`Presentation`]        | Slide deck snapshot                       |
//! | [`PresentationRequest`] | One edit in a presentation batch          |
//! | [`ValueRange`]          | Rectangular spreadsheet values            |
//! | [`DriveFile`]           | File listing entry                        |
//! |-------------------------|-------------------------------------------|

pub mod docs;
pub mod drive;
pub mod sheets;
pub mod slides;

pub use docs::{
    BatchUpdateDocumentRequest, Body, Document, DocumentRequest, Location, Paragraph,
    ParagraphElement, Range, StructuralElement, TextRun,
};
pub use drive::{DriveFile, FileList};
pub use sheets::ValueRange;
pub use slides::{
    BatchUpdatePresentationRequest, DeleteTextRequest, InsertTextRequest, Page, PageElement,
    Presentation, PresentationRequest, RangeType, Shape, TextContent, TextElement, TextRange,
};
