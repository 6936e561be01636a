//! Slide rewrite planning.
//!
//! Rewriting a slide clears every text-bearing element and then inserts the
//! new title and body into inferred regions. Regions are positional: the
//! first text-bearing element is the title, the second is the body.
//!
//! Known limitation: layouts that put body text before the title, or that
//! carry meaningful text in a third region, are rewritten by position anyway.
//! Placeholder type is not consulted.

use gdrive_types::{Page, PageElement, Presentation, PresentationRequest};

use crate::error::{EngineError, Result};

/// Inferred title and body regions of one slide.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SlideRegions<'a> {
    pub title: Option<&'a PageElement>,
    pub content: Option<&'a PageElement>,
}

impl<'a> SlideRegions<'a> {
    /// Walk page elements in order; first text-bearing one is the title,
    /// second is the body, the rest are ignored.
    pub fn infer(slide: &'a Page) -> Self {
        let mut text_bearing = slide
            .page_elements
            .iter()
            .filter(|el| el.text_body().is_some());
        Self {
            title: text_bearing.next(),
            content: text_bearing.next(),
        }
    }
}

/// Resolve a 0-based slide index against the deck.
pub fn slide_at(deck: &Presentation, slide_index: i64) -> Result<&Page> {
    usize::try_from(slide_index)
        .ok()
        .and_then(|idx| deck.slide(idx))
        .ok_or(EngineError::OutOfRange {
            index: slide_index,
            count: deck.slide_count(),
        })
}

/// Plan the edit batch that rewrites one slide's text.
///
/// Order: every clear (in element order), then the title insert, then the
/// body insert. An empty `new_title` or `new_content` skips that insert. An
/// empty result means there is nothing to submit.
pub fn plan_slide_rewrite(
    deck: &Presentation,
    slide_index: i64,
    new_title: &str,
    new_content: &str,
) -> Result<Vec<PresentationRequest>> {
    let slide = slide_at(deck, slide_index)?;

    let mut requests: Vec<PresentationRequest> = slide
        .page_elements
        .iter()
        .filter(|el| el.text_body().is_some())
        .map(|el| PresentationRequest::delete_all_text(&el.object_id))
        .collect();

    let regions = SlideRegions::infer(slide);
    if let Some(title) = regions.title.filter(|_| !new_title.is_empty()) {
        requests.push(PresentationRequest::insert_text(&title.object_id, 0, new_title));
    }
    if let Some(content) = regions.content.filter(|_| !new_content.is_empty()) {
        requests.push(PresentationRequest::insert_text(&content.object_id, 0, new_content));
    }

    Ok(requests)
}

/// Human-readable dump of a deck: title, then each slide's text regions.
pub fn render_presentation_text(deck: &Presentation) -> String {
    let mut content = format!("Title: {}\n\n", deck.title);

    for (i, slide) in deck.slides.iter().enumerate() {
        content.push_str(&format!("--- Slide {} ---\n", i + 1));
        for body in slide.page_elements.iter().filter_map(|el| el.text_body()) {
            content.push_str(&body.plain_text());
            content.push('\n');
        }
        content.push('\n');
    }

    content
}
