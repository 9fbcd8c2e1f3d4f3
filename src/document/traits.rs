//! Document traits
//!
//! Backend-agnostic interfaces used by the extraction stage. A backend opens
//! a handle per analysis; the handle is dropped when the analysis finishes.

use super::error::Result;
use super::types::{DocumentSource, EmbeddedImage, RenderedImage, TextSpan};
use crate::geometry::{PageSize, Rect};

/// Factory for document handles
pub trait DocumentBackend: Send + Sync {
    /// Backend name as used in configuration
    fn name(&self) -> &'static str;

    /// Open a document for the duration of one analysis
    fn open(&self, source: &DocumentSource) -> Result<Box<dyn DocumentHandle>>;
}

/// An open document
///
/// Page indices are 0-based. All rectangles are in document units with a
/// top-left origin.
pub trait DocumentHandle: Send {
    /// Document identifier
    fn id(&self) -> &str;

    /// Number of pages
    fn page_count(&self) -> usize;

    /// Page dimensions
    fn page_size(&self, page: usize) -> Result<PageSize>;

    /// Text-layer spans intersecting `clip`
    fn text_spans(&self, page: usize, clip: &Rect) -> Result<Vec<TextSpan>>;

    /// Rasterize `clip` at `multiplier` pixels per document unit
    fn render_region(&self, page: usize, clip: &Rect, multiplier: f32) -> Result<RenderedImage>;

    /// Images placed on the page, in content order
    fn embedded_images(&self, page: usize) -> Result<Vec<EmbeddedImage>>;

    /// Part of one `embedded_images` entry that falls inside `clip`
    fn extract_embedded_image(
        &self,
        page: usize,
        image_id: &str,
        clip: &Rect,
    ) -> Result<RenderedImage>;
}
