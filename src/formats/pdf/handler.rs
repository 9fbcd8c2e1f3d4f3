//! MuPDF-backed document handle
//!
//! One handle type serves both backends; `PdfCapabilities` decides whether
//! the text layer and embedded images are exposed.

use tracing::debug;

use crate::document::{
    DocumentBackend, DocumentError, DocumentHandle, DocumentSource, EmbeddedImage, RenderedImage,
    Result, TextSpan,
};
use crate::geometry::{PageSize, Rect};
use crate::mupdf::{pixmap, stext, SafeDocument};

/// Raster density used when pulling an embedded image out of the page
const EMBEDDED_IMAGE_MULTIPLIER: f32 = 2.0;

#[derive(Debug, Clone, Copy)]
struct PdfCapabilities {
    text_layer: bool,
    embedded_images: bool,
}

/// Open PDF document
pub struct PdfHandle {
    doc: SafeDocument,
    caps: PdfCapabilities,
    backend: &'static str,
}

impl PdfHandle {
    fn open(source: &DocumentSource, caps: PdfCapabilities, backend: &'static str) -> Result<Self> {
        let id = uuid::Uuid::new_v4().to_string();
        let doc = SafeDocument::open(source.clone(), id)?;
        debug!(
            id = doc.id(),
            source = %source.label(),
            pages = doc.page_count(),
            backend,
            "Opened document"
        );
        Ok(Self { doc, caps, backend })
    }
}

impl DocumentHandle for PdfHandle {
    fn id(&self) -> &str {
        self.doc.id()
    }

    fn page_count(&self) -> usize {
        self.doc.page_count()
    }

    fn page_size(&self, page: usize) -> Result<PageSize> {
        self.doc.with_page(page, |p| {
            let bounds = Rect::from(p.bounds()?);
            Ok(PageSize::new(bounds.width(), bounds.height()))
        })
    }

    fn text_spans(&self, page: usize, clip: &Rect) -> Result<Vec<TextSpan>> {
        if !self.caps.text_layer {
            return Ok(Vec::new());
        }
        self.doc.with_page(page, |p| stext::extract_spans(p, clip))
    }

    fn render_region(&self, page: usize, clip: &Rect, multiplier: f32) -> Result<RenderedImage> {
        self.doc
            .with_page(page, |p| pixmap::render_clip(p, clip, multiplier))
    }

    fn embedded_images(&self, page: usize) -> Result<Vec<EmbeddedImage>> {
        if !self.caps.embedded_images {
            return Ok(Vec::new());
        }
        self.doc.with_page(page, stext::image_blocks)
    }

    fn extract_embedded_image(
        &self,
        page: usize,
        image_id: &str,
        clip: &Rect,
    ) -> Result<RenderedImage> {
        if !self.caps.embedded_images {
            return Err(DocumentError::NotSupported {
                backend: self.backend,
                operation: "extract_embedded_image",
            });
        }
        self.doc.with_page(page, |p| {
            let image = stext::image_blocks(p)?
                .into_iter()
                .find(|img| img.id == image_id)
                .ok_or_else(|| DocumentError::ImageNotFound(image_id.to_string()))?;
            let region = image.bbox.intersection(clip).ok_or_else(|| {
                DocumentError::RenderError(format!("image {} lies outside {}", image_id, clip))
            })?;
            pixmap::render_clip(p, &region, EMBEDDED_IMAGE_MULTIPLIER)
        })
    }
}

/// Full MuPDF backend: text layer, rendering and embedded images
#[derive(Debug, Clone, Copy, Default)]
pub struct MupdfBackend;

impl DocumentBackend for MupdfBackend {
    fn name(&self) -> &'static str {
        "mupdf"
    }

    fn open(&self, source: &DocumentSource) -> Result<Box<dyn DocumentHandle>> {
        let caps = PdfCapabilities {
            text_layer: true,
            embedded_images: true,
        };
        Ok(Box::new(PdfHandle::open(source, caps, self.name())?))
    }
}

/// Render-only backend
///
/// Treats every page as an image: no text layer and no embedded images, so
/// every selection goes through OCR.
#[derive(Debug, Clone, Copy, Default)]
pub struct RasterBackend;

impl DocumentBackend for RasterBackend {
    fn name(&self) -> &'static str {
        "raster"
    }

    fn open(&self, source: &DocumentSource) -> Result<Box<dyn DocumentHandle>> {
        let caps = PdfCapabilities {
            text_layer: false,
            embedded_images: false,
        };
        Ok(Box::new(PdfHandle::open(source, caps, self.name())?))
    }
}
