//! In-memory document used by unit tests

use std::io::Cursor;
use std::sync::Arc;

use parking_lot::Mutex;

use super::error::{DocumentError, Result};
use super::traits::{DocumentBackend, DocumentHandle};
use super::types::{DocumentSource, EmbeddedImage, RenderedImage, TextSpan};
use crate::geometry::{PageSize, Rect};

/// PNG of deterministic noise; noise keeps the encoded size proportional to the area
pub fn noise_png(width: u32, height: u32) -> RenderedImage {
    let mut state: u32 = 0x9E37_79B9;
    let img = image::RgbImage::from_fn(width, height, |_, _| {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        let [r, g, b, _] = state.to_le_bytes();
        image::Rgb([r, g, b])
    });

    let mut png = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .expect("encode fixture png");

    RenderedImage { png, width, height }
}

pub fn span(text: &str, x0: f32, y0: f32, x1: f32, y1: f32) -> TextSpan {
    TextSpan {
        text: text.to_string(),
        bbox: Rect::new(x0, y0, x1, y1),
        font: Some("Fixture".to_string()),
        size: y1 - y0,
    }
}

#[derive(Clone)]
pub struct FixtureDocument {
    pub page_size: PageSize,
    pub page_count: usize,
    pub spans: Vec<TextSpan>,
    /// `None` makes rendering fail
    pub render: Option<RenderedImage>,
    pub images: Vec<(EmbeddedImage, RenderedImage)>,
    pub fail_text_layer: bool,
    /// Every `extract_embedded_image` call as (image id, clip)
    pub image_requests: Arc<Mutex<Vec<(String, Rect)>>>,
}

impl FixtureDocument {
    pub fn a4() -> Self {
        Self {
            page_size: PageSize::new(595.0, 842.0),
            page_count: 1,
            spans: Vec::new(),
            render: Some(noise_png(120, 40)),
            images: Vec::new(),
            fail_text_layer: false,
            image_requests: Arc::default(),
        }
    }

    pub fn with_spans(mut self, spans: Vec<TextSpan>) -> Self {
        self.spans = spans;
        self
    }

    pub fn with_render(mut self, render: Option<RenderedImage>) -> Self {
        self.render = render;
        self
    }

    pub fn with_image(mut self, id: &str, bbox: Rect, data: RenderedImage) -> Self {
        self.images.push((
            EmbeddedImage {
                id: id.to_string(),
                bbox,
            },
            data,
        ));
        self
    }

    fn check_page(&self, page: usize) -> Result<()> {
        if page < self.page_count {
            Ok(())
        } else {
            Err(DocumentError::PageNotFound(page))
        }
    }
}

impl DocumentHandle for FixtureDocument {
    fn id(&self) -> &str {
        "fixture"
    }

    fn page_count(&self) -> usize {
        self.page_count
    }

    fn page_size(&self, page: usize) -> Result<PageSize> {
        self.check_page(page)?;
        Ok(self.page_size)
    }

    fn text_spans(&self, page: usize, clip: &Rect) -> Result<Vec<TextSpan>> {
        self.check_page(page)?;
        if self.fail_text_layer {
            return Err(DocumentError::TextExtractionError("fixture failure".into()));
        }
        Ok(self
            .spans
            .iter()
            .filter(|s| s.bbox.intersects(clip))
            .cloned()
            .collect())
    }

    fn render_region(&self, page: usize, _clip: &Rect, _multiplier: f32) -> Result<RenderedImage> {
        self.check_page(page)?;
        self.render
            .clone()
            .ok_or_else(|| DocumentError::RenderError("fixture render failure".into()))
    }

    fn embedded_images(&self, page: usize) -> Result<Vec<EmbeddedImage>> {
        self.check_page(page)?;
        Ok(self.images.iter().map(|(info, _)| info.clone()).collect())
    }

    fn extract_embedded_image(
        &self,
        page: usize,
        image_id: &str,
        clip: &Rect,
    ) -> Result<RenderedImage> {
        self.check_page(page)?;
        self.image_requests
            .lock()
            .push((image_id.to_string(), *clip));
        let (info, data) = self
            .images
            .iter()
            .find(|(info, _)| info.id == image_id)
            .ok_or_else(|| DocumentError::ImageNotFound(image_id.to_string()))?;
        if !info.bbox.intersects(clip) {
            return Err(DocumentError::RenderError("clip outside image".into()));
        }
        Ok(data.clone())
    }
}

/// Backend that hands out copies of one fixture document
pub struct FixtureBackend {
    pub document: Option<FixtureDocument>,
}

impl FixtureBackend {
    pub fn new(document: FixtureDocument) -> Self {
        Self {
            document: Some(document),
        }
    }

    /// Backend whose `open` always fails
    pub fn broken() -> Self {
        Self { document: None }
    }
}

impl DocumentBackend for FixtureBackend {
    fn name(&self) -> &'static str {
        "fixture"
    }

    fn open(&self, source: &DocumentSource) -> Result<Box<dyn DocumentHandle>> {
        match &self.document {
            Some(doc) => Ok(Box::new(doc.clone())),
            None => Err(DocumentError::NotFound(source.label())),
        }
    }
}
