//! Structured Text Helpers
//!
//! Walks MuPDF structured text to produce clipped spans and image placements.

use mupdf::{Page, Quad, TextBlockType, TextPageOptions};

use crate::document::{EmbeddedImage, Result, TextSpan};
use crate::geometry::Rect;

/// Font sizes closer than this belong to the same span
const SIZE_EPSILON: f32 = 0.01;

/// Character bounding box from its quad
fn quad_bbox(quad: &Quad) -> Rect {
    let x0 = quad.ul.x.min(quad.ll.x);
    let y0 = quad.ul.y.min(quad.ur.y);
    let x1 = quad.ur.x.max(quad.lr.x).max(x0);
    let y1 = quad.ll.y.max(quad.lr.y).max(y0);
    Rect::new(x0, y0, x1, y1)
}

/// Accumulates consecutive characters into one span
#[derive(Default)]
struct SpanBuilder {
    text: String,
    bbox: Option<Rect>,
    size: f32,
}

impl SpanBuilder {
    fn push(&mut self, c: char, bbox: Rect, size: f32) {
        self.text.push(c);
        self.size = size;
        self.bbox = Some(match self.bbox {
            Some(b) => b.union(&bbox),
            None => bbox,
        });
    }

    fn accepts(&self, size: f32) -> bool {
        self.bbox.is_none() || (self.size - size).abs() < SIZE_EPSILON
    }

    fn finish(&mut self, out: &mut Vec<TextSpan>) {
        let builder = std::mem::take(self);
        let text = builder.text.trim();
        if let (false, Some(bbox)) = (text.is_empty(), builder.bbox) {
            out.push(TextSpan {
                text: text.to_string(),
                bbox,
                font: None,
                size: builder.size,
            });
        }
    }
}

/// Extract text spans whose characters fall inside `clip`
///
/// A span is a run of characters on one line with the same font size. A
/// character belongs to the clip when its centre lies inside it; characters
/// outside break the current run.
pub fn extract_spans(page: &Page, clip: &Rect) -> Result<Vec<TextSpan>> {
    let text_page = page.to_text_page(TextPageOptions::empty())?;
    let mut spans = Vec::new();

    for block in text_page.blocks() {
        if block.r#type() != TextBlockType::Text {
            continue;
        }

        for line in block.lines() {
            let mut current = SpanBuilder::default();

            for ch in line.chars() {
                let Some(c) = ch.char() else {
                    continue;
                };
                let bbox = quad_bbox(&ch.quad());
                let (cx, cy) = bbox.center();

                if !clip.contains_point(cx, cy) {
                    current.finish(&mut spans);
                    continue;
                }

                let size = ch.size();
                if !current.accepts(size) {
                    current.finish(&mut spans);
                }
                current.push(c, bbox, size);
            }

            current.finish(&mut spans);
        }
    }

    Ok(spans)
}

/// Image placements on the page, numbered in content order
pub fn image_blocks(page: &Page) -> Result<Vec<EmbeddedImage>> {
    let text_page = page.to_text_page(TextPageOptions::PRESERVE_IMAGES)?;

    Ok(text_page
        .blocks()
        .filter(|block| block.r#type() == TextBlockType::Image)
        .enumerate()
        .map(|(index, block)| EmbeddedImage {
            id: format!("img-{}", index),
            bbox: Rect::from(block.bounds()),
        })
        .collect())
}
