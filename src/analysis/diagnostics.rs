//! Diagnostic text for selections that produced nothing

use std::fmt::Write;

use super::types::{AnalysisMode, SelectionRequest};
use crate::extract::{Extraction, RenderOutcome};
use crate::geometry::MappedRect;

/// Message used in fast mode
pub const FAST_MODE_MESSAGE: &str = "No text found in the selection.";

/// Images listed in the detailed report
const MAX_LISTED_IMAGES: usize = 3;

/// Explain why a selection yielded no elements
///
/// `extraction` is `None` when extraction never ran (unusable selection).
pub fn describe(
    request: &SelectionRequest,
    mapped: &MappedRect,
    extraction: Option<&Extraction>,
    mode: AnalysisMode,
) -> String {
    if mode == AnalysisMode::Fast {
        return FAST_MODE_MESSAGE.to_string();
    }

    let mut out = String::from("No text found in the selection.\n");
    let vr = &request.viewport_rect;
    let _ = writeln!(
        out,
        "Viewport selection: ({:.1}, {:.1}) {:.1}x{:.1}",
        vr.x, vr.y, vr.width, vr.height
    );
    if mapped.valid {
        let _ = writeln!(out, "Document rect: {}", mapped.rect);
    } else {
        let _ = writeln!(
            out,
            "Document rect: {} (fallback, selection outside page)",
            mapped.rect
        );
    }
    let _ = writeln!(
        out,
        "Viewport: {:.0}x{:.0}, zoom {:.2}",
        request.viewport_size.width, request.viewport_size.height, request.zoom_scale
    );

    let Some(extraction) = extraction else {
        out.push_str("Extraction skipped.");
        return out;
    };

    match &extraction.page_images {
        Some(images) => {
            let _ = writeln!(out, "Page images: {}", images.len());
            for image in images.iter().take(MAX_LISTED_IMAGES) {
                let overlap = if image.bbox.intersects(&mapped.rect) {
                    "overlaps"
                } else {
                    "no overlap"
                };
                let _ = writeln!(out, "  {} at {} ({})", image.id, image.bbox, overlap);
            }
        }
        None => out.push_str("Page images: not listed\n"),
    }

    let render = match &extraction.render {
        RenderOutcome::NotAttempted => "not attempted".to_string(),
        RenderOutcome::Rendered {
            width,
            height,
            bytes,
        } => format!("{}x{} ({} bytes)", width, height, bytes),
        RenderOutcome::TooSmall {
            width,
            height,
            bytes,
        } => format!("{}x{} ({} bytes, too small)", width, height, bytes),
        RenderOutcome::Failed(e) => format!("failed: {}", e),
    };
    let _ = writeln!(out, "Direct render: {}", render);

    match &extraction.text_layer_error {
        Some(e) => {
            let _ = write!(out, "Text layer: error ({})", e);
        }
        None => {
            let chars: usize = extraction
                .spans
                .iter()
                .map(|s| s.text.chars().count())
                .sum();
            let _ = write!(out, "Text layer: {} characters", chars);
        }
    }
    out
}
