//! Content extraction for a document rectangle
//!
//! The text layer is read first. Only when it yields nothing does the image
//! path run: a direct render of the rectangle, then (thorough mode only) page
//! images overlapping it. Each candidate is built independently; a failure
//! becomes a `SkipReason` and never aborts the batch.

use tracing::{debug, info, warn};

use super::types::{
    Extraction, ExtractionMethod, ExtractionSettings, ImageCandidate, RenderOutcome, SkipReason,
};
use crate::analysis::AnalysisMode;
use crate::document::{DocumentHandle, EmbeddedImage, RenderedImage};
use crate::geometry::Rect;

pub struct ContentExtractor {
    settings: ExtractionSettings,
}

impl ContentExtractor {
    pub fn new(settings: ExtractionSettings) -> Self {
        Self { settings }
    }

    pub fn extract(
        &self,
        handle: &dyn DocumentHandle,
        page: usize,
        rect: &Rect,
        mode: AnalysisMode,
    ) -> Extraction {
        let (spans, text_layer_error) = match handle.text_spans(page, rect) {
            Ok(spans) => (spans, None),
            Err(e) => {
                warn!(page, error = %e, "Text layer extraction failed, treating as empty");
                (Vec::new(), Some(e.to_string()))
            }
        };

        if !spans.is_empty() {
            if mode.is_thorough() {
                info!(spans = spans.len(), "Text layer found, skipping image extraction");
            }
            return Extraction {
                spans,
                candidates: Vec::new(),
                skipped: Vec::new(),
                render: RenderOutcome::NotAttempted,
                page_images: None,
                text_layer_error,
            };
        }

        let mut results: Vec<Result<ImageCandidate, SkipReason>> = Vec::new();

        let (render, direct) = self.direct_render(handle, page, rect, mode);
        results.push(direct);

        let mut page_images = None;
        if mode.is_thorough() {
            match handle.embedded_images(page) {
                Ok(images) => {
                    results.extend(
                        images
                            .iter()
                            .take(self.settings.embedded_image_cap)
                            .map(|image| self.embedded_candidate(handle, page, rect, image)),
                    );
                    page_images = Some(images);
                }
                Err(e) => results.push(Err(SkipReason::ImageListFailed(e.to_string()))),
            }
        }

        let mut candidates = Vec::new();
        let mut skipped = Vec::new();
        for result in results {
            match result {
                Ok(candidate) => candidates.push(candidate),
                Err(reason) => {
                    debug!(%reason, "Skipped image candidate");
                    skipped.push(reason);
                }
            }
        }

        if mode.is_thorough() {
            info!(
                candidates = candidates.len(),
                skipped = skipped.len(),
                "Image extraction finished"
            );
        }

        Extraction {
            spans,
            candidates,
            skipped,
            render,
            page_images,
            text_layer_error,
        }
    }

    fn direct_render(
        &self,
        handle: &dyn DocumentHandle,
        page: usize,
        rect: &Rect,
        mode: AnalysisMode,
    ) -> (RenderOutcome, Result<ImageCandidate, SkipReason>) {
        let multiplier = match mode {
            AnalysisMode::Fast => self.settings.fast_multiplier,
            AnalysisMode::Thorough => self.settings.thorough_multiplier,
        };

        let rendered = match handle.render_region(page, rect, multiplier) {
            Ok(r) => r,
            Err(e) => {
                let message = e.to_string();
                return (
                    RenderOutcome::Failed(message.clone()),
                    Err(SkipReason::RenderFailed(message)),
                );
            }
        };

        let RenderedImage { png, width, height } = rendered;
        let bytes = png.len();
        if bytes <= self.settings.min_render_bytes {
            return (
                RenderOutcome::TooSmall {
                    width,
                    height,
                    bytes,
                },
                Err(SkipReason::RenderTooSmall { bytes }),
            );
        }

        debug!(bytes, width, height, multiplier, "Direct render candidate");
        (
            RenderOutcome::Rendered {
                width,
                height,
                bytes,
            },
            Ok(ImageCandidate {
                bytes: png,
                width,
                height,
                bbox: *rect,
                method: ExtractionMethod::DirectRender,
                origin: None,
            }),
        )
    }

    fn embedded_candidate(
        &self,
        handle: &dyn DocumentHandle,
        page: usize,
        rect: &Rect,
        image: &EmbeddedImage,
    ) -> Result<ImageCandidate, SkipReason> {
        let overlap = rect
            .intersection(&image.bbox)
            .ok_or_else(|| SkipReason::NoOverlap {
                image_id: image.id.clone(),
            })?;

        let min = self.settings.min_intersection;
        if overlap.width() <= min || overlap.height() <= min {
            return Err(SkipReason::OverlapTooSmall {
                image_id: image.id.clone(),
                width: overlap.width(),
                height: overlap.height(),
            });
        }

        let data = handle
            .extract_embedded_image(page, &image.id, &overlap)
            .map_err(|e| SkipReason::ExtractFailed {
                image_id: image.id.clone(),
                error: e.to_string(),
            })?;

        if data.png.len() <= self.settings.min_embedded_bytes {
            return Err(SkipReason::ImageTooSmall {
                image_id: image.id.clone(),
                bytes: data.png.len(),
            });
        }

        Ok(ImageCandidate {
            width: data.width,
            height: data.height,
            bytes: data.png,
            bbox: overlap,
            method: ExtractionMethod::EmbeddedIntersect,
            origin: Some(image.id.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::fixture::{noise_png, span, FixtureDocument};

    fn extractor() -> ContentExtractor {
        ContentExtractor::new(ExtractionSettings::default())
    }

    fn selection() -> Rect {
        Rect::new(100.0, 100.0, 300.0, 200.0)
    }

    #[test]
    fn test_text_layer_short_circuits_image_path() {
        let doc = FixtureDocument::a4()
            .with_spans(vec![span("合計", 110.0, 120.0, 140.0, 132.0)])
            .with_image("img-0", Rect::new(0.0, 0.0, 595.0, 842.0), noise_png(80, 80));

        let out = extractor().extract(&doc, 0, &selection(), AnalysisMode::Thorough);
        assert_eq!(out.spans.len(), 1);
        assert!(out.candidates.is_empty());
        assert_eq!(out.render, RenderOutcome::NotAttempted);
    }

    #[test]
    fn test_direct_render_and_embedded_candidates() {
        let doc = FixtureDocument::a4()
            .with_image("img-0", Rect::new(250.0, 150.0, 400.0, 400.0), noise_png(80, 80))
            .with_image("img-1", Rect::new(500.0, 500.0, 550.0, 550.0), noise_png(80, 80));

        let out = extractor().extract(&doc, 0, &selection(), AnalysisMode::Thorough);

        assert_eq!(out.candidates.len(), 2);
        assert_eq!(out.candidates[0].method, ExtractionMethod::DirectRender);
        assert_eq!(out.candidates[0].bbox, selection());
        assert_eq!(out.candidates[1].method, ExtractionMethod::EmbeddedIntersect);
        assert_eq!(out.candidates[1].bbox, Rect::new(250.0, 150.0, 300.0, 200.0));
        assert_eq!(out.candidates[1].origin.as_deref(), Some("img-0"));
        assert_eq!(
            out.skipped,
            vec![SkipReason::NoOverlap {
                image_id: "img-1".into()
            }]
        );
        assert_eq!(out.page_images.map(|v| v.len()), Some(2));
    }

    #[test]
    fn test_embedded_image_cropped_to_selection() {
        // Full-page scan behind a small selection
        let doc = FixtureDocument::a4()
            .with_render(None)
            .with_image("scan", Rect::new(0.0, 0.0, 595.0, 842.0), noise_png(80, 80));

        let out = extractor().extract(&doc, 0, &selection(), AnalysisMode::Thorough);

        assert_eq!(out.candidates.len(), 1);
        assert_eq!(out.candidates[0].bbox, selection());
        let requests = doc.image_requests.lock().clone();
        assert_eq!(requests, vec![("scan".to_string(), selection())]);
    }

    #[test]
    fn test_embedded_request_uses_overlap() {
        let doc = FixtureDocument::a4()
            .with_image("img-0", Rect::new(250.0, 150.0, 400.0, 400.0), noise_png(80, 80));

        extractor().extract(&doc, 0, &selection(), AnalysisMode::Thorough);

        let requests = doc.image_requests.lock().clone();
        assert_eq!(
            requests,
            vec![("img-0".to_string(), Rect::new(250.0, 150.0, 300.0, 200.0))]
        );
    }

    #[test]
    fn test_fast_mode_skips_embedded_images() {
        let doc = FixtureDocument::a4().with_image(
            "img-0",
            Rect::new(0.0, 0.0, 595.0, 842.0),
            noise_png(80, 80),
        );
        let out = extractor().extract(&doc, 0, &selection(), AnalysisMode::Fast);
        assert_eq!(out.candidates.len(), 1);
        assert_eq!(out.candidates[0].method, ExtractionMethod::DirectRender);
        assert!(out.page_images.is_none());
    }

    #[test]
    fn test_failures_are_isolated() {
        let doc = FixtureDocument::a4()
            .with_render(None)
            .with_image("thin", Rect::new(100.0, 100.0, 104.0, 200.0), noise_png(80, 80))
            .with_image("tiny", Rect::new(100.0, 100.0, 300.0, 200.0), noise_png(2, 2))
            .with_image("good", Rect::new(100.0, 100.0, 300.0, 200.0), noise_png(80, 80));

        let out = extractor().extract(&doc, 0, &selection(), AnalysisMode::Thorough);

        assert_eq!(out.candidates.len(), 1);
        assert_eq!(out.candidates[0].origin.as_deref(), Some("good"));
        assert_eq!(out.skipped.len(), 3);
        assert!(matches!(out.skipped[0], SkipReason::RenderFailed(_)));
        assert!(matches!(out.skipped[1], SkipReason::OverlapTooSmall { .. }));
        assert!(matches!(out.skipped[2], SkipReason::ImageTooSmall { .. }));
        assert!(matches!(out.render, RenderOutcome::Failed(_)));
    }

    #[test]
    fn test_embedded_cap() {
        let mut doc = FixtureDocument::a4().with_render(Some(noise_png(2, 2)));
        for i in 0..5 {
            doc = doc.with_image(&format!("img-{}", i), selection(), noise_png(80, 80));
        }

        let out = extractor().extract(&doc, 0, &selection(), AnalysisMode::Thorough);
        assert_eq!(out.candidates.len(), 3);
        assert!(matches!(out.render, RenderOutcome::TooSmall { .. }));
    }

    #[test]
    fn test_text_layer_error_is_empty() {
        let mut doc = FixtureDocument::a4();
        doc.fail_text_layer = true;

        let out = extractor().extract(&doc, 0, &selection(), AnalysisMode::Thorough);
        assert!(out.text_layer_error.is_some());
        assert_eq!(out.candidates.len(), 1);
    }
}
