//! Result assembly
//!
//! Text-layer spans become native elements and suppress OCR entirely. Without
//! them every image candidate is recognized independently; candidates that
//! yield nothing still produce a zero-confidence error element so the caller
//! can see what was tried.

use tracing::{debug, info, warn};

use super::reading_order::ReadingOrderSorter;
use super::types::{AnalysisMode, AnalysisSettings, ElementKind, ExtractedElement};
use crate::document::TextSpan;
use crate::extract::ImageCandidate;
use crate::geometry::Rect;
use crate::ocr::{LanguageMode, OcrAdapter, OcrOutcome, RecognitionPath};

/// Confidences for text recovered by the OCR fallback chain
#[derive(Debug, Clone, Copy)]
pub struct FallbackConfidence {
    pub segmentation: f32,
    pub preprocessed: f32,
}

impl Default for FallbackConfidence {
    fn default() -> Self {
        Self {
            segmentation: 0.3,
            preprocessed: 0.2,
        }
    }
}

pub struct ResultAssembler {
    ocr: OcrAdapter,
    settings: AnalysisSettings,
    fallback: FallbackConfidence,
    sorter: ReadingOrderSorter,
}

impl ResultAssembler {
    pub fn new(
        ocr: OcrAdapter,
        settings: AnalysisSettings,
        fallback: FallbackConfidence,
        sorter: ReadingOrderSorter,
    ) -> Self {
        Self {
            ocr,
            settings,
            fallback,
            sorter,
        }
    }

    pub fn settings(&self) -> &AnalysisSettings {
        &self.settings
    }

    /// Build unsorted elements for one selection
    pub fn assemble(
        &self,
        spans: Vec<TextSpan>,
        candidates: Vec<ImageCandidate>,
        language: LanguageMode,
        mode: AnalysisMode,
        under_pressure: bool,
    ) -> Vec<ExtractedElement> {
        if !spans.is_empty() {
            debug!(spans = spans.len(), "Using text layer, OCR skipped");
            return spans.into_iter().map(ExtractedElement::native).collect();
        }

        let mut candidates = candidates;
        if under_pressure && candidates.len() > self.settings.pressure_candidate_threshold {
            warn!(
                candidates = candidates.len(),
                limit = self.settings.pressure_candidate_limit,
                "Memory pressure, limiting OCR candidates"
            );
            candidates.truncate(self.settings.pressure_candidate_limit);
        }

        let elements: Vec<ExtractedElement> = candidates
            .iter()
            .map(|candidate| self.recognize_candidate(candidate, language, mode))
            .collect();

        if mode.is_thorough() {
            let recognized = elements
                .iter()
                .filter(|e| e.kind == ElementKind::Image)
                .count();
            info!(
                candidates = elements.len(),
                recognized, "OCR finished"
            );
        }
        elements
    }

    fn recognize_candidate(
        &self,
        candidate: &ImageCandidate,
        language: LanguageMode,
        mode: AnalysisMode,
    ) -> ExtractedElement {
        let method = candidate.method.as_str();

        match self.ocr.recognize(&candidate.bytes, language, mode) {
            Ok(OcrOutcome::Recognized { text, path, .. }) => {
                let (confidence, prefix) = match path {
                    RecognitionPath::Configured => (self.settings.image_confidence(mode), "ocr"),
                    RecognitionPath::SegmentationFallback => {
                        (self.fallback.segmentation, "ocr_fallback")
                    }
                    RecognitionPath::PreprocessedFallback => {
                        (self.fallback.preprocessed, "ocr_preprocessed")
                    }
                };
                ExtractedElement::new(
                    text,
                    ElementKind::Image,
                    confidence,
                    candidate.bbox,
                    format!("{}:{}", prefix, method),
                )
            }
            Ok(OcrOutcome::NoText { width, height, .. }) => ExtractedElement::error(
                format!(
                    "image element (OCR failed) - size: {}x{}, method: {}",
                    width, height, method
                ),
                candidate.bbox,
                format!("ocr_failed:{}", method),
            ),
            Err(e) => {
                warn!(method, error = %e, "Image candidate could not be processed");
                ExtractedElement::error(
                    format!(
                        "image element (unreadable: {}) - size: {}x{}, method: {}",
                        e, candidate.width, candidate.height, method
                    ),
                    candidate.bbox,
                    format!("ocr_error:{}", method),
                )
            }
        }
    }

    /// Sort into reading order; an empty list gets one diagnostic element
    pub fn finish<F>(&self, elements: Vec<ExtractedElement>, bbox: Rect, diagnostic: F) -> Vec<ExtractedElement>
    where
        F: FnOnce() -> String,
    {
        if elements.is_empty() {
            return self
                .sorter
                .sort(vec![ExtractedElement::diagnostic(diagnostic(), bbox)]);
        }
        self.sorter.sort(elements)
    }
}
