//! Analysis types
//!
//! Requests, elements and the report returned for every selection.

use serde::{Deserialize, Serialize};

use crate::document::{DocumentSource, TextSpan};
use crate::geometry::{MappedRect, Rect, ViewportRect, ViewportSize};
use crate::ocr::LanguageMode;

/// Depth of analysis, chosen once per call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    /// All variants and configurations, embedded images, detailed diagnostics
    #[default]
    Thorough,
    /// Lower render density, one OCR configuration, no embedded images
    Fast,
}

impl AnalysisMode {
    pub fn is_thorough(&self) -> bool {
        matches!(self, Self::Thorough)
    }
}

/// Tunables for assembly and resource handling
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Consult system memory usage before each analysis
    pub memory_check: bool,
    /// Memory usage above this switches to fast mode
    pub memory_threshold_percent: f32,
    /// Under memory pressure, candidate lists longer than this are truncated
    pub pressure_candidate_threshold: usize,
    /// Candidates kept after truncation
    pub pressure_candidate_limit: usize,
    pub image_confidence: f32,
    pub fast_image_confidence: f32,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            memory_check: true,
            memory_threshold_percent: 85.0,
            pressure_candidate_threshold: 5,
            pressure_candidate_limit: 3,
            image_confidence: 0.9,
            fast_image_confidence: 0.8,
        }
    }
}

impl AnalysisSettings {
    /// Confidence of a recognized image element
    pub fn image_confidence(&self, mode: AnalysisMode) -> f32 {
        match mode {
            AnalysisMode::Thorough => self.image_confidence,
            AnalysisMode::Fast => self.fast_image_confidence,
        }
    }
}

/// Kind of an extracted element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    NativeText,
    Image,
    /// Text layer and OCR combined; reserved, not produced yet
    Mixed,
    Diagnostic,
    Error,
}

/// One piece of content found in the selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedElement {
    pub text: String,
    pub kind: ElementKind,
    /// In [0, 1]; always 0 for diagnostic and error elements
    pub confidence: f32,
    pub bbox: Rect,
    /// Position in reading order, assigned by the sorter
    pub reading_order: usize,
    pub source_method: String,
}

impl ExtractedElement {
    pub fn new(text: impl Into<String>, kind: ElementKind, confidence: f32, bbox: Rect, source: impl Into<String>) -> Self {
        let confidence = match kind {
            ElementKind::Diagnostic | ElementKind::Error => 0.0,
            _ => confidence.clamp(0.0, 1.0),
        };
        Self {
            text: text.into(),
            kind,
            confidence,
            bbox,
            reading_order: 0,
            source_method: source.into(),
        }
    }

    pub fn native(span: TextSpan) -> Self {
        Self::new(span.text, ElementKind::NativeText, 1.0, span.bbox, "text_layer")
    }

    pub fn diagnostic(text: impl Into<String>, bbox: Rect) -> Self {
        Self::new(text, ElementKind::Diagnostic, 0.0, bbox, "diagnostic")
    }

    pub fn error(text: impl Into<String>, bbox: Rect, source: impl Into<String>) -> Self {
        Self::new(text, ElementKind::Error, 0.0, bbox, source)
    }
}

/// A user selection on the preview
#[derive(Debug, Clone)]
pub struct SelectionRequest {
    pub document: DocumentSource,
    /// 0-based
    pub page_index: usize,
    pub viewport_rect: ViewportRect,
    pub viewport_size: ViewportSize,
    pub zoom_scale: f32,
}

/// Per-call options
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalysisOptions {
    pub language: LanguageMode,
    pub mode: AnalysisMode,
}

/// Counts and mean confidence over a result list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    pub total: usize,
    pub native_text: usize,
    pub image: usize,
    pub mixed: usize,
    pub diagnostic: usize,
    pub error: usize,
    pub average_confidence: f32,
}

impl AnalysisSummary {
    pub fn from_elements(elements: &[ExtractedElement]) -> Self {
        let mut summary = Self {
            total: elements.len(),
            ..Default::default()
        };
        for element in elements {
            match element.kind {
                ElementKind::NativeText => summary.native_text += 1,
                ElementKind::Image => summary.image += 1,
                ElementKind::Mixed => summary.mixed += 1,
                ElementKind::Diagnostic => summary.diagnostic += 1,
                ElementKind::Error => summary.error += 1,
            }
        }
        if !elements.is_empty() {
            summary.average_confidence =
                elements.iter().map(|e| e.confidence).sum::<f32>() / elements.len() as f32;
        }
        summary
    }
}

/// Join trimmed, non-empty element texts with single spaces, in list order
pub fn combine_texts(elements: &[ExtractedElement]) -> String {
    elements
        .iter()
        .map(|e| e.text.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Outcome of one analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    /// Sorted, never empty
    pub elements: Vec<ExtractedElement>,
    pub combined_text: String,
    pub summary: AnalysisSummary,
    /// Mode actually used, after any memory-pressure downgrade
    pub mode: AnalysisMode,
    pub mapped: MappedRect,
}

impl AnalysisReport {
    pub fn new(elements: Vec<ExtractedElement>, mode: AnalysisMode, mapped: MappedRect) -> Self {
        Self {
            combined_text: combine_texts(&elements),
            summary: AnalysisSummary::from_elements(&elements),
            elements,
            mode,
            mapped,
        }
    }

    /// Report carrying a single error element
    pub fn failure(message: impl std::fmt::Display, mode: AnalysisMode, mapped: MappedRect) -> Self {
        let element = ExtractedElement::error(
            format!("analysis error: {}", message),
            mapped.rect,
            "pipeline_error",
        );
        Self::new(vec![element], mode, mapped)
    }
}
