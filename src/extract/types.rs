//! Extraction types

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::document::{EmbeddedImage, TextSpan};
use crate::geometry::Rect;

/// Tunables for the image path
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionSettings {
    /// Render density in thorough mode
    pub thorough_multiplier: f32,
    /// Render density in fast mode
    pub fast_multiplier: f32,
    /// Direct renders at or below this size are discarded
    pub min_render_bytes: usize,
    /// Only the first N page images are considered
    pub embedded_image_cap: usize,
    /// Intersection must be wider and taller than this
    pub min_intersection: f32,
    /// Embedded images at or below this size are discarded
    pub min_embedded_bytes: usize,
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            thorough_multiplier: 2.0,
            fast_multiplier: 1.5,
            min_render_bytes: 500,
            embedded_image_cap: 3,
            min_intersection: 5.0,
            min_embedded_bytes: 1000,
        }
    }
}

/// How an image candidate was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    DirectRender,
    EmbeddedIntersect,
}

impl ExtractionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DirectRender => "direct_render",
            Self::EmbeddedIntersect => "embedded_intersect",
        }
    }
}

impl std::fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Encoded image handed to OCR
#[derive(Debug, Clone)]
pub struct ImageCandidate {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Region of the selection the image covers
    pub bbox: Rect,
    pub method: ExtractionMethod,
    /// Embedded image id, for `EmbeddedIntersect`
    pub origin: Option<String>,
}

/// Why a candidate was not produced
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SkipReason {
    #[error("direct render failed: {0}")]
    RenderFailed(String),

    #[error("direct render too small ({bytes} bytes)")]
    RenderTooSmall { bytes: usize },

    #[error("image list unavailable: {0}")]
    ImageListFailed(String),

    #[error("image {image_id} does not overlap the selection")]
    NoOverlap { image_id: String },

    #[error("image {image_id} overlap too small ({width:.1}x{height:.1})")]
    OverlapTooSmall {
        image_id: String,
        width: f32,
        height: f32,
    },

    #[error("image {image_id} extraction failed: {error}")]
    ExtractFailed { image_id: String, error: String },

    #[error("image {image_id} too small ({bytes} bytes)")]
    ImageTooSmall { image_id: String, bytes: usize },
}

/// What happened to the direct render
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOutcome {
    /// Image path not run (text layer present)
    NotAttempted,
    Rendered { width: u32, height: u32, bytes: usize },
    TooSmall { width: u32, height: u32, bytes: usize },
    Failed(String),
}

/// Everything found inside a document rectangle
#[derive(Debug, Clone)]
pub struct Extraction {
    pub spans: Vec<TextSpan>,
    pub candidates: Vec<ImageCandidate>,
    pub skipped: Vec<SkipReason>,
    pub render: RenderOutcome,
    /// Page images, when they were listed
    pub page_images: Option<Vec<EmbeddedImage>>,
    /// Text-layer failure, treated as "no spans"
    pub text_layer_error: Option<String>,
}
