//! Content extraction
//!
//! Turns a document rectangle into text-layer spans or, failing that, image
//! candidates for OCR.

mod extractor;
mod types;

pub use extractor::ContentExtractor;
pub use types::{
    Extraction, ExtractionMethod, ExtractionSettings, ImageCandidate, RenderOutcome, SkipReason,
};
