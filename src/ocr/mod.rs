//! OCR Module
//!
//! Recognizes text in image candidates when a selection has no text layer.
//!
//! # Pipeline
//!
//! 1. Decode and downscale oversized images (`preprocess`)
//! 2. Try each configured (language, flags) pair over image variants (`service`)
//! 3. Filter garbage symbols and score every result (`filter`, `scoring`)
//! 4. Fall back to simpler segmentation and minimal preprocessing when nothing
//!    is recognized
//!
//! Engines implement [`OcrEngine`]; [`TesseractCli`] drives the `tesseract`
//! binary.

pub mod filter;
pub mod preprocess;
mod provider;
pub mod scoring;
mod service;
mod types;

#[cfg(test)]
pub use provider::mock;
pub use preprocess::PreprocessSettings;
pub use provider::{OcrEngine, TesseractCli};
pub use scoring::{ScoreBreakdown, ScoringWeights};
pub use service::{settings_for, OcrAdapter};
pub use types::{
    LanguageMode, OcrAttempt, OcrError, OcrFlags, OcrOutcome, OcrSetting, PageSegmentationMode,
    RecognitionPath,
};
