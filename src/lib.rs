//! Selection Analyzer Library
//!
//! Extracts the text under a rectangle drawn on a rendered PDF page. The text
//! layer is used when present; otherwise the region is rasterized and run
//! through OCR. Results come back as elements in reading order.
//!
//! # Modules
//!
//! - `geometry`: viewport to document coordinate mapping
//! - `document`: backend-agnostic document handle
//! - `formats`: MuPDF-backed handles (`mupdf`, `raster`)
//! - `mupdf`: low-level MuPDF access
//! - `extract`: text spans and image candidates for a rectangle
//! - `ocr`: engine adapter with scoring and fallbacks
//! - `analysis`: assembly, reading order, pipeline and background runner
//! - `config`: TOML and environment configuration

pub mod analysis;
pub mod config;
pub mod document;
pub mod error;
pub mod extract;
pub mod formats;
pub mod geometry;
pub mod mupdf;
pub mod ocr;

pub use analysis::{
    AnalysisMode, AnalysisOptions, AnalysisReport, AnalysisRunner, ElementKind, ExtractedElement,
    SelectionAnalyzer, SelectionRequest,
};
pub use config::Config;
pub use error::{AnalysisError, Result};
