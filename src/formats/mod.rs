//! Format-specific document implementations
//!
//! Implementations of the `document` traits, selected by configuration.

pub mod pdf;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::document::DocumentBackend;

/// Document backend selected in configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// MuPDF with text layer and embedded images
    #[default]
    Mupdf,
    /// Render-only, forces OCR
    Raster,
}

impl BackendKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mupdf" | "pymupdf" => Some(Self::Mupdf),
            "raster" | "pdf2image" => Some(Self::Raster),
            _ => None,
        }
    }

    /// Instantiate the backend
    pub fn backend(self) -> Arc<dyn DocumentBackend> {
        match self {
            Self::Mupdf => Arc::new(pdf::MupdfBackend),
            Self::Raster => Arc::new(pdf::RasterBackend),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_backend_kind() {
        assert_eq!(BackendKind::parse("MuPDF"), Some(BackendKind::Mupdf));
        assert_eq!(BackendKind::parse("pdf2image"), Some(BackendKind::Raster));
        assert_eq!(BackendKind::parse("poppler"), None);
        assert_eq!(BackendKind::Raster.backend().name(), "raster");
    }
}
