//! Document error types
//!
//! Errors raised by document backends while opening, reading the text layer,
//! rendering or pulling images.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Document not found: {0}")]
    NotFound(String),

    /// Page index outside the document
    #[error("Page not found: index {0}")]
    PageNotFound(usize),

    /// Image id not listed on the page
    #[error("Image not found: {0}")]
    ImageNotFound(String),

    #[error("Render error: {0}")]
    RenderError(String),

    /// Any failure reported by MuPDF
    #[error("MuPDF error: {0}")]
    ContextError(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Operation the backend does not provide
    #[error("Not supported by backend {backend}: {operation}")]
    NotSupported {
        backend: &'static str,
        operation: &'static str,
    },

    #[error("Text layer error: {0}")]
    TextExtractionError(String),

    #[error("Image error: {0}")]
    ImageError(String),
}

/// Result type alias for document operations
pub type Result<T> = std::result::Result<T, DocumentError>;

pub type DocumentResult<T> = Result<T>;

impl From<mupdf::Error> for DocumentError {
    fn from(err: mupdf::Error) -> Self {
        DocumentError::ContextError(err.to_string())
    }
}

impl From<image::ImageError> for DocumentError {
    fn from(err: image::ImageError) -> Self {
        DocumentError::ImageError(err.to_string())
    }
}
