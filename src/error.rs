//! Crate-level error type

use thiserror::Error;

use crate::document::DocumentError;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    #[error("Analysis cancelled")]
    Cancelled,

    #[error("Analysis panicked: {0}")]
    Panicked(String),

    #[error("Analysis task failed: {0}")]
    Join(String),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
