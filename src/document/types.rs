//! Document types
//!
//! Format-neutral values exchanged between document backends and the
//! extraction stage.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

/// Source data for a document
#[derive(Debug, Clone)]
pub enum DocumentSource {
    /// Document loaded from owned bytes
    Bytes(Arc<Vec<u8>>),
    /// Document loaded from a file path
    Path(PathBuf),
}

impl DocumentSource {
    /// Create source from bytes
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self::Bytes(Arc::new(data))
    }

    /// Create source from path
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        Self::Path(path.as_ref().to_path_buf())
    }

    /// Short human-readable label used in logs and document ids
    pub fn label(&self) -> String {
        match self {
            Self::Bytes(data) => format!("<{} bytes>", data.len()),
            Self::Path(path) => path.display().to_string(),
        }
    }
}

/// A run of text-layer characters sharing one line and font size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextSpan {
    pub text: String,
    pub bbox: Rect,
    /// Font name, when the backend reports one
    pub font: Option<String>,
    pub size: f32,
}

/// PNG-encoded raster of a page region
#[derive(Debug, Clone)]
pub struct RenderedImage {
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Image placed on a page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddedImage {
    /// Backend-specific identifier, stable for the lifetime of a handle
    pub id: String,
    /// Placement on the page in document units
    pub bbox: Rect,
}
