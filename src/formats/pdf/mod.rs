//! PDF format implementation
//!
//! `DocumentBackend` implementations for PDF documents using MuPDF.
//!
//! # Architecture
//!
//! - [`MupdfBackend`]: text layer, region rendering and embedded images
//! - [`RasterBackend`]: region rendering only, every selection goes to OCR
//!
//! Both hand out [`PdfHandle`]s built on `SafeDocument` from the mupdf module.

mod handler;

pub use handler::{MupdfBackend, PdfHandle, RasterBackend};
