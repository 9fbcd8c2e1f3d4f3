//! Low-level MuPDF Wrapper
//!
//! Safe, thread-aware helpers around the MuPDF library.
//!
//! # Thread Safety
//!
//! MuPDF's `fz_context` is **NOT thread-safe**. `SafeDocument` opens a fresh
//! document per operation behind a mutex, and the helpers in `stext` and
//! `pixmap` only ever borrow a `Page` inside that scope.
//!
//! # Usage
//!
//! ```rust,ignore
//! use selection_analyzer::mupdf::{SafeDocument, stext};
//!
//! let doc = SafeDocument::open(DocumentSource::from_path("invoice.pdf"), "invoice".into())?;
//! let spans = doc.with_page(0, |page| stext::extract_spans(page, &clip))?;
//! ```

pub mod pixmap;
mod safe;
pub mod stext;

pub use safe::SafeDocument;
