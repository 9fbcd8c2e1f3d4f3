//! Document abstraction
//!
//! Narrow, backend-agnostic interface over the document engine. The analysis
//! pipeline only talks to `DocumentBackend` / `DocumentHandle`; the concrete
//! implementations live in `formats::pdf`.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                  SelectionAnalyzer                      │
//! └─────────────────────────────────────────────────────────┘
//!                            │ open(source)
//!                            ▼
//!   ┌─────────────────────────────────────────────────────┐
//!   │             dyn DocumentBackend                      │
//!   └─────────────────────────────────────────────────────┘
//!           │                                │
//!           ▼                                ▼
//!   ┌──────────────┐                ┌────────────────┐
//!   │ MupdfBackend │                │ RasterBackend  │
//!   │ text + images│                │ render only    │
//!   └──────────────┘                └────────────────┘
//!           │                                │
//!           └────────────┬───────────────────┘
//!                        ▼
//!   ┌─────────────────────────────────────────────────────┐
//!   │                  SafeDocument                        │
//!   │  (fresh MuPDF document per operation)               │
//!   └─────────────────────────────────────────────────────┘
//! ```

mod error;
mod traits;
mod types;

#[cfg(test)]
pub mod fixture;

pub use error::{DocumentError, DocumentResult, Result};
pub use traits::{DocumentBackend, DocumentHandle};
pub use types::{DocumentSource, EmbeddedImage, RenderedImage, TextSpan};
