//! Selection analysis
//!
//! Ties the stages together: map the selection, extract content, OCR image
//! candidates when there is no text layer, then assemble and sort.
//!
//! - [`SelectionAnalyzer`]: synchronous pipeline, never fails
//! - [`AnalysisRunner`]: background execution where the newest selection wins

mod assembler;
mod diagnostics;
mod memory;
mod pipeline;
mod reading_order;
mod task;
mod types;

pub use assembler::{FallbackConfidence, ResultAssembler};
pub use diagnostics::{describe, FAST_MODE_MESSAGE};
pub use memory::{parse_meminfo, FixedMemoryProbe, MemoryProbe, SystemMemoryProbe};
pub use pipeline::SelectionAnalyzer;
pub use reading_order::ReadingOrderSorter;
pub use task::AnalysisRunner;
pub use types::{
    combine_texts, AnalysisMode, AnalysisOptions, AnalysisReport, AnalysisSettings,
    AnalysisSummary, ElementKind, ExtractedElement, SelectionRequest,
};
