//! Selection analysis pipeline
//!
//! ```text
//! SelectionRequest
//!       |
//!       v
//! GeometryMapper --(fallback rect)--> diagnostic element
//!       |
//!       v
//! ContentExtractor --> spans ----------------------+
//!       |                                          |
//!       +--> image candidates --> OcrAdapter ------+--> ResultAssembler --> ReadingOrderSorter
//! ```
//!
//! `analyze` never fails: any error, including a panic in a stage, becomes a
//! single error element.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::assembler::{FallbackConfidence, ResultAssembler};
use super::diagnostics;
use super::memory::{FixedMemoryProbe, MemoryProbe, SystemMemoryProbe};
use super::reading_order::ReadingOrderSorter;
use super::types::{
    AnalysisMode, AnalysisOptions, AnalysisReport, AnalysisSettings, ExtractedElement,
    SelectionRequest,
};
use crate::config::Config;
use crate::document::{DocumentBackend, DocumentError};
use crate::error::{AnalysisError, Result};
use crate::extract::ContentExtractor;
use crate::geometry::{GeometryMapper, MappedRect, FALLBACK_RECT};
use crate::ocr::{OcrAdapter, OcrEngine};

const UNMAPPED: MappedRect = MappedRect {
    rect: FALLBACK_RECT,
    valid: false,
};

pub struct SelectionAnalyzer {
    backend: Arc<dyn DocumentBackend>,
    mapper: GeometryMapper,
    extractor: ContentExtractor,
    assembler: ResultAssembler,
    memory: Box<dyn MemoryProbe>,
}

impl SelectionAnalyzer {
    /// Build from configuration with the given OCR engine
    pub fn from_config(config: &Config, engine: Arc<dyn OcrEngine>) -> Self {
        let ocr = OcrAdapter::new(
            engine,
            config.ocr.scoring.clone(),
            config.ocr.preprocess.clone(),
        );
        let fallback = FallbackConfidence {
            segmentation: config.ocr.fallback_confidence,
            preprocessed: config.ocr.minimal_fallback_confidence,
        };
        let assembler = ResultAssembler::new(
            ocr,
            config.analysis.clone(),
            fallback,
            ReadingOrderSorter::new(config.ocr.y_coordinate_tolerance),
        );
        let memory: Box<dyn MemoryProbe> = if config.analysis.memory_check {
            Box::new(SystemMemoryProbe)
        } else {
            Box::new(FixedMemoryProbe(None))
        };

        Self {
            backend: config.document.backend.backend(),
            mapper: GeometryMapper::new(),
            extractor: ContentExtractor::new(config.extraction.clone()),
            assembler,
            memory,
        }
    }

    pub fn with_backend(mut self, backend: Arc<dyn DocumentBackend>) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_memory_probe(mut self, probe: Box<dyn MemoryProbe>) -> Self {
        self.memory = probe;
        self
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    fn settings(&self) -> &AnalysisSettings {
        self.assembler.settings()
    }

    /// Analyze a selection; the report always holds at least one element
    pub fn analyze(&self, request: &SelectionRequest, options: &AnalysisOptions) -> AnalysisReport {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.try_analyze(request, options)));

        match outcome {
            Ok(Ok(report)) => report,
            Ok(Err(e)) => {
                error!(error = %e, document = %request.document.label(), "Selection analysis failed");
                AnalysisReport::failure(e, options.mode, UNMAPPED)
            }
            Err(payload) => {
                let e = AnalysisError::Panicked(panic_message(payload.as_ref()));
                error!(error = %e, document = %request.document.label(), "Selection analysis panicked");
                AnalysisReport::failure(e, options.mode, UNMAPPED)
            }
        }
    }

    /// Run the pipeline, surfacing document errors
    pub fn try_analyze(
        &self,
        request: &SelectionRequest,
        options: &AnalysisOptions,
    ) -> Result<AnalysisReport> {
        let settings = self.settings();
        let under_pressure = self.memory.under_pressure(settings.memory_threshold_percent);
        let mode = if under_pressure && options.mode.is_thorough() {
            warn!("Switching to fast mode due to memory pressure");
            AnalysisMode::Fast
        } else {
            options.mode
        };

        let handle = self.backend.open(&request.document)?;
        if request.page_index >= handle.page_count() {
            return Err(DocumentError::PageNotFound(request.page_index).into());
        }
        let page_size = handle.page_size(request.page_index)?;

        let mapped = self.mapper.map(
            &request.viewport_rect,
            page_size,
            request.zoom_scale,
            request.viewport_size,
        );

        if !mapped.valid {
            // Nothing useful lies under the fallback rectangle
            let text = diagnostics::describe(request, &mapped, None, mode);
            let elements = self.assembler.finish(Vec::new(), mapped.rect, || text);
            return Ok(AnalysisReport::new(elements, mode, mapped));
        }

        let mut extraction = self
            .extractor
            .extract(handle.as_ref(), request.page_index, &mapped.rect, mode);
        debug!(
            spans = extraction.spans.len(),
            candidates = extraction.candidates.len(),
            skipped = extraction.skipped.len(),
            "Extraction complete"
        );

        // Spans and image bytes move into the assembler; the diagnostic only
        // reads the render and image listings, and spans are empty whenever
        // it runs
        let elements = self.assembler.assemble(
            std::mem::take(&mut extraction.spans),
            std::mem::take(&mut extraction.candidates),
            options.language,
            mode,
            under_pressure,
        );
        let elements: Vec<ExtractedElement> = self.assembler.finish(elements, mapped.rect, || {
            diagnostics::describe(request, &mapped, Some(&extraction), mode)
        });

        let report = AnalysisReport::new(elements, mode, mapped);
        if mode.is_thorough() {
            info!(
                document = handle.id(),
                page = request.page_index,
                elements = report.summary.total,
                native_text = report.summary.native_text,
                image = report.summary.image,
                error = report.summary.error,
                "Selection analyzed"
            );
        }
        Ok(report)
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
