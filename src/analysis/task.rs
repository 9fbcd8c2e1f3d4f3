//! Background analysis runner
//!
//! At most one analysis is in flight. Submitting a new selection aborts the
//! previous task; its caller gets `AnalysisError::Cancelled` while the blocking
//! work it started runs to completion and is discarded.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task::AbortHandle;
use tracing::{debug, error};

use super::pipeline::SelectionAnalyzer;
use super::types::{AnalysisOptions, AnalysisReport, SelectionRequest};
use crate::error::{AnalysisError, Result};
use crate::geometry::{MappedRect, FALLBACK_RECT};

/// Handle of the task currently in flight
#[derive(Default)]
struct Slot {
    generation: u64,
    handle: Option<AbortHandle>,
}

pub struct AnalysisRunner {
    analyzer: Arc<SelectionAnalyzer>,
    current: Mutex<Slot>,
}

impl AnalysisRunner {
    pub fn new(analyzer: Arc<SelectionAnalyzer>) -> Self {
        Self {
            analyzer,
            current: Mutex::new(Slot::default()),
        }
    }

    /// Analyze a selection in the background, replacing any running analysis
    pub async fn submit(
        &self,
        request: SelectionRequest,
        options: AnalysisOptions,
    ) -> Result<AnalysisReport> {
        let analyzer = self.analyzer.clone();
        let mode = options.mode;

        // Spawn and register under one lock so concurrent submits cannot
        // interleave and leave an older task as the current one
        let (task, generation) = {
            let mut slot = self.current.lock();
            let task = tokio::spawn(async move {
                tokio::task::spawn_blocking(move || analyzer.analyze(&request, &options)).await
            });
            slot.generation += 1;
            if let Some(previous) = slot.handle.replace(task.abort_handle()) {
                debug!("Aborting previous analysis");
                previous.abort();
            }
            (task, slot.generation)
        };

        let outcome = task.await;
        {
            let mut slot = self.current.lock();
            if slot.generation == generation {
                slot.handle = None;
            }
        }

        match outcome {
            Ok(Ok(report)) => Ok(report),
            Ok(Err(join)) => {
                // Blocking worker panicked outside the pipeline's own guard
                let e = AnalysisError::Panicked(join.to_string());
                error!(error = %e, "Analysis task failed");
                let mapped = MappedRect {
                    rect: FALLBACK_RECT,
                    valid: false,
                };
                Ok(AnalysisReport::failure(e, mode, mapped))
            }
            Err(join) if join.is_cancelled() => Err(AnalysisError::Cancelled),
            Err(join) => Err(AnalysisError::Join(join.to_string())),
        }
    }

    /// Abort the running analysis, if any
    pub fn cancel(&self) {
        if let Some(handle) = self.current.lock().handle.take() {
            handle.abort();
        }
    }
}
