//! Request/response session over a managed dataset.
//!
//! [`TrackerSession`] sits between the front end and the pipeline. Every
//! [`TrackerSession::submit`] runs the pipeline once and replaces the
//! previous result; nothing is carried over between submissions except the
//! dataset handle.

use std::sync::Arc;

use tracker_core::request::PipelineRequest;
use tracker_core::Result;
use tracker_data::analysis::{run_pipeline, PipelineResult};
use tracker_data::dataset::Dataset;

use crate::data_manager::DatasetManager;

/// Holds the latest derived view for one user.
pub struct TrackerSession {
    manager: DatasetManager,
    /// Result of the most recent successful submission.
    current: Option<PipelineResult>,
    /// Number of successful submissions so far.
    generation: u64,
}

impl TrackerSession {
    pub fn new(manager: DatasetManager) -> Self {
        Self {
            manager,
            current: None,
            generation: 0,
        }
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Recompute every view for `request`, superseding the previous result.
    ///
    /// A failed submission leaves the previous result in place.
    pub fn submit(&mut self, request: PipelineRequest) -> Result<&PipelineResult> {
        let dataset = self.manager.get()?;
        let result = run_pipeline(&dataset, &request)?;
        self.generation += 1;

        tracing::debug!(
            generation = self.generation,
            status = ?result.status,
            rows_matched = result.metadata.rows_matched,
            "submission recomputed"
        );

        Ok(self.current.insert(result))
    }

    /// Latest result, if any submission has succeeded.
    pub fn current(&self) -> Option<&PipelineResult> {
        self.current.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Shared dataset handle, loading it if needed.
    pub fn dataset(&mut self) -> Result<Arc<Dataset>> {
        self.manager.get()
    }

    /// Reload the dataset and drop the now-stale result.
    pub fn reload(&mut self) -> Result<Arc<Dataset>> {
        let dataset = self.manager.refresh()?;
        self.current = None;
        Ok(dataset)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
