//! Dataset handle manager for the tracker runtime.
//!
//! Wraps [`load_dataset`] with an explicit load / refresh lifecycle and
//! transparent retry logic. Callers use [`DatasetManager::get`] to obtain the
//! shared immutable [`Dataset`]; the manager loads it on first use, retries
//! transient I/O failures up to three times, and keeps the previous handle
//! when a refresh fails.

use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracker_core::{Result, TrackerError};
use tracker_data::dataset::Dataset;
use tracker_data::reader::{load_dataset, LoadOptions};

/// Maximum number of load attempts for transient failures.
const MAX_RETRY_ATTEMPTS: u32 = 3;

// ── DatasetManager ────────────────────────────────────────────────────────────

/// Owner of the loaded review dataset.
///
/// # Example
/// ```no_run
/// use tracker_runtime::data_manager::DatasetManager;
/// use tracker_data::reader::LoadOptions;
///
/// let mut mgr = DatasetManager::new("florida_with_sentiment.csv", LoadOptions::default());
/// if let Ok(dataset) = mgr.get() {
///     println!("{} reviews", dataset.len());
/// }
/// ```
pub struct DatasetManager {
    path: PathBuf,
    options: LoadOptions,
    /// Most recently loaded dataset.
    dataset: Option<Arc<Dataset>>,
    /// When `dataset` was loaded.
    loaded_at: Option<Instant>,
    /// Description of the last load error.
    last_error: Option<String>,
}

impl DatasetManager {
    pub fn new(path: impl Into<PathBuf>, options: LoadOptions) -> Self {
        Self {
            path: path.into(),
            options,
            dataset: None,
            loaded_at: None,
            last_error: None,
        }
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// The shared dataset, loading it on first use.
    pub fn get(&mut self) -> Result<Arc<Dataset>> {
        match &self.dataset {
            Some(dataset) => {
                tracing::debug!("returning loaded dataset");
                Ok(Arc::clone(dataset))
            }
            None => self.refresh(),
        }
    }

    /// Reload the dataset from disk unconditionally.
    ///
    /// On failure the previously loaded handle (if any) stays available
    /// through [`DatasetManager::current`] and the error is returned.
    pub fn refresh(&mut self) -> Result<Arc<Dataset>> {
        match self.load_with_retry() {
            Ok(dataset) => {
                tracing::info!(
                    path = %self.path.display(),
                    reviews = dataset.len(),
                    skipped = dataset.skipped_rows(),
                    "dataset loaded"
                );
                let dataset = Arc::new(dataset);
                self.dataset = Some(Arc::clone(&dataset));
                self.loaded_at = Some(Instant::now());
                self.last_error = None;
                Ok(dataset)
            }
            Err(e) => {
                // Returned to the caller, which reports it.
                tracing::debug!(
                    path = %self.path.display(),
                    error = %e,
                    kept_previous = self.dataset.is_some(),
                    "dataset load failed"
                );
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// The loaded dataset without triggering a load.
    pub fn current(&self) -> Option<Arc<Dataset>> {
        self.dataset.clone()
    }

    /// Drop the handle so the next [`DatasetManager::get`] reloads.
    pub fn invalidate(&mut self) {
        self.dataset = None;
        self.loaded_at = None;
        tracing::debug!("dataset handle invalidated");
    }

    /// Time since the current handle was loaded.
    pub fn dataset_age(&self) -> Option<Duration> {
        self.loaded_at.map(|ts| ts.elapsed())
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    // ── Private helpers ───────────────────────────────────────────────────

    /// Back-off schedule: attempt 1 → 0 ms, attempt 2 → 100 ms, attempt 3 → 200 ms.
    /// Structural errors (bad header, bad row in strict mode) fail immediately.
    fn load_with_retry(&self) -> Result<Dataset> {
        let mut last_err: Option<TrackerError> = None;

        for attempt in 0..MAX_RETRY_ATTEMPTS {
            if attempt > 0 {
                let sleep_ms = (attempt as u64) * 100;
                tracing::debug!(attempt, sleep_ms, "retrying dataset load after back-off");
                thread::sleep(Duration::from_millis(sleep_ms));
            }

            match load_dataset(&self.path, self.options) {
                Ok(dataset) => return Ok(dataset),
                Err(e) if e.is_transient() => {
                    tracing::warn!(attempt, error = %e, "dataset load attempt failed");
                    last_err = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_err.unwrap_or_else(|| TrackerError::DatasetNotFound(self.path.clone())))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
