//! Immutable, explicitly constructed dataset handle.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracker_core::models::Review;

/// All review rows of one loaded file, in file order.
///
/// A `Dataset` is never mutated after construction; reloading produces a new
/// value.
#[derive(Debug, Clone)]
pub struct Dataset {
    reviews: Vec<Review>,
    source: Option<PathBuf>,
    loaded_at: DateTime<Utc>,
    skipped_rows: usize,
}

impl Dataset {
    /// Wrap already-validated reviews (tests, in-memory callers).
    pub fn from_reviews(reviews: Vec<Review>) -> Self {
        Self {
            reviews,
            source: None,
            loaded_at: Utc::now(),
            skipped_rows: 0,
        }
    }

    pub(crate) fn loaded(reviews: Vec<Review>, source: &Path, skipped_rows: usize) -> Self {
        Self {
            reviews,
            source: Some(source.to_path_buf()),
            loaded_at: Utc::now(),
            skipped_rows,
        }
    }

    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    pub fn len(&self) -> usize {
        self.reviews.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reviews.is_empty()
    }

    /// File the dataset was read from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// Rows rejected by validation during a lenient load.
    pub fn skipped_rows(&self) -> usize {
        self.skipped_rows
    }

    /// Distinct cities in order of first appearance.
    pub fn cities(&self) -> Vec<&str> {
        let mut seen: HashSet<&str> = HashSet::new();
        self.reviews
            .iter()
            .map(|r| r.city.as_str())
            .filter(|c| seen.insert(*c))
            .collect()
    }
}
