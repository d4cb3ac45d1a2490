//! Top-level pipeline entry point.
//!
//! Takes the immutable dataset and one [`PipelineRequest`] and returns every
//! derived view the presentation layer needs, recomputed from scratch.

use chrono::Utc;
use serde::Serialize;
use tracing::debug;
use tracker_core::models::{BusinessCount, LocationSummary, Review};
use tracker_core::request::{LocationSelector, PipelineRequest};
use tracker_core::Result;

use crate::aggregator::summarize_business;
use crate::dataset::Dataset;
use crate::pipeline::{
    count_locations_per_business, filter_reviews, franchise_candidates, reviews_for_business,
};
use crate::views::{select_locations, MapView, SentimentHistogram};

// ── Public types ──────────────────────────────────────────────────────────────

/// Overall outcome of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStatus {
    /// Nothing matched the city / category / name filter.
    NoResults,
    /// Reviews matched, but no chain exceeds the location threshold.
    NoFranchises,
    /// A drill-down business was selected.
    Ready,
}

/// One location picked by the request's selector.
#[derive(Debug, Clone, Serialize)]
pub struct LocationDetail {
    pub summary: LocationSummary,
    pub distribution: SentimentHistogram,
}

/// Per-location analysis of the selected chain.
#[derive(Debug, Clone, Serialize)]
pub struct BusinessDrillDown {
    pub business: String,
    pub locations: Vec<LocationSummary>,
    pub map: MapView,
    pub distribution: SentimentHistogram,
    pub selector: LocationSelector,
    pub selected: Vec<LocationDetail>,
}

/// Bookkeeping about one pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineMetadata {
    /// RFC 3339 timestamp when this result was generated.
    pub generated_at: String,
    /// RFC 3339 timestamp when the dataset was loaded.
    pub dataset_loaded_at: String,
    pub rows_scanned: usize,
    pub rows_matched: usize,
    pub locations_summarized: usize,
    pub elapsed_seconds: f64,
}

/// The complete output of [`run_pipeline`].
#[derive(Debug, Clone, Serialize)]
pub struct PipelineResult {
    pub request: PipelineRequest,
    pub status: PipelineStatus,
    pub reviews: Vec<Review>,
    pub business_counts: Vec<BusinessCount>,
    pub candidates: Vec<String>,
    pub overview_map: MapView,
    pub drill_down: Option<BusinessDrillDown>,
    pub metadata: PipelineMetadata,
}

// ── Public function ───────────────────────────────────────────────────────────

/// Run the full pipeline for one request.
///
/// 1. Filter reviews by city, category and optional name.
/// 2. Count distinct locations per chain and pick franchise candidates.
/// 3. Choose the drill-down chain: the requested one if it qualifies,
///    otherwise the largest candidate.
/// 4. Summarize each of its locations and detail the selected ones.
pub fn run_pipeline(dataset: &Dataset, request: &PipelineRequest) -> Result<PipelineResult> {
    let start = std::time::Instant::now();

    // ── Step 1: Filter ────────────────────────────────────────────────────────
    let matched = filter_reviews(
        dataset.reviews(),
        &request.city,
        &request.category,
        request.name_filter(),
    );

    // ── Step 2: Count ─────────────────────────────────────────────────────────
    let business_counts = count_locations_per_business(matched.iter().copied());
    let candidates = franchise_candidates(&business_counts, request.threshold);
    let overview_map = MapView::overview(&matched, request.state_center);

    // ── Step 3/4: Drill down ──────────────────────────────────────────────────
    let drill_down = match pick_business(&candidates, request.selected_business.as_deref()) {
        Some(business) => Some(drill_into(&matched, business, request)?),
        None => None,
    };

    let status = if matched.is_empty() {
        PipelineStatus::NoResults
    } else if drill_down.is_none() {
        PipelineStatus::NoFranchises
    } else {
        PipelineStatus::Ready
    };

    let locations_summarized = drill_down.as_ref().map_or(0, |d| d.locations.len());
    debug!(
        "Pipeline {}/{}: {} of {} rows matched, {} chains, {} candidates",
        request.city,
        request.category,
        matched.len(),
        dataset.len(),
        business_counts.len(),
        candidates.len(),
    );

    let metadata = PipelineMetadata {
        generated_at: Utc::now().to_rfc3339(),
        dataset_loaded_at: dataset.loaded_at().to_rfc3339(),
        rows_scanned: dataset.len(),
        rows_matched: matched.len(),
        locations_summarized,
        elapsed_seconds: start.elapsed().as_secs_f64(),
    };

    Ok(PipelineResult {
        request: request.clone(),
        status,
        reviews: matched.into_iter().cloned().collect(),
        business_counts,
        candidates,
        overview_map,
        drill_down,
        metadata,
    })
}

// ── Private helpers ───────────────────────────────────────────────────────────

/// The requested business when it is a candidate, else the first candidate.
fn pick_business<'a>(candidates: &'a [String], requested: Option<&str>) -> Option<&'a str> {
    if let Some(name) = requested {
        if let Some(found) = candidates.iter().find(|c| c.as_str() == name) {
            return Some(found.as_str());
        }
        debug!("Requested business {:?} is not a candidate; using the first", name);
    }
    candidates.first().map(String::as_str)
}

fn drill_into(
    matched: &[&Review],
    business: &str,
    request: &PipelineRequest,
) -> Result<BusinessDrillDown> {
    let business_reviews = reviews_for_business(matched, business);
    let locations = summarize_business(business_reviews.iter().copied())?;

    let selected = select_locations(&locations, &request.location)
        .into_iter()
        .map(|summary| {
            let reviews: Vec<&Review> = business_reviews
                .iter()
                .copied()
                .filter(|r| r.business_id == summary.business_id)
                .collect();
            LocationDetail {
                summary: summary.clone(),
                distribution: SentimentHistogram::from_reviews(&reviews),
            }
        })
        .collect();

    Ok(BusinessDrillDown {
        business: business.to_string(),
        map: MapView::business(&business_reviews, request.state_center),
        distribution: SentimentHistogram::from_reviews(&business_reviews),
        selector: request.location.clone(),
        selected,
        locations,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
