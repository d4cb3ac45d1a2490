//! Presentation-neutral projections: map markers, sentiment histograms and
//! location selection.

use serde::Serialize;

use tracker_core::models::{Coordinates, LocationSummary, Review};
use tracker_core::request::LocationSelector;
use tracker_core::sentiment::SentimentClass;

/// Zoom level of the state-wide overview map.
pub const OVERVIEW_ZOOM: u8 = 6;

/// Zoom level of the single-business map.
pub const BUSINESS_ZOOM: u8 = 9;

/// Number of histogram bins across `[-1, 1]`.
pub const DEFAULT_HISTOGRAM_BINS: usize = 20;

// ── Map ───────────────────────────────────────────────────────────────────────

/// One review plotted on a map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub position: Coordinates,
    pub class: SentimentClass,
    pub color: &'static str,
    /// Popup text, e.g. `"Sunny Cafe (33602): Sentiment: 0.50"`.
    pub label: String,
}

impl MapMarker {
    pub fn from_review(review: &Review) -> Self {
        let class = review.class();
        Self {
            position: Coordinates::new(review.latitude, review.longitude),
            class,
            color: class.color(),
            label: format!(
                "{} ({}): Sentiment: {:.2}",
                review.name, review.postal_code, review.sentiment
            ),
        }
    }
}

/// A set of markers plus where to center them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub center: Coordinates,
    pub zoom: u8,
    pub markers: Vec<MapMarker>,
}

impl MapView {
    /// State-wide map of all matching reviews.
    pub fn overview(reviews: &[&Review], state_center: Coordinates) -> Self {
        Self {
            center: state_center,
            zoom: OVERVIEW_ZOOM,
            markers: reviews.iter().map(|r| MapMarker::from_review(r)).collect(),
        }
    }

    /// Map of one business, centered on the mean position of its reviews.
    /// Falls back to `fallback_center` when there are no reviews.
    pub fn business(reviews: &[&Review], fallback_center: Coordinates) -> Self {
        let center = Coordinates::centroid(
            reviews
                .iter()
                .map(|r| Coordinates::new(r.latitude, r.longitude)),
        )
        .unwrap_or(fallback_center);
        Self {
            center,
            zoom: BUSINESS_ZOOM,
            markers: reviews.iter().map(|r| MapMarker::from_review(r)).collect(),
        }
    }
}

// ── Histogram ─────────────────────────────────────────────────────────────────

/// One histogram bar, split by sentiment class for styling.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

impl HistogramBin {
    pub fn count(&self) -> usize {
        self.positive + self.negative + self.neutral
    }

    /// Class of the bin's midpoint, used to color the bar.
    pub fn class(&self) -> SentimentClass {
        SentimentClass::classify((self.lower + self.upper) / 2.0)
    }
}

/// Distribution of sentiment scores over equal-width bins spanning `[-1, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentHistogram {
    pub bins: Vec<HistogramBin>,
    pub total: usize,
}

impl SentimentHistogram {
    /// Bin `scores` into `bins` buckets (at least one). Scores outside the
    /// range are clamped into the edge bins; `1.0` lands in the last bin.
    pub fn from_scores<I>(scores: I, bins: usize) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let bins = bins.max(1);
        let width = 2.0 / bins as f64;
        let mut out: Vec<HistogramBin> = (0..bins)
            .map(|i| HistogramBin {
                lower: bin_edge(i, bins),
                upper: bin_edge(i + 1, bins),
                positive: 0,
                negative: 0,
                neutral: 0,
            })
            .collect();

        let mut total = 0usize;
        for score in scores {
            if score.is_nan() {
                continue;
            }
            let raw = ((score + 1.0) / width).floor();
            let mut idx = if raw <= 0.0 {
                0
            } else {
                (raw as usize).min(bins - 1)
            };
            // The estimate can be off by one at an edge; the stored bounds decide.
            while idx + 1 < bins && score >= out[idx + 1].lower {
                idx += 1;
            }
            while idx > 0 && score < out[idx].lower {
                idx -= 1;
            }
            let bin = &mut out[idx];
            match SentimentClass::classify(score) {
                SentimentClass::Positive => bin.positive += 1,
                SentimentClass::Negative => bin.negative += 1,
                SentimentClass::Neutral => bin.neutral += 1,
            }
            total += 1;
        }

        Self { bins: out, total }
    }

    /// Histogram of the given reviews with the default bin count.
    pub fn from_reviews(reviews: &[&Review]) -> Self {
        Self::from_scores(reviews.iter().map(|r| r.sentiment), DEFAULT_HISTOGRAM_BINS)
    }

    /// Largest bar height, for scaling.
    pub fn max_count(&self) -> usize {
        self.bins.iter().map(HistogramBin::count).max().unwrap_or(0)
    }
}

/// Edge `i` of `bins` equal-width bins over `[-1, 1]`, from exact integers so
/// that decimal edges such as `-0.9` match the literal.
fn bin_edge(i: usize, bins: usize) -> f64 {
    (2.0 * i as f64 - bins as f64) / bins as f64
}

// ── Location selection ────────────────────────────────────────────────────────

/// `true` when `summary` is picked by `selector`.
///
/// Postal codes and ids compare exactly; addresses compare trimmed and
/// case-insensitively.
pub fn selector_matches(selector: &LocationSelector, summary: &LocationSummary) -> bool {
    match selector {
        LocationSelector::All => true,
        LocationSelector::PostalCode(pc) => summary.postal_code == *pc,
        LocationSelector::BusinessId(id) => summary.business_id == *id,
        LocationSelector::Address(addr) => {
            summary.address.trim().to_lowercase() == addr.trim().to_lowercase()
        }
    }
}

/// Summaries picked by `selector`, in their original order.
pub fn select_locations<'a>(
    locations: &'a [LocationSummary],
    selector: &LocationSelector,
) -> Vec<&'a LocationSummary> {
    locations
        .iter()
        .filter(|s| selector_matches(selector, s))
        .collect()
}

/// Distinct postal codes across the given locations, first appearance first.
pub fn postal_code_options(locations: &[LocationSummary]) -> Vec<&str> {
    let mut out: Vec<&str> = Vec::new();
    for s in locations {
        if !out.contains(&s.postal_code.as_str()) {
            out.push(s.postal_code.as_str());
        }
    }
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────
