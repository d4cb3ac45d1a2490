//! Per-location sentiment aggregation.

use std::collections::HashMap;

use tracker_core::models::{Coordinates, LocationSummary, Review};
use tracker_core::sentiment::SentimentClass;
use tracker_core::{Result, TrackerError};

// ── SentimentTally ────────────────────────────────────────────────────────────

/// Running totals accumulated over the reviews of one group.
#[derive(Debug, Clone, Default)]
pub struct SentimentTally {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
    pub sentiment_sum: f64,
    latitude_sum: f64,
    longitude_sum: f64,
}

impl SentimentTally {
    /// Add a single review to the running totals.
    pub fn add_review(&mut self, review: &Review) {
        match review.class() {
            SentimentClass::Positive => self.positive += 1,
            SentimentClass::Negative => self.negative += 1,
            SentimentClass::Neutral => self.neutral += 1,
        }
        self.sentiment_sum += review.sentiment;
        self.latitude_sum += review.latitude;
        self.longitude_sum += review.longitude;
    }

    pub fn total(&self) -> usize {
        self.positive + self.negative + self.neutral
    }

    /// Mean sentiment, or `None` for an empty tally.
    pub fn mean(&self) -> Option<f64> {
        match self.total() {
            0 => None,
            n => Some(self.sentiment_sum / n as f64),
        }
    }

    fn centroid(&self) -> Option<Coordinates> {
        match self.total() {
            0 => None,
            n => Some(Coordinates::new(
                self.latitude_sum / n as f64,
                self.longitude_sum / n as f64,
            )),
        }
    }
}

// ── LocationGroup ─────────────────────────────────────────────────────────────

/// Reviews sharing one `business_id`.
#[derive(Debug, Clone)]
pub struct LocationGroup<'a> {
    pub business_id: &'a str,
    pub reviews: Vec<&'a Review>,
}

/// Partition reviews by `business_id`, groups ordered by first appearance.
pub fn group_by_location<'a, I>(reviews: I) -> Vec<LocationGroup<'a>>
where
    I: IntoIterator<Item = &'a Review>,
{
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    let mut groups: Vec<LocationGroup<'a>> = Vec::new();

    for review in reviews {
        let id = review.business_id.as_str();
        let i = *index.entry(id).or_insert_with(|| {
            groups.push(LocationGroup {
                business_id: id,
                reviews: Vec::new(),
            });
            groups.len() - 1
        });
        groups[i].reviews.push(review);
    }

    groups
}

// ── Summaries ─────────────────────────────────────────────────────────────────

/// Summarize the reviews of one location.
///
/// Identity fields (id, name, postal code, address) come from the first
/// review. Fails with [`TrackerError::EmptyGroup`] for an empty input rather
/// than producing an undefined mean.
pub fn summarize_location<'a, I>(reviews: I) -> Result<LocationSummary>
where
    I: IntoIterator<Item = &'a Review>,
{
    let mut iter = reviews.into_iter();
    let first = iter.next().ok_or(TrackerError::EmptyGroup)?;

    let mut tally = SentimentTally::default();
    tally.add_review(first);
    for review in iter {
        tally.add_review(review);
    }

    let mean_sentiment = tally.mean().ok_or(TrackerError::EmptyGroup)?;
    let centroid = tally.centroid().ok_or(TrackerError::EmptyGroup)?;

    Ok(LocationSummary {
        business_id: first.business_id.clone(),
        name: first.name.clone(),
        postal_code: first.postal_code.clone(),
        address: first.address.clone(),
        centroid,
        positive: tally.positive,
        negative: tally.negative,
        neutral: tally.neutral,
        mean_sentiment,
        total: tally.total(),
    })
}

/// One summary per location of a business, ordered by first appearance.
pub fn summarize_business<'a, I>(reviews: I) -> Result<Vec<LocationSummary>>
where
    I: IntoIterator<Item = &'a Review>,
{
    group_by_location(reviews)
        .into_iter()
        .map(|group| summarize_location(group.reviews))
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn review(id: &str, sentiment: f64) -> Review {
        Review {
            business_id: id.to_string(),
            name: "Sunny Cafe".to_string(),
            city: "Tampa".to_string(),
            categories: Some("Restaurants".to_string()),
            postal_code: format!("336{id}"),
            address: format!("{id} Main St"),
            latitude: 27.0,
            longitude: -82.0,
            sentiment,
        }
    }

    // ── summarize_location ───────────────────────────────────────────────────

    #[test]
    fn test_summarize_location_sunny_cafe_scenario() {
        let reviews: Vec<Review> = [0.5, 0.5, -0.2, 0.0, 0.1]
            .iter()
            .map(|s| review("A", *s))
            .collect();

        let s = summarize_location(&reviews).unwrap();
        assert_eq!(s.positive, 3);
        assert_eq!(s.negative, 1);
        assert_eq!(s.neutral, 1);
        assert_eq!(s.total, 5);
        assert!((s.mean_sentiment - 0.18).abs() < 1e-9, "mean = {}", s.mean_sentiment);
        assert_eq!(s.business_id, "A");
        assert_eq!(s.name, "Sunny Cafe");
    }

    #[test]
    fn test_summarize_location_counts_sum_to_total() {
        let scores = [0.9, -0.9, 0.0, 0.0, 1.0, -1.0, 0.3];
        let reviews: Vec<Review> = scores.iter().map(|s| review("A", *s)).collect();
        let s = summarize_location(&reviews).unwrap();
        assert_eq!(s.positive + s.negative + s.neutral, s.total);
        assert_eq!(s.total, reviews.len());
    }

    #[test]
    fn test_summarize_location_empty_group_errors() {
        let reviews: Vec<Review> = Vec::new();
        let err = summarize_location(&reviews).unwrap_err();
        assert!(matches!(err, TrackerError::EmptyGroup));
    }

    #[test]
    fn test_summarize_location_centroid() {
        let mut a = review("A", 0.1);
        a.latitude = 27.0;
        a.longitude = -82.0;
        let mut b = review("A", 0.1);
        b.latitude = 28.0;
        b.longitude = -81.0;
        let s = summarize_location([&a, &b]).unwrap();
        assert!((s.centroid.latitude - 27.5).abs() < 1e-9);
        assert!((s.centroid.longitude - -81.5).abs() < 1e-9);
    }

    // ── group_by_location ────────────────────────────────────────────────────

    #[test]
    fn test_group_by_location_first_appearance_order() {
        let reviews = vec![
            review("B", 0.1),
            review("A", 0.2),
            review("B", -0.1),
            review("C", 0.0),
            review("A", 0.4),
        ];
        let groups = group_by_location(&reviews);
        let ids: Vec<&str> = groups.iter().map(|g| g.business_id).collect();
        assert_eq!(ids, vec!["B", "A", "C"]);
        assert_eq!(groups[0].reviews.len(), 2);
        assert_eq!(groups[1].reviews.len(), 2);
        assert_eq!(groups[2].reviews.len(), 1);
    }

    // ── summarize_business ───────────────────────────────────────────────────

    #[test]
    fn test_summarize_business_one_summary_per_location() {
        let reviews = vec![
            review("B", 0.5),
            review("A", -0.5),
            review("B", 0.0),
            review("A", -0.1),
            review("C", 0.2),
        ];
        let summaries = summarize_business(&reviews).unwrap();
        let ids: Vec<&str> = summaries.iter().map(|s| s.business_id.as_str()).collect();
        assert_eq!(ids, vec!["B", "A", "C"]);
        assert_eq!(summaries[0].total, 2);
        assert_eq!(summaries[0].positive, 1);
        assert_eq!(summaries[0].neutral, 1);
        assert_eq!(summaries[1].negative, 2);
        assert!((summaries[1].mean_sentiment - -0.3).abs() < 1e-9);
    }

    #[test]
    fn test_summarize_business_empty_input() {
        let reviews: Vec<Review> = Vec::new();
        assert!(summarize_business(&reviews).unwrap().is_empty());
    }

    // ── SentimentTally ───────────────────────────────────────────────────────

    #[test]
    fn test_tally_mean_empty_is_none() {
        assert!(SentimentTally::default().mean().is_none());
    }
}
