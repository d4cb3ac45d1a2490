use serde::{Deserialize, Serialize};

use crate::sentiment::SentimentClass;

/// A single customer review row from the sentiment dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    /// Stable identifier of the physical location the review belongs to.
    pub business_id: String,
    /// Chain / brand name; repeats across locations.
    pub name: String,
    pub city: String,
    /// Free-text, comma-separated category tags. `None` when the source cell
    /// was empty.
    #[serde(default)]
    pub categories: Option<String>,
    /// Postal code, already normalized (see [`crate::postal`]).
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Polarity score in `[-1.0, 1.0]`, computed upstream.
    pub sentiment: f64,
}

impl Review {
    /// Tri-state class of this review's sentiment.
    pub fn class(&self) -> SentimentClass {
        SentimentClass::classify(self.sentiment)
    }

    /// Case-insensitive substring match against the category tags.
    ///
    /// A review without tags never matches, even for an empty needle.
    pub fn has_category(&self, needle_lower: &str) -> bool {
        match self.categories.as_deref() {
            Some(tags) => tags.to_lowercase().contains(needle_lower),
            None => false,
        }
    }

    /// Case-insensitive substring match against the business name.
    pub fn name_contains(&self, needle_lower: &str) -> bool {
        self.name.to_lowercase().contains(needle_lower)
    }
}

/// A geographic point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Arithmetic mean of the given points, or `None` for an empty input.
    pub fn centroid<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Coordinates>,
    {
        let mut count = 0usize;
        let mut lat = 0.0;
        let mut lon = 0.0;
        for p in points {
            lat += p.latitude;
            lon += p.longitude;
            count += 1;
        }
        if count == 0 {
            return None;
        }
        Some(Self::new(lat / count as f64, lon / count as f64))
    }
}

/// Number of distinct locations counted for one business name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessCount {
    pub name: String,
    pub franchisee_count: usize,
}

/// Sentiment statistics for one physical location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSummary {
    pub business_id: String,
    pub name: String,
    pub postal_code: String,
    pub address: String,
    /// Mean latitude / longitude across the location's reviews.
    pub centroid: Coordinates,
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
    pub mean_sentiment: f64,
    pub total: usize,
}

impl LocationSummary {
    /// Number of reviews falling into `class`.
    pub fn count_for(&self, class: SentimentClass) -> usize {
        match class {
            SentimentClass::Positive => self.positive,
            SentimentClass::Negative => self.negative,
            SentimentClass::Neutral => self.neutral,
        }
    }

    /// Class of the location's mean sentiment, used for marker coloring.
    pub fn mean_class(&self) -> SentimentClass {
        SentimentClass::classify(self.mean_sentiment)
    }
}
