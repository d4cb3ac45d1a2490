//! Tri-state sentiment classification shared by every consumer.
//!
//! Map markers, percentage breakdowns and histogram styling all call
//! [`SentimentClass::classify`]; nothing else compares scores against zero.

use serde::{Deserialize, Serialize};

/// Polarity class of a sentiment score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentClass {
    /// Score strictly above zero.
    Positive,
    /// Score strictly below zero.
    Negative,
    /// Score exactly zero.
    Neutral,
}

impl SentimentClass {
    /// All classes in display order.
    pub const ALL: [SentimentClass; 3] = [
        SentimentClass::Positive,
        SentimentClass::Negative,
        SentimentClass::Neutral,
    ];

    /// Classify a polarity score. Exact zero (including `-0.0`) is neutral.
    pub fn classify(score: f64) -> Self {
        if score > 0.0 {
            SentimentClass::Positive
        } else if score < 0.0 {
            SentimentClass::Negative
        } else {
            SentimentClass::Neutral
        }
    }

    /// Marker color used by map consumers.
    pub fn color(self) -> &'static str {
        match self {
            SentimentClass::Positive => "green",
            SentimentClass::Negative => "red",
            SentimentClass::Neutral => "gray",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SentimentClass::Positive => "positive",
            SentimentClass::Negative => "negative",
            SentimentClass::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for SentimentClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// `true` when `score` is a finite value inside the closed range `[-1, 1]`.
pub fn is_valid_score(score: f64) -> bool {
    score.is_finite() && (-1.0..=1.0).contains(&score)
}
