use serde::{Deserialize, Serialize};

use crate::models::Coordinates;

/// Default number of locations a chain must exceed to be drilled into.
pub const DEFAULT_FRANCHISE_THRESHOLD: usize = 2;

/// Geographic center of Florida, used for the overview map.
pub const DEFAULT_STATE_CENTER: Coordinates = Coordinates {
    latitude: 27.9944024,
    longitude: -81.7602544,
};

/// Which locations of the drill-down business to detail.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "by", content = "value", rename_all = "snake_case")]
pub enum LocationSelector {
    #[default]
    All,
    PostalCode(String),
    Address(String),
    BusinessId(String),
}

/// One filter submission. The pipeline reads nothing else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineRequest {
    pub city: String,
    pub category: String,
    /// Optional name filter; an empty string is treated as absent.
    #[serde(default)]
    pub business_name: Option<String>,
    pub threshold: usize,
    /// Business to drill into; falls back to the first candidate.
    #[serde(default)]
    pub selected_business: Option<String>,
    #[serde(default)]
    pub location: LocationSelector,
    pub state_center: Coordinates,
}

impl PipelineRequest {
    pub fn new(city: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            category: category.into(),
            business_name: None,
            threshold: DEFAULT_FRANCHISE_THRESHOLD,
            selected_business: None,
            location: LocationSelector::All,
            state_center: DEFAULT_STATE_CENTER,
        }
    }

    pub fn with_business_name(mut self, name: impl Into<String>) -> Self {
        self.business_name = Some(name.into());
        self
    }

    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_selected_business(mut self, name: impl Into<String>) -> Self {
        self.selected_business = Some(name.into());
        self
    }

    pub fn with_location(mut self, location: LocationSelector) -> Self {
        self.location = location;
        self
    }

    /// The name filter, or `None` when absent or blank.
    pub fn name_filter(&self) -> Option<&str> {
        self.business_name.as_deref().filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let req = PipelineRequest::new("Tampa", "restaurant");
        assert_eq!(req.threshold, 2);
        assert_eq!(req.location, LocationSelector::All);
        assert!(req.name_filter().is_none());
        assert!((req.state_center.latitude - 27.9944024).abs() < 1e-9);
    }

    #[test]
    fn test_blank_name_filter_is_absent() {
        let req = PipelineRequest::new("Tampa", "restaurant").with_business_name("");
        assert!(req.name_filter().is_none());
        let req = req.with_business_name("Sunny");
        assert_eq!(req.name_filter(), Some("Sunny"));
    }

    #[test]
    fn test_location_selector_serde_shape() {
        let js = serde_json::to_value(LocationSelector::PostalCode("33602".to_string())).unwrap();
        assert_eq!(js, serde_json::json!({"by": "postal_code", "value": "33602"}));
        let all = serde_json::to_value(LocationSelector::All).unwrap();
        assert_eq!(all, serde_json::json!({"by": "all"}));
    }
}
