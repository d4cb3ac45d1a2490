use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Result, TrackerError};
use crate::models::Coordinates;
use crate::request::{LocationSelector, PipelineRequest, DEFAULT_FRANCHISE_THRESHOLD};

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Customer sentiment across franchise locations
#[derive(Parser, Debug, Clone)]
#[command(
    name = "franchise-tracker",
    about = "Customer sentiment across franchise locations",
    version
)]
pub struct Settings {
    /// Review dataset (CSV with a precomputed sentiment column)
    #[arg(long, env = "FRANCHISE_TRACKER_DATASET")]
    pub dataset: Option<PathBuf>,

    /// City to search (exact match)
    #[arg(long)]
    pub city: Option<String>,

    /// Business category, e.g. restaurant, coffee, healthcare
    #[arg(long)]
    pub category: Option<String>,

    /// Narrow the search to business names containing this text
    #[arg(long)]
    pub business_name: Option<String>,

    /// Chains need more than this many locations for a drill-down
    #[arg(long, default_value_t = DEFAULT_FRANCHISE_THRESHOLD)]
    pub threshold: usize,

    /// Chain to analyse in detail (defaults to the largest one)
    #[arg(long)]
    pub business: Option<String>,

    /// Detail only the location(s) with this postal code
    #[arg(long, conflicts_with_all = ["address", "location_id"])]
    pub postal_code: Option<String>,

    /// Detail only the location at this street address
    #[arg(long, conflicts_with = "location_id")]
    pub address: Option<String>,

    /// Detail only the location with this business identifier
    #[arg(long)]
    pub location_id: Option<String>,

    /// Overview map center as LAT,LON
    #[arg(long, default_value = "27.9944024,-81.7602544")]
    pub state_center: String,

    /// Output format
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub format: String,

    /// List the cities present in the dataset and exit
    #[arg(long)]
    pub list_cities: bool,

    /// Abort loading on the first invalid row instead of skipping it
    #[arg(long)]
    pub strict: bool,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Clear saved search parameters
    #[arg(long)]
    pub clear: bool,
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Persisted search parameters saved to `~/.franchise-tracker/last_used.json`.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,
}

impl LastUsedParams {
    /// Return the default path to the persisted config file.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Return the config path rooted at `base_dir` (used for testing).
    pub fn config_path_in(base_dir: &std::path::Path) -> PathBuf {
        base_dir.join(".franchise-tracker").join("last_used.json")
    }

    /// Load persisted params from an explicit path.
    /// Returns `Default` when the file is absent or cannot be parsed.
    pub fn load_from(path: &std::path::Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        match serde_json::from_str(&content) {
            Ok(params) => params,
            Err(e) => {
                tracing::warn!("Ignoring unreadable {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Atomically write params to an explicit path.
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the config file at an explicit path if it exists.
    pub fn clear_at(path: &std::path::Path) -> Result<()> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments, fill unset search fields from the last run, and
    /// persist the result.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// Full implementation; accepts args and an explicit config path so that
    /// tests can redirect to a temporary directory.
    pub fn load_with_last_used_impl(
        args: Vec<std::ffi::OsString>,
        config_path: &std::path::Path,
    ) -> Self {
        let mut settings = Settings::parse_from(args);

        if settings.clear {
            if let Err(e) = LastUsedParams::clear_at(config_path) {
                tracing::warn!("Failed to clear {}: {}", config_path.display(), e);
            }
            return settings.resolve_debug();
        }

        let last = LastUsedParams::load_from(config_path);

        // Options without defaults are `None` only when neither the command
        // line nor the environment set them.
        if settings.dataset.is_none() {
            settings.dataset = last.dataset;
        }
        if settings.city.is_none() {
            settings.city = last.city;
        }
        if settings.category.is_none() {
            settings.category = last.category;
        }
        if settings.business_name.is_none() {
            settings.business_name = last.business_name;
        }

        settings = settings.resolve_debug();

        if let Err(e) = LastUsedParams::from(&settings).save_to(config_path) {
            tracing::debug!("Could not persist last-used params: {}", e);
        }

        settings
    }

    /// `--debug` overrides the log level.
    fn resolve_debug(mut self) -> Self {
        if self.debug {
            self.log_level = "DEBUG".to_string();
        }
        self
    }

    /// The location selector implied by the mutually exclusive flags.
    pub fn location_selector(&self) -> LocationSelector {
        if let Some(pc) = &self.postal_code {
            LocationSelector::PostalCode(pc.clone())
        } else if let Some(addr) = &self.address {
            LocationSelector::Address(addr.clone())
        } else if let Some(id) = &self.location_id {
            LocationSelector::BusinessId(id.clone())
        } else {
            LocationSelector::All
        }
    }

    /// Build the pipeline request for this invocation.
    ///
    /// City and category are both required.
    pub fn to_request(&self) -> Result<PipelineRequest> {
        let city = self
            .city
            .clone()
            .filter(|c| !c.is_empty())
            .ok_or_else(|| TrackerError::Config("a city is required (--city)".to_string()))?;
        let category = self
            .category
            .clone()
            .filter(|c| !c.is_empty())
            .ok_or_else(|| {
                TrackerError::Config("a business category is required (--category)".to_string())
            })?;

        Ok(PipelineRequest {
            city,
            category,
            business_name: self.business_name.clone().filter(|n| !n.is_empty()),
            threshold: self.threshold,
            selected_business: self.business.clone(),
            location: self.location_selector(),
            state_center: parse_state_center(&self.state_center)?,
        })
    }
}

// ── Conversion ─────────────────────────────────────────────────────────────────

impl From<&Settings> for LastUsedParams {
    fn from(s: &Settings) -> Self {
        LastUsedParams {
            dataset: s.dataset.clone(),
            city: s.city.clone(),
            category: s.category.clone(),
            business_name: s.business_name.clone().filter(|n| !n.is_empty()),
        }
    }
}

/// Parse a `LAT,LON` pair.
pub fn parse_state_center(value: &str) -> Result<Coordinates> {
    let invalid = || TrackerError::Config(format!("invalid state center '{}', expected LAT,LON", value));

    let (lat, lon) = value.split_once(',').ok_or_else(invalid)?;
    let latitude: f64 = lat.trim().parse().map_err(|_| invalid())?;
    let longitude: f64 = lon.trim().parse().map_err(|_| invalid())?;

    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(invalid());
    }
    Ok(Coordinates::new(latitude, longitude))
}

// ── Tests ──────────────────────────────────────────────────────────────────────
