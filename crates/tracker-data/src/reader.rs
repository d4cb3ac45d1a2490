//! CSV loading for the review dataset.
//!
//! Reads the scored review file once, validates its header and every row,
//! and produces an immutable [`Dataset`].

use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};
use tracker_core::models::Review;
use tracker_core::postal::normalize_postal_code;
use tracker_core::sentiment::is_valid_score;
use tracker_core::{Result, TrackerError};

use crate::dataset::Dataset;

/// Columns every dataset must provide. Extra columns are ignored.
pub const REQUIRED_COLUMNS: [&str; 9] = [
    "business_id",
    "name",
    "city",
    "categories",
    "postal_code",
    "address",
    "latitude",
    "longitude",
    "sentiment",
];

/// How strictly rows are validated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Fail on the first invalid row instead of skipping it.
    pub strict: bool,
}

/// Row shape as it appears in the file.
#[derive(Debug, Deserialize)]
struct RawRow {
    business_id: String,
    name: String,
    city: String,
    #[serde(default)]
    categories: Option<String>,
    #[serde(default)]
    postal_code: String,
    #[serde(default)]
    address: String,
    latitude: f64,
    longitude: f64,
    sentiment: f64,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load the dataset at `path`.
pub fn load_dataset(path: &Path, options: LoadOptions) -> Result<Dataset> {
    if !path.exists() {
        return Err(TrackerError::DatasetNotFound(path.to_path_buf()));
    }
    let file = std::fs::File::open(path).map_err(|source| TrackerError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    read_dataset(file, path, options)
}

/// Parse a dataset from any reader. `source` is used for errors and
/// metadata only.
pub fn read_dataset<R: Read>(input: R, source: &Path, options: LoadOptions) -> Result<Dataset> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = rdr.headers()?.clone();
    validate_headers(&headers, source)?;

    let mut reviews: Vec<Review> = Vec::new();
    let mut rows_read = 0u64;
    let mut skipped = 0usize;

    for (idx, record_r) in rdr.records().enumerate() {
        rows_read += 1;
        // Header is line 1.
        let fallback_line = idx as u64 + 2;

        let outcome = match record_r {
            Ok(record) => {
                let line = record
                    .position()
                    .map(|p| p.line())
                    .unwrap_or(fallback_line);
                record
                    .deserialize::<RawRow>(Some(&headers))
                    .map_err(|e| e.to_string())
                    .and_then(into_review)
                    .map_err(|reason| (line, reason))
            }
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => Err((fallback_line, e.to_string())),
        };

        match outcome {
            Ok(review) => reviews.push(review),
            Err((line, reason)) => {
                if options.strict {
                    return Err(TrackerError::InvalidRow { line, reason });
                }
                warn!("Skipping row at line {} of {}: {}", line, source.display(), reason);
                skipped += 1;
            }
        }
    }

    debug!(
        "Dataset {}: {} rows read, {} loaded, {} skipped",
        source.display(),
        rows_read,
        reviews.len(),
        skipped,
    );

    Ok(Dataset::loaded(reviews, source, skipped))
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Reports the first required column absent from `headers`.
fn validate_headers(headers: &csv::StringRecord, source: &Path) -> Result<()> {
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(TrackerError::MissingColumn {
                column: column.to_string(),
                path: source.to_path_buf(),
            });
        }
    }
    Ok(())
}

/// Validate a parsed row and convert it into a [`Review`].
fn into_review(raw: RawRow) -> std::result::Result<Review, String> {
    if raw.business_id.is_empty() {
        return Err("empty business_id".to_string());
    }
    if !is_valid_score(raw.sentiment) {
        return Err(format!("sentiment {} outside [-1, 1]", raw.sentiment));
    }
    if !raw.latitude.is_finite() || !raw.longitude.is_finite() {
        return Err("non-finite coordinates".to_string());
    }

    Ok(Review {
        business_id: raw.business_id,
        name: raw.name,
        city: raw.city,
        categories: raw.categories.filter(|c| !c.is_empty()),
        postal_code: normalize_postal_code(raw.postal_code.as_str()),
        address: raw.address,
        latitude: raw.latitude,
        longitude: raw.longitude,
        sentiment: raw.sentiment,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    // ── Helpers ───────────────────────────────────────────────────────────────

    const HEADER: &str =
        "business_id,name,city,categories,postal_code,address,latitude,longitude,sentiment";

    fn write_csv(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, lines.join("\n")).unwrap();
        path
    }

    fn parse(lines: &[&str], options: LoadOptions) -> Result<Dataset> {
        let body = lines.join("\n");
        read_dataset(body.as_bytes(), Path::new("inline.csv"), options)
    }

    // ── load_dataset ──────────────────────────────────────────────────────────

    #[test]
    fn test_load_dataset_basic() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            dir.path(),
            "reviews.csv",
            &[
                HEADER,
                "b1,Sunny Cafe,Tampa,\"Restaurants, Cafes\",33602.0,1 Main St,27.95,-82.46,0.5",
                "b2,Sunny Cafe,Tampa,Restaurants,33603,2 Bay Rd,27.96,-82.45,-0.2",
            ],
        );

        let ds = load_dataset(&path, LoadOptions::default()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.source(), Some(path.as_path()));
        let first = &ds.reviews()[0];
        assert_eq!(first.business_id, "b1");
        assert_eq!(first.categories.as_deref(), Some("Restaurants, Cafes"));
        assert_eq!(first.postal_code, "33602");
        assert!((first.sentiment - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_load_dataset_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = load_dataset(&dir.path().join("absent.csv"), LoadOptions::default()).unwrap_err();
        assert!(matches!(err, TrackerError::DatasetNotFound(_)));
    }

    // ── Header validation ─────────────────────────────────────────────────────

    #[test]
    fn test_missing_required_column_is_fatal() {
        let err = parse(
            &[
                "business_id,name,city,categories,postal_code,address,latitude,longitude",
                "b1,Cafe,Tampa,Food,33602,1 Main St,27.9,-82.4",
            ],
            LoadOptions::default(),
        )
        .unwrap_err();
        match err {
            TrackerError::MissingColumn { column, .. } => assert_eq!(column, "sentiment"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_extra_columns_ignored() {
        let ds = parse(
            &[
                ",business_id,name,city,stars,categories,postal_code,address,latitude,longitude,sentiment,text",
                "0,b1,Cafe,Tampa,4.5,Food,33602,1 Main St,27.9,-82.4,0.3,Great coffee",
            ],
            LoadOptions::default(),
        )
        .unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.reviews()[0].name, "Cafe");
    }

    // ── Row validation ────────────────────────────────────────────────────────

    #[test]
    fn test_invalid_rows_skipped_in_lenient_mode() {
        let ds = parse(
            &[
                HEADER,
                "b1,Cafe,Tampa,Food,33602,1 Main St,27.9,-82.4,0.3",
                "b2,Cafe,Tampa,Food,33602,1 Main St,27.9,-82.4,1.7",
                "b3,Cafe,Tampa,Food,33602,1 Main St,not-a-number,-82.4,0.1",
                ",Cafe,Tampa,Food,33602,1 Main St,27.9,-82.4,0.1",
                "b5,Cafe,Tampa,Food,33602,1 Main St,27.9,-82.4,nan",
                "b6,Cafe,Tampa",
            ],
            LoadOptions::default(),
        )
        .unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.skipped_rows(), 5);
        assert_eq!(ds.reviews()[0].business_id, "b1");
    }

    #[test]
    fn test_invalid_row_fails_in_strict_mode() {
        let err = parse(
            &[
                HEADER,
                "b1,Cafe,Tampa,Food,33602,1 Main St,27.9,-82.4,0.3",
                "b2,Cafe,Tampa,Food,33602,1 Main St,27.9,-82.4,-1.5",
            ],
            LoadOptions { strict: true },
        )
        .unwrap_err();
        match err {
            TrackerError::InvalidRow { line, reason } => {
                assert_eq!(line, 3);
                assert!(reason.contains("-1.5"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_categories_become_none() {
        let ds = parse(
            &[HEADER, "b1,Cafe,Tampa,,33602,1 Main St,27.9,-82.4,0.0"],
            LoadOptions::default(),
        )
        .unwrap();
        assert!(ds.reviews()[0].categories.is_none());
    }

    #[test]
    fn test_postal_codes_normalized_on_load() {
        let ds = parse(
            &[
                HEADER,
                "b1,Cafe,Tampa,Food,33101.0,1 Main St,27.9,-82.4,0.1",
                "b2,Cafe,Tampa,Food,N/A,2 Main St,27.9,-82.4,0.1",
                "b3,Cafe,Tampa,Food,,3 Main St,27.9,-82.4,0.1",
            ],
            LoadOptions::default(),
        )
        .unwrap();
        let codes: Vec<&str> = ds.reviews().iter().map(|r| r.postal_code.as_str()).collect();
        assert_eq!(codes, vec!["33101", "N/A", ""]);
    }

    #[test]
    fn test_header_only_yields_empty_dataset() {
        let ds = parse(&[HEADER], LoadOptions::default()).unwrap();
        assert!(ds.is_empty());
    }
}
