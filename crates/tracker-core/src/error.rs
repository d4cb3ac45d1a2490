use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the franchise tracker.
#[derive(Error, Debug)]
pub enum TrackerError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV reader rejected the file structure.
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    /// The dataset header lacks one of the required columns.
    #[error("Dataset {path} is missing required column '{column}'")]
    MissingColumn { column: String, path: PathBuf },

    /// A data row failed validation while loading in strict mode.
    #[error("Invalid row at line {line}: {reason}")]
    InvalidRow { line: u64, reason: String },

    /// Summarization was asked to operate on zero reviews.
    #[error("Cannot summarize an empty group of reviews")]
    EmptyGroup,

    /// The dataset file does not exist.
    #[error("Dataset not found: {0}")]
    DatasetNotFound(PathBuf),

    /// No dataset path was given and none could be discovered.
    #[error("No dataset selected; pass --dataset or place florida_with_sentiment.csv in the working directory")]
    NoDatasetSelected,

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A JSON document could not be parsed or produced.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TrackerError {
    /// `true` for failures worth retrying: the file may appear or become
    /// readable on a later attempt. Structural problems with the dataset are
    /// never transient.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            TrackerError::FileRead { .. } | TrackerError::Io(_) | TrackerError::DatasetNotFound(_)
        )
    }
}

/// Convenience alias used throughout the tracker crates.
pub type Result<T> = std::result::Result<T, TrackerError>;
