//! Shared domain layer for the franchise tracker.
//!
//! Review and summary models, the tri-state sentiment classifier, postal
//! code normalization, number formatting, the pipeline request type and
//! CLI settings.

pub mod error;
pub mod formatting;
pub mod models;
pub mod postal;
pub mod request;
pub mod sentiment;
pub mod settings;

pub use error::{Result, TrackerError};
