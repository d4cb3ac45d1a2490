//! Data layer for the franchise tracker.
//!
//! Loads the scored review CSV into an immutable dataset, filters and counts
//! chain locations, aggregates per-location sentiment and runs the top-level
//! pipeline that produces every derived view.

pub mod aggregator;
pub mod analysis;
pub mod dataset;
pub mod pipeline;
pub mod reader;
pub mod views;

pub use tracker_core as core;
