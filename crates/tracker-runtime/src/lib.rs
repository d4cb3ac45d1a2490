//! Runtime layer for the franchise tracker.
//!
//! Owns the loaded dataset handle and the request/response session that
//! recomputes derived views on every submission.

pub mod data_manager;
pub mod session;

pub use tracker_core as core;
pub use tracker_data as data;
