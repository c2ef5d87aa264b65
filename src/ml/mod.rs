//! Machine learning building blocks used by the prediction pipeline.
//!
//! The random forest is implemented in-crate with explicit seeding;
//! `metrics` scores a fitted model against held-out rows.

pub mod forest;
pub mod metrics;
