//! Domain logic for the adpulse platform.
//!
//! Pure types and functions shared by the repository layer, the alert
//! engine, and the metrics aggregator. This crate has no database or
//! network access; callers fetch data and pass it in.

pub mod alert;
pub mod delivery;
pub mod error;
pub mod metrics;
pub mod rules;
pub mod staging;
pub mod tokens;
pub mod types;
pub mod windows;
