//! Shared library for `CohortAnalytics`
//!
//! Loads student enrollment CSV files, filters them by program, entry year
//! and status, and computes the grouped aggregates behind the cohort
//! dashboard. The `cohortanalytics` binary wraps this library.

pub mod core;
pub mod shared;

pub use self::core::config;
pub use self::core::{CohortError, Result};
pub use ::logger::{debug, error, info, verbose, warn};
pub use shared::get_version;
