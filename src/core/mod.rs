//! Core cohort analytics: loading, filtering, aggregation and output

pub mod aggregates;
pub mod config;
pub mod dashboard;
pub mod dataset;
pub mod error;
pub mod export;
pub mod filter;
pub mod models;
pub mod summary;

pub use error::{CohortError, Result};
