//! Dataset loading and enrichment
//!
//! [`load_dataset`] reads an enrollment CSV into an owned [`Table`] and runs
//! [`enrich`] on it, so callers get entry year/term and exit year columns
//! regardless of whether the file stored them pre-split.
//!
//! [`Table`]: crate::core::models::Table

pub mod csv_loader;
pub mod enrich;

pub use csv_loader::{load_dataset, read_table, read_table_from, ColumnMapping, LoadOptions};
pub use enrich::{derive_entry_columns, derive_exit_year, enrich, PeriodPolicy};
