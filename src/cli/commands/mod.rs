//! CLI command handlers for `CohortAnalytics`.
//!
//! Each command is implemented in its own submodule. The data commands share
//! the loading and dashboard-building steps below.

pub mod config;
pub mod dashboard;
pub mod export;

use crate::args::FilterArgs;
use cohort_analytics::config::Config;
use cohort_analytics::core::dashboard::{Dashboard, DashboardSettings};
use cohort_analytics::core::dataset::load_dataset;
use cohort_analytics::core::models::Table;
use cohort_analytics::{debug, info};
use std::path::Path;

/// Load the dataset named on the command line using the configured column
/// mapping, vocabulary and period policy
fn load_table(input_file: &Path, config: &Config) -> Result<Table, String> {
    let options = config
        .load_options()
        .map_err(|e| format!("✗ {e}"))?;
    debug!("Load options: {options:?}");

    load_dataset(input_file, &options)
        .map_err(|e| format!("✗ Failed to load {}: {e}", input_file.display()))
}

/// Load, filter and aggregate in one step
fn build_dashboard(input_file: &Path, filters: &FilterArgs, config: &Config) -> Result<Dashboard, String> {
    let table = load_table(input_file, config)?;
    let selection = filters
        .selection(&table)
        .map_err(|e| format!("✗ Invalid filter: {e}"))?;

    let settings = DashboardSettings {
        min_year: config.min_year(),
        ..DashboardSettings::default()
    };
    let dashboard = Dashboard::build(&table, &selection, &settings)
        .map_err(|e| format!("✗ Failed to build dashboard: {e}"))?;

    info!(
        "Dashboard built for {}: {} of {} rows selected",
        input_file.display(),
        dashboard.filtered.rows,
        dashboard.dataset.rows
    );
    Ok(dashboard)
}

/// File stem used to name generated outputs
fn output_stem(input_file: &Path) -> String {
    input_file
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("cohort")
        .to_string()
}

/// Print a summary of the dashboard
fn print_summary(dashboard: &Dashboard) {
    println!("\n=== Summary ===");
    println!("Dataset: {}", dashboard.dataset);
    println!("Selected: {}", dashboard.filtered);

    let unavailable: Vec<&str> = dashboard
        .panels
        .iter()
        .filter(|panel| panel.error().is_some())
        .map(|panel| panel.title)
        .collect();
    if !unavailable.is_empty() {
        println!("⚠️  {} panels unavailable: {}", unavailable.len(), unavailable.join(", "));
    }
}
