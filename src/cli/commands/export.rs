//! Export command handler

use super::{build_dashboard, output_stem, print_summary};
use crate::args::FilterArgs;
use cohort_analytics::config::Config;
use cohort_analytics::core::export::export_dashboard_csv;
use cohort_analytics::{error, info, verbose};
use std::path::{Path, PathBuf};

/// Run the export command
pub fn run(input_file: &Path, output_dir: Option<&Path>, filters: &FilterArgs, config: &Config) {
    info!("Exporting aggregates for: {}", input_file.display());

    if let Err(e) = export(input_file, output_dir, filters, config) {
        error!("{e}");
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn export(
    input_file: &Path,
    output_dir: Option<&Path>,
    filters: &FilterArgs,
    config: &Config,
) -> Result<(), String> {
    let dashboard = build_dashboard(input_file, filters, config)?;

    let dir = output_dir.map_or_else(|| PathBuf::from(&config.paths.exports_dir), Path::to_path_buf);
    let written = export_dashboard_csv(&dashboard, &dir, &output_stem(input_file))
        .map_err(|e| format!("✗ Failed to export to {}: {e}", dir.display()))?;

    for path in &written {
        verbose!("  wrote {}", path.display());
    }
    println!("✓ Exported {} files to {}", written.len(), dir.display());
    info!("Exported {} CSV files to {}", written.len(), dir.display());

    print_summary(&dashboard);
    Ok(())
}
