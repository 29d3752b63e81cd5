//! Dashboard command handler

use super::{build_dashboard, output_stem, print_summary};
use crate::args::FilterArgs;
use cohort_analytics::config::Config;
use cohort_analytics::core::dashboard::formats::ReportFormat;
use cohort_analytics::core::dashboard::DashboardRenderer;
use cohort_analytics::{error, info};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Run the dashboard command
pub fn run(input_file: &Path, output_file: Option<&Path>, format: &str, filters: &FilterArgs, config: &Config) {
    info!("Generating dashboard for: {}", input_file.display());

    if let Err(e) = generate_dashboard(input_file, output_file, format, filters, config) {
        error!("{e}");
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn generate_dashboard(
    input_file: &Path,
    output_file: Option<&Path>,
    format_str: &str,
    filters: &FilterArgs,
    config: &Config,
) -> Result<(), String> {
    let format = ReportFormat::from_str(format_str)
        .map_err(|e| format!("✗ {e}. Use: html or markdown"))?;

    let dashboard = build_dashboard(input_file, filters, config)?;

    let output_path: PathBuf = if let Some(output) = output_file {
        output.to_path_buf()
    } else {
        let reports_dir = PathBuf::from(&config.paths.reports_dir);
        std::fs::create_dir_all(&reports_dir).map_err(|e| {
            format!(
                "✗ Failed to create reports directory {}: {e}",
                reports_dir.display()
            )
        })?;
        reports_dir.join(format!(
            "{}_dashboard.{}",
            output_stem(input_file),
            format.extension()
        ))
    };

    format
        .renderer()
        .generate(&dashboard, &output_path)
        .map_err(|e| format!("✗ Failed to write {format} dashboard: {e}"))?;

    println!("✓ Dashboard generated: {}", output_path.display());
    info!("Dashboard written to: {}", output_path.display());

    print_summary(&dashboard);
    Ok(())
}
