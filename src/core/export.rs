//! Export dashboard panels and filtered rows as CSV

use crate::core::dashboard::{record_cells, Dashboard, PanelTable, RECORD_HEADERS};
use crate::core::error::Result;
use crate::core::models::StudentRecord;
use logger::{debug, warn};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Trait for exporting a dashboard's data in different formats
pub trait DashboardExporter {
    /// Export every available panel plus the filtered rows into `dir`.
    ///
    /// Files are named `<stem>_<panel id>` and `<stem>_filtered` with the
    /// exporter's extension. Returns the paths written, in panel order.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created or a file fails
    /// to write
    fn export(&self, dashboard: &Dashboard, dir: &Path, stem: &str) -> Result<Vec<PathBuf>>;
}

/// Writes one CSV file per panel
#[derive(Debug, Default, Clone, Copy)]
pub struct CsvExporter;

impl DashboardExporter for CsvExporter {
    fn export(&self, dashboard: &Dashboard, dir: &Path, stem: &str) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(dir)?;
        let mut written = Vec::new();

        for panel in &dashboard.panels {
            let Some(table) = panel.table() else {
                warn!("Skipping export of unavailable panel '{}'", panel.id);
                continue;
            };
            let path = dir.join(format!("{stem}_{}.csv", panel.id));
            write_panel_csv(table, File::create(&path)?)?;
            debug!("Exported panel '{}' to {}", panel.id, path.display());
            written.push(path);
        }

        let path = dir.join(format!("{stem}_filtered.csv"));
        write_records_csv(dashboard.records(), File::create(&path)?)?;
        debug!("Exported filtered rows to {}", path.display());
        written.push(path);

        Ok(written)
    }
}

/// Write one panel's rows with a header line.
///
/// # Errors
/// Returns `Csv` if writing fails
pub fn write_panel_csv<W: Write>(table: &PanelTable, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(&table.headers)?;
    for row in &table.rows {
        csv_writer.write_record(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write student rows using the canonical column names.
///
/// # Errors
/// Returns `Csv` if writing fails
pub fn write_records_csv<W: Write>(records: &[StudentRecord], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(RECORD_HEADERS)?;
    for record in records {
        csv_writer.write_record(record_cells(record))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Convenience function to export with the default CSV exporter
///
/// # Errors
/// See [`DashboardExporter::export`]
pub fn export_dashboard_csv<P: AsRef<Path>>(
    dashboard: &Dashboard,
    dir: P,
    stem: &str,
) -> Result<Vec<PathBuf>> {
    CsvExporter.export(dashboard, dir.as_ref(), stem)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dashboard::DashboardSettings;
    use crate::core::dataset::{enrich, read_table_from, LoadOptions, PeriodPolicy};
    use crate::core::filter::Selection;

    #[test]
    fn panel_csv_has_header_and_rows() {
        let table = PanelTable {
            headers: vec!["program".into(), "total".into()],
            rows: vec![vec!["Physics, Applied".into(), "3".into()]],
            values: serde_json::json!([]),
        };
        let mut buffer = Vec::new();
        write_panel_csv(&table, &mut buffer).expect("write");
        let text = String::from_utf8(buffer).expect("utf8");
        assert_eq!(text, "program,total\n\"Physics, Applied\",3\n");
    }

    #[test]
    fn exports_available_panels_only() {
        let csv = "student_id,program,entry_period,status\n1,P1,2020/1,Active\n2,P2,2021/2,Active\n";
        let mut table = read_table_from(csv.as_bytes(), &LoadOptions::default()).expect("read");
        enrich(&mut table, PeriodPolicy::Strict).expect("enrich");
        let selection = Selection::all(&table).with_programs(["P1"]);
        let dashboard =
            Dashboard::build(&table, &selection, &DashboardSettings::default()).expect("build");

        let dir = tempfile::tempdir().expect("tempdir");
        let written = export_dashboard_csv(&dashboard, dir.path(), "cohort").expect("export");

        let names: Vec<String> = written
            .iter()
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect();
        assert!(names.contains(&"cohort_intake.csv".to_string()));
        assert!(!names.contains(&"cohort_time_to_exit.csv".to_string()));
        assert_eq!(names.last().map(String::as_str), Some("cohort_filtered.csv"));

        let filtered = fs::read_to_string(dir.path().join("cohort_filtered.csv")).expect("read");
        assert_eq!(
            filtered,
            "student_id,program,entry_period,status,exit_period,time_to_exit\n1,P1,2020/1,Active,,\n"
        );
    }
}
