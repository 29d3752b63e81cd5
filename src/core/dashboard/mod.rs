//! Dashboard assembly and rendering
//!
//! A [`Dashboard`] is the filtered table plus one [`Panel`] per aggregate.
//! Each panel owns either its result rows or the error that aggregate hit,
//! so one missing column disables one chart instead of the whole page.

pub mod chart;
pub mod formats;

use crate::core::aggregates::{self, AggregateRow};
use crate::core::error::{CohortError, Result};
use crate::core::filter::{filter, Selection};
use crate::core::models::{StudentRecord, Table};
use crate::core::summary::DatasetSummary;
use logger::{debug, warn};
use serde_json::Value;
use std::path::Path;

pub use chart::{Axis, ChartSpec, FieldType, Mark};
pub use formats::{HtmlRenderer, MarkdownRenderer, ReportFormat};

/// Which table a panel aggregates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    /// The rows left after filtering
    Filtered,
    /// Every row of the dataset, ignoring the filters
    Full,
}

impl DataSource {
    /// Short label shown next to the panel title
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Filtered => "filtered",
            Self::Full => "all students",
        }
    }
}

/// Rows of one aggregate, as display cells and as JSON values
#[derive(Debug, Clone, PartialEq)]
pub struct PanelTable {
    /// Column headers
    pub headers: Vec<String>,
    /// Display cells per row
    pub rows: Vec<Vec<String>>,
    /// JSON array of the rows, fed to the chart
    pub values: Value,
}

impl PanelTable {
    /// Build from aggregate rows
    ///
    /// # Errors
    /// Returns `Json` if the rows cannot be serialized.
    pub fn from_rows<R: AggregateRow>(rows: &[R]) -> Result<Self> {
        Ok(Self {
            headers: R::HEADERS.iter().map(ToString::to_string).collect(),
            rows: rows.iter().map(AggregateRow::cells).collect(),
            values: serde_json::to_value(rows)?,
        })
    }

    /// Whether the aggregate produced no rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One aggregate bound to one chart
#[derive(Debug)]
pub struct Panel {
    /// Stable identifier, used for file names and HTML ids
    pub id: &'static str,
    /// Human-readable title
    pub title: &'static str,
    /// Table the aggregate ran on
    pub source: DataSource,
    /// Chart layout
    pub chart: ChartSpec,
    /// Aggregate rows, or why they could not be computed
    pub outcome: Result<PanelTable>,
}

impl Panel {
    fn new<R: AggregateRow>(
        id: &'static str,
        title: &'static str,
        source: DataSource,
        chart: ChartSpec,
        rows: Result<Vec<R>>,
    ) -> Self {
        let outcome = rows.and_then(|rows| PanelTable::from_rows(&rows));
        match &outcome {
            Ok(table) => debug!("Panel '{id}': {} rows", table.rows.len()),
            Err(e) => warn!("Panel '{id}' unavailable: {e}"),
        }
        Self {
            id,
            title,
            source,
            chart,
            outcome,
        }
    }

    /// Result rows, if the aggregate succeeded
    #[must_use]
    pub fn table(&self) -> Option<&PanelTable> {
        self.outcome.as_ref().ok()
    }

    /// The aggregate's error, if it failed
    #[must_use]
    pub fn error(&self) -> Option<&CohortError> {
        self.outcome.as_ref().err()
    }

    /// Vega-Lite document, if the aggregate succeeded
    #[must_use]
    pub fn vega_lite(&self) -> Option<Value> {
        self.table()
            .map(|table| self.chart.to_vega_lite(self.title, &table.values))
    }
}

/// Knobs for dashboard assembly
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSettings {
    /// Page title
    pub title: String,
    /// First entry year shown by the yearly evolution panel
    pub min_year: Option<i32>,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            title: "Student Cohort Dashboard".to_string(),
            min_year: Some(2014),
        }
    }
}

/// Everything a renderer needs
#[derive(Debug)]
pub struct Dashboard {
    /// Page title
    pub title: String,
    /// Summary of the full dataset
    pub dataset: DatasetSummary,
    /// Summary of the filtered rows
    pub filtered: DatasetSummary,
    /// Filters in effect
    pub selection: Selection,
    /// Panels in display order
    pub panels: Vec<Panel>,
    /// Filtered table, shown as the raw data table
    pub table: Table,
}

impl Dashboard {
    /// Filter `table` with `selection` and compute every panel.
    ///
    /// `table` must be the enriched, unfiltered dataset: cohort-wide panels
    /// aggregate it directly.
    ///
    /// # Errors
    /// Returns `MissingColumn(entry_year)` if `table` was not enriched.
    /// Aggregate failures do not fail the build; they are kept per panel.
    pub fn build(table: &Table, selection: &Selection, settings: &DashboardSettings) -> Result<Self> {
        let filtered = filter(table, selection)?;
        let panels = build_panels(table, &filtered, settings.min_year);

        let failed = panels.iter().filter(|p| p.error().is_some()).count();
        debug!(
            "Dashboard built: {} panels ({failed} unavailable), {} filtered rows",
            panels.len(),
            filtered.len()
        );

        Ok(Self {
            title: settings.title.clone(),
            dataset: DatasetSummary::from_table(table),
            filtered: DatasetSummary::from_table(&filtered),
            selection: selection.clone(),
            panels,
            table: filtered,
        })
    }

    /// Look up a panel by id
    #[must_use]
    pub fn panel(&self, id: &str) -> Option<&Panel> {
        self.panels.iter().find(|p| p.id == id)
    }

    /// Rows of the raw data table
    #[must_use]
    pub fn records(&self) -> &[StudentRecord] {
        self.table.records()
    }
}

/// Headers of the raw data table
pub const RECORD_HEADERS: [&str; 6] = [
    "student_id",
    "program",
    "entry_period",
    "status",
    "exit_period",
    "time_to_exit",
];

/// Display cells of one raw row, in [`RECORD_HEADERS`] order
#[must_use]
pub fn record_cells(record: &StudentRecord) -> [String; 6] {
    let entry = record
        .entry
        .map(|p| p.to_string())
        .or_else(|| record.entry_period.clone())
        .unwrap_or_default();
    [
        record.student_id.clone(),
        record.program.clone(),
        entry,
        record.status_label.clone(),
        record.exit_period.clone().unwrap_or_default(),
        record
            .time_to_exit
            .map(|t| t.to_string())
            .unwrap_or_default(),
    ]
}

#[allow(clippy::too_many_lines)]
fn build_panels(full: &Table, filtered: &Table, min_year: Option<i32>) -> Vec<Panel> {
    use DataSource::{Filtered, Full};
    use FieldType::{Nominal, Ordinal, Quantitative};

    let students = Axis::new("total", Quantitative, "Students");
    let program = Axis::new("program", Nominal, "Program");

    vec![
        Panel::new(
            "intake",
            "Intake by entry period",
            Filtered,
            ChartSpec::line(Axis::new("period", Ordinal, "Entry period"), students)
                .tooltip(&["period", "total"]),
            aggregates::intake_by_period(filtered),
        ),
        Panel::new(
            "status_by_program",
            "Status distribution by program",
            Filtered,
            ChartSpec::bar(program, students)
                .color("status")
                .tooltip(&["program", "status", "total"]),
            aggregates::status_by_program(filtered),
        ),
        Panel::new(
            "exit_rate",
            "Exit rate by program (%)",
            Filtered,
            ChartSpec::bar(program, Axis::new("rate", Quantitative, "Exit rate (%)"))
                .tooltip(&["program", "exited", "active", "rate"]),
            aggregates::exit_rate_by_program(filtered),
        ),
        Panel::new(
            "time_to_exit",
            "Mean time to exit by program (terms)",
            Filtered,
            ChartSpec::bar(program, Axis::new("mean_terms", Quantitative, "Terms"))
                .tooltip(&["program", "mean_terms", "students"]),
            aggregates::mean_time_to_exit_by_program(filtered),
        ),
        Panel::new(
            "time_to_exit_by_status",
            "Mean time to exit by program and status (terms)",
            Filtered,
            ChartSpec::bar(program, Axis::new("mean_terms", Quantitative, "Terms"))
                .color("status")
                .tooltip(&["program", "status", "mean_terms", "students"]),
            aggregates::mean_time_to_exit_by_program_status(filtered),
        ),
        Panel::new(
            "graduates_by_year",
            "Graduates by program and graduation year",
            Filtered,
            ChartSpec::line(
                Axis::new("exit_year", Ordinal, "Graduation year"),
                Axis::new("graduates", Quantitative, "Graduates"),
            )
            .color("program")
            .tooltip(&["program", "exit_year", "graduates"]),
            aggregates::graduates_by_exit_year(filtered),
        ),
        Panel::new(
            "graduation",
            "Graduation proportion by program (%)",
            Full,
            ChartSpec::bar(program, Axis::new("proportion", Quantitative, "Graduated (%)"))
                .tooltip(&["program", "graduated", "total", "proportion"]),
            aggregates::graduation_by_program(full),
        ),
        Panel::new(
            "yearly_status",
            "Status by entry year",
            Full,
            ChartSpec::bar(Axis::new("year", Ordinal, "Entry year"), students)
                .color("status")
                .tooltip(&["year", "status", "total"]),
            aggregates::yearly_status_evolution(full, min_year),
        ),
        Panel::new(
            "exit_trend",
            "Exits by year",
            Full,
            ChartSpec::line(Axis::new("exit_year", Ordinal, "Exit year"), students)
                .color("status")
                .tooltip(&["exit_year", "status", "total"]),
            aggregates::exit_year_trend(full),
        ),
        Panel::new(
            "term_distribution",
            "Entry term distribution",
            Full,
            ChartSpec::bar(Axis::new("entry_term", Ordinal, "Entry term"), students)
                .tooltip(&["entry_term", "total"]),
            aggregates::term_distribution(full),
        ),
    ]
}

/// Renders a dashboard into one output format
pub trait DashboardRenderer {
    /// Render the dashboard to a file
    ///
    /// # Errors
    /// Returns an error if rendering or file writing fails
    fn generate(&self, dashboard: &Dashboard, output_path: &Path) -> Result<()> {
        let content = self.render(dashboard)?;
        std::fs::write(output_path, content)?;
        Ok(())
    }

    /// Render the dashboard to a string
    ///
    /// # Errors
    /// Returns an error if rendering fails
    fn render(&self, dashboard: &Dashboard) -> Result<String>;
}
