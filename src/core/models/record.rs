//! Student record model

use super::{Period, Status};

/// One row of the student table: a single enrollment.
///
/// Derived fields (`entry`, `exit_year`) are `None` until the table is
/// enriched, or when the source cell is empty.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentRecord {
    /// Enrollment number
    pub student_id: String,
    /// Program the student enrolled in
    pub program: String,
    /// Raw `"<year>/<term>"` entry period, when the file has that column
    pub entry_period: Option<String>,
    /// Entry year and term
    pub entry: Option<Period>,
    /// Status label as written in the file
    pub status_label: String,
    /// Recognized status; `None` when the label is outside the table's vocabulary
    pub status: Option<Status>,
    /// Raw `"<year>/<term>"` exit period
    pub exit_period: Option<String>,
    /// Year of the exit period
    pub exit_year: Option<i32>,
    /// Terms between entry and exit
    pub time_to_exit: Option<f64>,
    /// 1-based line of the row in its source file, when loaded from one
    pub line: Option<usize>,
}

impl StudentRecord {
    /// Create a record with the required fields; optional fields start empty.
    #[must_use]
    pub fn new(student_id: &str, program: &str, status_label: &str) -> Self {
        Self {
            student_id: student_id.to_string(),
            program: program.to_string(),
            entry_period: None,
            entry: None,
            status_label: status_label.to_string(),
            status: Status::from_label(status_label),
            exit_period: None,
            exit_year: None,
            time_to_exit: None,
            line: None,
        }
    }

    /// Set the raw entry period
    #[must_use]
    pub fn with_entry_period(mut self, period: &str) -> Self {
        self.entry_period = Some(period.to_string());
        self
    }

    /// Set the raw exit period
    #[must_use]
    pub fn with_exit_period(mut self, period: &str) -> Self {
        self.exit_period = Some(period.to_string());
        self
    }

    /// Set the time to exit, in terms
    #[must_use]
    pub fn with_time_to_exit(mut self, terms: f64) -> Self {
        self.time_to_exit = Some(terms);
        self
    }

    /// Set the source line
    #[must_use]
    pub const fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// Entry year, once known
    #[must_use]
    pub fn entry_year(&self) -> Option<i32> {
        self.entry.map(|p| p.year)
    }

    /// Entry term, once known
    #[must_use]
    pub fn entry_term(&self) -> Option<u8> {
        self.entry.map(|p| p.term)
    }
}
