//! Dataset summary statistics

use crate::core::models::{Table, Vocabulary};
use serde::Serialize;
use std::fmt;

/// Headline numbers for a loaded or filtered table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetSummary {
    /// All rows, including unrecognized statuses
    pub rows: usize,
    /// Rows whose status belongs to the vocabulary
    pub recognized: usize,
    /// Rows excluded for an out-of-vocabulary status
    pub unrecognized: usize,
    /// Vocabulary in effect
    pub vocabulary: Vocabulary,
    /// Distinct programs, sorted
    pub programs: Vec<String>,
    /// Earliest entry year, if any row has one
    pub first_year: Option<i32>,
    /// Latest entry year, if any row has one
    pub last_year: Option<i32>,
}

impl DatasetSummary {
    /// Compute the summary of `table`
    #[must_use]
    pub fn from_table(table: &Table) -> Self {
        let unrecognized = table.unrecognized_count();
        let years = table.entry_years();
        Self {
            rows: table.len(),
            recognized: table.len() - unrecognized,
            unrecognized,
            vocabulary: table.vocabulary(),
            programs: table.programs().into_iter().collect(),
            first_year: years.first().copied(),
            last_year: years.last().copied(),
        }
    }

    /// `"2014-2021"`, a single year, or `"-"` without entry years
    #[must_use]
    pub fn year_range(&self) -> String {
        match (self.first_year, self.last_year) {
            (Some(first), Some(last)) if first == last => first.to_string(),
            (Some(first), Some(last)) => format!("{first}-{last}"),
            _ => "-".to_string(),
        }
    }
}

impl fmt::Display for DatasetSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rows ({} excluded), {} programs, entry years {}, vocabulary '{}'",
            self.rows,
            self.unrecognized,
            self.programs.len(),
            self.year_range(),
            self.vocabulary
        )
    }
}
