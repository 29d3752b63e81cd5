//! Categorical row filtering by program, entry year and status

use crate::core::error::Result;
use crate::core::models::{Column, Status, Table};
use logger::debug;
use std::collections::BTreeSet;

/// The three allow-lists applied by [`filter`].
///
/// An empty set selects nothing. A value that does not occur in the data
/// simply matches no rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Programs to keep
    pub programs: BTreeSet<String>,
    /// Entry years to keep
    pub years: BTreeSet<i32>,
    /// Statuses to keep
    pub statuses: BTreeSet<Status>,
}

impl Selection {
    /// Default selection for `table`: every program and entry year present,
    /// and the table's whole status vocabulary.
    ///
    /// Pass the unfiltered table so the options reflect the loaded data.
    #[must_use]
    pub fn all(table: &Table) -> Self {
        Self {
            programs: table.programs(),
            years: table.entry_years(),
            statuses: table.vocabulary().statuses().iter().copied().collect(),
        }
    }

    /// Replace the program allow-list
    #[must_use]
    pub fn with_programs<I, S>(mut self, programs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.programs = programs.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the entry-year allow-list
    #[must_use]
    pub fn with_years<I>(mut self, years: I) -> Self
    where
        I: IntoIterator<Item = i32>,
    {
        self.years = years.into_iter().collect();
        self
    }

    /// Replace the status allow-list
    #[must_use]
    pub fn with_statuses<I>(mut self, statuses: I) -> Self
    where
        I: IntoIterator<Item = Status>,
    {
        self.statuses = statuses.into_iter().collect();
        self
    }

    /// Whether any of the three lists is empty (the filter selects nothing)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.programs.is_empty() || self.years.is_empty() || self.statuses.is_empty()
    }
}

/// Keep rows where `program ∈ programs`, `entry_year ∈ years` and
/// `status ∈ statuses`.
///
/// Rows whose status is outside the table's vocabulary never match. The
/// result is a new table with the same columns and vocabulary, so it can be
/// filtered again; filtering twice with the same selection changes nothing.
///
/// # Errors
/// Returns `MissingColumn(entry_year)` if the table has not been enriched.
pub fn filter(table: &Table, selection: &Selection) -> Result<Table> {
    table.require(Column::EntryYear)?;

    let rows = table
        .records()
        .iter()
        .filter(|record| selection.programs.contains(&record.program))
        .filter(|record| {
            record
                .entry_year()
                .is_some_and(|year| selection.years.contains(&year))
        })
        .filter(|record| {
            record
                .status
                .is_some_and(|status| selection.statuses.contains(&status))
        })
        .cloned()
        .collect::<Vec<_>>();

    debug!("Filter kept {} of {} rows", rows.len(), table.len());
    Ok(table.with_records(rows))
}
