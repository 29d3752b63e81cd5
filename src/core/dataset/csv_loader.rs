//! CSV loader for enrollment datasets

use super::enrich::{enrich, PeriodPolicy};
use crate::core::error::{CohortError, Result};
use crate::core::models::{Column, Period, StudentRecord, Table, VocabularyChoice};
use logger::{info, warn};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

/// Header names to look for, per logical column.
///
/// Resolution order for each column: the configured override, the canonical
/// name, then [`Column::aliases`]. Matching ignores case and surrounding
/// whitespace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMapping {
    overrides: HashMap<Column, String>,
}

impl ColumnMapping {
    /// Map `column` to a custom header; an empty header clears the override.
    #[must_use]
    pub fn with(mut self, column: Column, header: &str) -> Self {
        self.set(column, header);
        self
    }

    /// Map `column` to a custom header in place
    pub fn set(&mut self, column: Column, header: &str) {
        let header = header.trim();
        if header.is_empty() {
            self.overrides.remove(&column);
        } else {
            self.overrides.insert(column, header.to_string());
        }
    }

    /// Header names tried for `column`, in order
    #[must_use]
    pub fn candidates(&self, column: Column) -> Vec<&str> {
        self.overrides
            .get(&column)
            .map(String::as_str)
            .into_iter()
            .chain(std::iter::once(column.name()))
            .chain(column.aliases().iter().copied())
            .collect()
    }

    /// Index of `column` within `headers`, if any candidate matches
    #[must_use]
    pub fn resolve(&self, column: Column, headers: &[String]) -> Option<usize> {
        self.candidates(column).into_iter().find_map(|candidate| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(candidate))
        })
    }
}

/// Options controlling how a dataset file is read.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Header names per column
    pub columns: ColumnMapping,
    /// Status vocabulary selection
    pub vocabulary: VocabularyChoice,
    /// Malformed period handling
    pub period_policy: PeriodPolicy,
}

/// Load a dataset file and enrich it with derived period columns.
///
/// # Arguments
/// * `path` - Path to the CSV file
/// * `options` - Column mapping, vocabulary and period policy
///
/// # Errors
/// Returns an error if the file cannot be read, a required column is
/// missing, or a cell cannot be parsed (see [`read_table_from`] and
/// [`enrich`]).
pub fn load_dataset<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<Table> {
    let path = path.as_ref();
    let mut table = read_table(path, options)?;
    enrich(&mut table, options.period_policy)?;

    info!(
        "Dataset loaded from {}: {} rows, vocabulary '{}'",
        path.display(),
        table.len(),
        table.vocabulary()
    );
    let unrecognized = table.unrecognized_count();
    if unrecognized > 0 {
        warn!(
            "{unrecognized} rows in {} have a status outside the '{}' vocabulary and are excluded",
            path.display(),
            table.vocabulary()
        );
    }

    Ok(table)
}

/// Read a dataset file without enrichment.
///
/// # Errors
/// See [`read_table_from`].
pub fn read_table<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<Table> {
    let file = File::open(path)?;
    read_table_from(file, options)
}

/// Resolved header positions for one file
struct HeaderIndex(HashMap<Column, usize>);

impl HeaderIndex {
    fn build(headers: &[String], mapping: &ColumnMapping) -> Self {
        Self(
            Column::ALL
                .into_iter()
                .filter_map(|column| mapping.resolve(column, headers).map(|idx| (column, idx)))
                .collect(),
        )
    }

    fn has(&self, column: Column) -> bool {
        self.0.contains_key(&column)
    }

    fn require(&self, column: Column) -> Result<()> {
        if self.has(column) {
            Ok(())
        } else {
            Err(CohortError::MissingColumn(column))
        }
    }

    /// Non-empty, trimmed cell for `column`
    fn cell<'r>(&self, record: &'r csv::StringRecord, column: Column) -> Option<&'r str> {
        self.0
            .get(&column)
            .and_then(|&idx| record.get(idx))
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    fn columns(&self) -> impl Iterator<Item = Column> + '_ {
        self.0.keys().copied()
    }
}

/// Missing-value markers written by spreadsheet and dataframe exports
const MISSING_LABELS: [&str; 5] = ["na", "n/a", "nan", "null", "<na>"];

fn is_missing_label(raw: &str) -> bool {
    MISSING_LABELS
        .iter()
        .any(|label| raw.eq_ignore_ascii_case(label))
}

/// Parse an optional numeric cell, reporting the column and line on failure.
/// Missing-value markers such as `NA` or `NaN` read as absent.
fn parse_cell<T: FromStr>(value: Option<&str>, column: Column, line: usize) -> Result<Option<T>> {
    value
        .filter(|raw| !is_missing_label(raw))
        .map(|raw| {
            raw.parse::<T>().map_err(|_| CohortError::InvalidValue {
                column,
                line,
                value: raw.to_string(),
            })
        })
        .transpose()
}

/// Parse a `time_to_exit` cell; infinities are rejected
fn parse_terms(value: Option<&str>, line: usize) -> Result<Option<f64>> {
    match parse_cell::<f64>(value, Column::TimeToExit, line)? {
        Some(terms) if !terms.is_finite() => Err(CohortError::InvalidValue {
            column: Column::TimeToExit,
            line,
            value: value.unwrap_or_default().to_string(),
        }),
        terms => Ok(terms),
    }
}

/// Read a dataset from any reader.
///
/// Required columns are `student_id`, `program`, `status` and either
/// `entry_period` or both `entry_year` and `entry_term`. `exit_period`,
/// `exit_year` and `time_to_exit` are optional.
///
/// # Errors
/// - `MissingColumn` for an absent required column
/// - `InvalidValue` for a non-numeric year, term or time-to-exit cell
/// - `Csv` for malformed CSV
pub fn read_table_from<R: Read>(reader: R, options: &LoadOptions) -> Result<Table> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(ToString::to_string)
        .collect();
    let index = HeaderIndex::build(&headers, &options.columns);

    index.require(Column::StudentId)?;
    index.require(Column::Program)?;
    index.require(Column::Status)?;
    let pre_split = index.has(Column::EntryYear) && index.has(Column::EntryTerm);
    if !pre_split {
        index.require(Column::EntryPeriod)?;
    }

    let mut records = Vec::new();
    for (row, result) in csv_reader.records().enumerate() {
        let record = result?;
        let line = record
            .position()
            .and_then(|p| usize::try_from(p.line()).ok())
            .unwrap_or(row + 2);

        let mut student = StudentRecord::new(
            index.cell(&record, Column::StudentId).unwrap_or_default(),
            index.cell(&record, Column::Program).unwrap_or_default(),
            index.cell(&record, Column::Status).unwrap_or_default(),
        )
        .with_line(line);
        student.entry_period = index
            .cell(&record, Column::EntryPeriod)
            .map(ToString::to_string);
        student.exit_period = index
            .cell(&record, Column::ExitPeriod)
            .map(ToString::to_string);

        if pre_split {
            let year = parse_cell::<i32>(index.cell(&record, Column::EntryYear), Column::EntryYear, line)?;
            let term = parse_cell::<u8>(index.cell(&record, Column::EntryTerm), Column::EntryTerm, line)?;
            if term == Some(0) {
                return Err(CohortError::InvalidValue {
                    column: Column::EntryTerm,
                    line,
                    value: "0".to_string(),
                });
            }
            student.entry = year.zip(term).map(|(year, term)| Period::new(year, term));
        }
        student.exit_year = parse_cell(index.cell(&record, Column::ExitYear), Column::ExitYear, line)?;
        student.time_to_exit = parse_terms(index.cell(&record, Column::TimeToExit), line)?;

        records.push(student);
    }

    let mut columns: Vec<Column> = index.columns().collect();
    if !pre_split {
        // A lone entry_year or entry_term is ignored; both come from entry_period.
        columns.retain(|c| !matches!(c, Column::EntryYear | Column::EntryTerm));
    }

    Ok(Table::from_records(columns, records, options.vocabulary))
}
