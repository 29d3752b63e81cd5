//! Grouped cohort aggregates
//!
//! Every function here is a pure function of the table it receives. Whether
//! that table is the filtered view or the full dataset is the caller's call;
//! the dashboard feeds cohort-wide aggregates (graduation proportion, yearly
//! evolution, exit trend, term distribution) with the unfiltered table.
//!
//! Rows with a status outside the table's vocabulary are never counted.
//! Output rows are sorted by their group keys; periods sort chronologically.

use crate::core::error::Result;
use crate::core::models::{Column, Period, Status, StudentRecord, Table};
use serde::Serialize;
use std::collections::BTreeMap;

/// A row type that can be shown as a plain table.
pub trait AggregateRow: Serialize {
    /// Column headers, matching the serialized field names
    const HEADERS: &'static [&'static str];

    /// Cell values in header order
    fn cells(&self) -> Vec<String>;
}

/// Number of students entering in one period
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntakeRow {
    /// `"{year}/{term}"` label
    pub period: String,
    /// Entry year
    pub entry_year: i32,
    /// Entry term
    pub entry_term: u8,
    /// Students entering
    pub total: usize,
}

/// Student count for one (program, status) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCountRow {
    /// Program
    pub program: String,
    /// Status
    pub status: Status,
    /// Students
    pub total: usize,
}

/// Exit rate of one program
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExitRateRow {
    /// Program
    pub program: String,
    /// Students with a terminal status
    pub exited: usize,
    /// Students still active
    pub active: usize,
    /// `exited / (exited + active) * 100`, 0 when both are 0
    pub rate: f64,
}

/// Mean time to exit of one program
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgramMeanRow {
    /// Program
    pub program: String,
    /// Mean number of terms until exit
    pub mean_terms: f64,
    /// Students contributing to the mean
    pub students: usize,
}

/// Mean time to exit of one (program, status) pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgramStatusMeanRow {
    /// Program
    pub program: String,
    /// Terminal status
    pub status: Status,
    /// Mean number of terms until exit
    pub mean_terms: f64,
    /// Students contributing to the mean
    pub students: usize,
}

/// Share of graduates in one program
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraduationRow {
    /// Program
    pub program: String,
    /// Graduated students
    pub graduated: usize,
    /// All students in the program
    pub total: usize,
    /// `graduated / total * 100`, 0 when total is 0
    pub proportion: f64,
}

/// Student count for one (entry year, status) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearStatusRow {
    /// Entry year as an ordinal label
    pub year: String,
    /// Status
    pub status: Status,
    /// Students
    pub total: usize,
}

/// Exits recorded in one (exit year, status) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExitYearRow {
    /// Exit year as an ordinal label
    pub exit_year: String,
    /// Terminal status
    pub status: Status,
    /// Students
    pub total: usize,
}

/// Graduates of one program in one exit year
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraduatesByYearRow {
    /// Program
    pub program: String,
    /// Graduation year as an ordinal label
    pub exit_year: String,
    /// Graduated students
    pub graduates: usize,
}

/// Students entering in one term of the year
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermRow {
    /// Entry term
    pub entry_term: u8,
    /// Students
    pub total: usize,
}

impl AggregateRow for IntakeRow {
    const HEADERS: &'static [&'static str] = &["period", "entry_year", "entry_term", "total"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.period.clone(),
            self.entry_year.to_string(),
            self.entry_term.to_string(),
            self.total.to_string(),
        ]
    }
}

impl AggregateRow for StatusCountRow {
    const HEADERS: &'static [&'static str] = &["program", "status", "total"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.program.clone(),
            self.status.to_string(),
            self.total.to_string(),
        ]
    }
}

impl AggregateRow for ExitRateRow {
    const HEADERS: &'static [&'static str] = &["program", "exited", "active", "rate"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.program.clone(),
            self.exited.to_string(),
            self.active.to_string(),
            format!("{:.2}", self.rate),
        ]
    }
}

impl AggregateRow for ProgramMeanRow {
    const HEADERS: &'static [&'static str] = &["program", "mean_terms", "students"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.program.clone(),
            format!("{:.2}", self.mean_terms),
            self.students.to_string(),
        ]
    }
}

impl AggregateRow for ProgramStatusMeanRow {
    const HEADERS: &'static [&'static str] = &["program", "status", "mean_terms", "students"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.program.clone(),
            self.status.to_string(),
            format!("{:.2}", self.mean_terms),
            self.students.to_string(),
        ]
    }
}

impl AggregateRow for GraduationRow {
    const HEADERS: &'static [&'static str] = &["program", "graduated", "total", "proportion"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.program.clone(),
            self.graduated.to_string(),
            self.total.to_string(),
            format!("{:.2}", self.proportion),
        ]
    }
}

impl AggregateRow for YearStatusRow {
    const HEADERS: &'static [&'static str] = &["year", "status", "total"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.year.clone(),
            self.status.to_string(),
            self.total.to_string(),
        ]
    }
}

impl AggregateRow for ExitYearRow {
    const HEADERS: &'static [&'static str] = &["exit_year", "status", "total"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.exit_year.clone(),
            self.status.to_string(),
            self.total.to_string(),
        ]
    }
}

impl AggregateRow for GraduatesByYearRow {
    const HEADERS: &'static [&'static str] = &["program", "exit_year", "graduates"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.program.clone(),
            self.exit_year.clone(),
            self.graduates.to_string(),
        ]
    }
}

impl AggregateRow for TermRow {
    const HEADERS: &'static [&'static str] = &["entry_term", "total"];

    fn cells(&self) -> Vec<String> {
        vec![self.entry_term.to_string(), self.total.to_string()]
    }
}

/// `100 * part / whole`, or 0 for an empty whole.
#[allow(clippy::cast_precision_loss)]
fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        100.0 * part as f64 / whole as f64
    }
}

/// Running sum and count for a mean
#[derive(Debug, Default, Clone, Copy)]
struct MeanAccumulator {
    sum: f64,
    count: usize,
}

impl MeanAccumulator {
    fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    /// `None` for an empty group; no mean is fabricated.
    #[allow(clippy::cast_precision_loss)]
    fn mean(self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

/// Exited rows with a recorded time to exit, as (record, status, terms)
fn exit_times(table: &Table) -> impl Iterator<Item = (&StudentRecord, Status, f64)> {
    let vocabulary = table.vocabulary();
    table.recognized().filter_map(move |record| {
        let status = record.status.filter(|s| vocabulary.is_terminal(*s))?;
        record.time_to_exit.map(|terms| (record, status, terms))
    })
}

/// Count students per entry period, in chronological order.
///
/// # Errors
/// `MissingColumn` if entry year/term have not been derived.
pub fn intake_by_period(table: &Table) -> Result<Vec<IntakeRow>> {
    table.require(Column::EntryYear)?;
    table.require(Column::EntryTerm)?;

    let mut counts: BTreeMap<Period, usize> = BTreeMap::new();
    for period in table.recognized().filter_map(|r| r.entry) {
        *counts.entry(period).or_default() += 1;
    }

    Ok(counts
        .into_iter()
        .map(|(period, total)| IntakeRow {
            period: period.to_string(),
            entry_year: period.year,
            entry_term: period.term,
            total,
        })
        .collect())
}

/// Count students per (program, status).
///
/// # Errors
/// `MissingColumn` if the program or status column is absent.
pub fn status_by_program(table: &Table) -> Result<Vec<StatusCountRow>> {
    table.require(Column::Program)?;
    table.require(Column::Status)?;

    let mut counts: BTreeMap<(&str, Status), usize> = BTreeMap::new();
    for record in table.recognized() {
        if let Some(status) = record.status {
            *counts.entry((record.program.as_str(), status)).or_default() += 1;
        }
    }

    Ok(counts
        .into_iter()
        .map(|((program, status), total)| StatusCountRow {
            program: program.to_string(),
            status,
            total,
        })
        .collect())
}

/// Exit rate per program: `exited / (exited + active) * 100`.
///
/// "Exited" means any terminal status of the table's vocabulary: Dropped
/// for the dropout vocabulary, Graduated or Withdrawn for the completion
/// vocabulary. A program with neither exited nor active students reports 0.
///
/// # Errors
/// `MissingColumn` if the program or status column is absent.
pub fn exit_rate_by_program(table: &Table) -> Result<Vec<ExitRateRow>> {
    table.require(Column::Program)?;
    table.require(Column::Status)?;

    let vocabulary = table.vocabulary();
    let mut counts: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for record in table.recognized() {
        let entry = counts.entry(record.program.as_str()).or_default();
        match record.status {
            Some(status) if vocabulary.is_terminal(status) => entry.0 += 1,
            Some(Status::Active) => entry.1 += 1,
            _ => {}
        }
    }

    Ok(counts
        .into_iter()
        .map(|(program, (exited, active))| ExitRateRow {
            program: program.to_string(),
            exited,
            active,
            rate: percentage(exited, exited + active),
        })
        .collect())
}

/// Mean `time_to_exit` per program over exited students.
///
/// Programs without any exited student carrying a time are omitted.
///
/// # Errors
/// `MissingColumn(time_to_exit)` if the dataset has no time column.
pub fn mean_time_to_exit_by_program(table: &Table) -> Result<Vec<ProgramMeanRow>> {
    table.require(Column::TimeToExit)?;

    let mut groups: BTreeMap<&str, MeanAccumulator> = BTreeMap::new();
    for (record, _, terms) in exit_times(table) {
        groups.entry(record.program.as_str()).or_default().push(terms);
    }

    Ok(groups
        .into_iter()
        .filter_map(|(program, acc)| {
            acc.mean().map(|mean_terms| ProgramMeanRow {
                program: program.to_string(),
                mean_terms,
                students: acc.count,
            })
        })
        .collect())
}

/// Mean `time_to_exit` per (program, terminal status).
///
/// # Errors
/// `MissingColumn(time_to_exit)` if the dataset has no time column.
pub fn mean_time_to_exit_by_program_status(table: &Table) -> Result<Vec<ProgramStatusMeanRow>> {
    table.require(Column::TimeToExit)?;

    let mut groups: BTreeMap<(&str, Status), MeanAccumulator> = BTreeMap::new();
    for (record, status, terms) in exit_times(table) {
        groups
            .entry((record.program.as_str(), status))
            .or_default()
            .push(terms);
    }

    Ok(groups
        .into_iter()
        .filter_map(|((program, status), acc)| {
            acc.mean().map(|mean_terms| ProgramStatusMeanRow {
                program: program.to_string(),
                status,
                mean_terms,
                students: acc.count,
            })
        })
        .collect())
}

/// Share of graduates per program.
///
/// Every program with at least one counted student appears, including
/// programs without graduates (proportion 0). Under the dropout vocabulary
/// nobody can graduate, so every proportion is 0.
///
/// # Errors
/// `MissingColumn` if the program or status column is absent.
pub fn graduation_by_program(table: &Table) -> Result<Vec<GraduationRow>> {
    table.require(Column::Program)?;
    table.require(Column::Status)?;

    let mut counts: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for record in table.recognized() {
        let entry = counts.entry(record.program.as_str()).or_default();
        entry.1 += 1;
        if record.status == Some(Status::Graduated) {
            entry.0 += 1;
        }
    }

    Ok(counts
        .into_iter()
        .map(|(program, (graduated, total))| GraduationRow {
            program: program.to_string(),
            graduated,
            total,
            proportion: percentage(graduated, total),
        })
        .collect())
}

/// Count students per (entry year, status), optionally from `min_year` on.
///
/// # Errors
/// `MissingColumn(entry_year)` if entry years have not been derived.
pub fn yearly_status_evolution(table: &Table, min_year: Option<i32>) -> Result<Vec<YearStatusRow>> {
    table.require(Column::EntryYear)?;

    let mut counts: BTreeMap<(i32, Status), usize> = BTreeMap::new();
    for record in table.recognized() {
        let (Some(year), Some(status)) = (record.entry_year(), record.status) else {
            continue;
        };
        if min_year.is_some_and(|cutoff| year < cutoff) {
            continue;
        }
        *counts.entry((year, status)).or_default() += 1;
    }

    Ok(counts
        .into_iter()
        .map(|((year, status), total)| YearStatusRow {
            year: year.to_string(),
            status,
            total,
        })
        .collect())
}

/// Count exits per (exit year, terminal status).
///
/// # Errors
/// `MissingColumn(exit_year)` if the dataset has no exit period or year.
pub fn exit_year_trend(table: &Table) -> Result<Vec<ExitYearRow>> {
    table.require(Column::ExitYear)?;

    let vocabulary = table.vocabulary();
    let mut counts: BTreeMap<(i32, Status), usize> = BTreeMap::new();
    for record in table.recognized() {
        let Some(status) = record.status.filter(|s| vocabulary.is_terminal(*s)) else {
            continue;
        };
        if let Some(year) = record.exit_year {
            *counts.entry((year, status)).or_default() += 1;
        }
    }

    Ok(counts
        .into_iter()
        .map(|((year, status), total)| ExitYearRow {
            exit_year: year.to_string(),
            status,
            total,
        })
        .collect())
}

/// Count graduates per (program, graduation year).
///
/// # Errors
/// `MissingColumn(exit_year)` if the dataset has no exit period or year.
pub fn graduates_by_exit_year(table: &Table) -> Result<Vec<GraduatesByYearRow>> {
    table.require(Column::ExitYear)?;

    let mut counts: BTreeMap<(&str, i32), usize> = BTreeMap::new();
    for record in table.recognized() {
        if record.status != Some(Status::Graduated) {
            continue;
        }
        if let Some(year) = record.exit_year {
            *counts.entry((record.program.as_str(), year)).or_default() += 1;
        }
    }

    Ok(counts
        .into_iter()
        .map(|((program, year), graduates)| GraduatesByYearRow {
            program: program.to_string(),
            exit_year: year.to_string(),
            graduates,
        })
        .collect())
}

/// Count students per entry term.
///
/// # Errors
/// `MissingColumn(entry_term)` if entry terms have not been derived.
pub fn term_distribution(table: &Table) -> Result<Vec<TermRow>> {
    table.require(Column::EntryTerm)?;

    let mut counts: BTreeMap<u8, usize> = BTreeMap::new();
    for term in table.recognized().filter_map(StudentRecord::entry_term) {
        *counts.entry(term).or_default() += 1;
    }

    Ok(counts
        .into_iter()
        .map(|(entry_term, total)| TermRow { entry_term, total })
        .collect())
}
