//! Derived period columns
//!
//! Enrichment is idempotent: a derived column that already exists (because
//! the file carried it or a previous call derived it) is never recomputed or
//! overwritten.

use crate::core::error::{CohortError, Result};
use crate::core::models::{Column, Period, StudentRecord, Table};
use logger::{debug, warn};

/// What to do with a period cell that is not `<year>/<term>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PeriodPolicy {
    /// Fail with [`CohortError::MalformedPeriod`]
    #[default]
    Strict,
    /// Treat the cell as absent and log a warning
    Lenient,
}

/// Source line of a record. Rows built in memory fall back to their
/// position, counting the header as line 1.
fn line_of(record: &StudentRecord, index: usize) -> usize {
    record.line.unwrap_or(index + 2)
}

fn parse_period(
    raw: Option<&str>,
    column: Column,
    line: usize,
    policy: PeriodPolicy,
) -> Result<Option<Period>> {
    let value = raw.unwrap_or_default();
    match value.parse::<Period>() {
        Ok(period) => Ok(Some(period)),
        Err(_) if policy == PeriodPolicy::Lenient => {
            warn!("Ignoring malformed {column} '{value}' at line {line}");
            Ok(None)
        }
        Err(_) => Err(CohortError::MalformedPeriod {
            column,
            line,
            value: value.to_string(),
        }),
    }
}

/// Derive `entry_year`/`entry_term` from `entry_period`.
///
/// Returns `Ok(false)` without touching the table when both columns already
/// exist, `Ok(true)` after deriving them.
///
/// # Errors
/// - `MissingColumn(entry_period)` if there is nothing to derive from
/// - `MalformedPeriod` for an unparsable or empty period under [`PeriodPolicy::Strict`]
pub fn derive_entry_columns(table: &mut Table, policy: PeriodPolicy) -> Result<bool> {
    if table.has_column(Column::EntryYear) && table.has_column(Column::EntryTerm) {
        debug!("Entry year/term already present; skipping derivation");
        return Ok(false);
    }
    table.require(Column::EntryPeriod)?;

    // Parse everything before mutating so a strict failure leaves the table intact.
    let derived = table
        .records()
        .iter()
        .enumerate()
        .map(|(index, record)| {
            parse_period(
                record.entry_period.as_deref(),
                Column::EntryPeriod,
                line_of(record, index),
                policy,
            )
        })
        .collect::<Result<Vec<_>>>()?;

    for (record, entry) in table.records_mut().iter_mut().zip(derived) {
        record.entry = entry;
    }
    table.add_column(Column::EntryYear);
    table.add_column(Column::EntryTerm);
    Ok(true)
}

/// Derive `exit_year` from `exit_period`.
///
/// Rows without an exit period (students still enrolled) get no exit year.
/// Returns `Ok(false)` when `exit_year` already exists or the table has no
/// `exit_period` column to derive from.
///
/// # Errors
/// `MalformedPeriod` for a non-empty, unparsable period under [`PeriodPolicy::Strict`].
pub fn derive_exit_year(table: &mut Table, policy: PeriodPolicy) -> Result<bool> {
    if table.has_column(Column::ExitYear) {
        debug!("Exit year already present; skipping derivation");
        return Ok(false);
    }
    if !table.has_column(Column::ExitPeriod) {
        debug!("No exit period column; exit year not derived");
        return Ok(false);
    }

    let derived = table
        .records()
        .iter()
        .enumerate()
        .map(|(index, record)| match record.exit_period.as_deref() {
            None => Ok(None),
            Some(raw) => parse_period(Some(raw), Column::ExitPeriod, line_of(record, index), policy)
                .map(|period| period.map(|p| p.year)),
        })
        .collect::<Result<Vec<_>>>()?;

    for (record, exit_year) in table.records_mut().iter_mut().zip(derived) {
        record.exit_year = exit_year;
    }
    table.add_column(Column::ExitYear);
    Ok(true)
}

/// Add every derivable column. Calling it again is a no-op.
///
/// # Errors
/// Propagates errors from [`derive_entry_columns`] and [`derive_exit_year`].
pub fn enrich(table: &mut Table, policy: PeriodPolicy) -> Result<()> {
    derive_entry_columns(table, policy)?;
    derive_exit_year(table, policy)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::VocabularyChoice;

    fn period_table(entries: &[&str]) -> Table {
        let records = entries
            .iter()
            .enumerate()
            .map(|(i, period)| {
                StudentRecord::new(&i.to_string(), "Physics", "Active").with_entry_period(period)
            })
            .collect();
        Table::from_records(
            [
                Column::StudentId,
                Column::Program,
                Column::Status,
                Column::EntryPeriod,
            ],
            records,
            VocabularyChoice::Auto,
        )
    }

    #[test]
    fn derives_entry_year_and_term() {
        let mut table = period_table(&["2019/2", "2020/1"]);
        assert!(derive_entry_columns(&mut table, PeriodPolicy::Strict).expect("derive"));

        let record = &table.records()[0];
        assert_eq!(record.entry_year(), Some(2019));
        assert_eq!(record.entry_term(), Some(2));
        assert!(table.has_column(Column::EntryYear));
        assert!(table.has_column(Column::EntryTerm));
    }

    #[test]
    fn second_derivation_is_a_no_op() {
        let mut table = period_table(&["2019/2"]);
        enrich(&mut table, PeriodPolicy::Strict).expect("first enrich");
        let snapshot = table.clone();

        assert!(!derive_entry_columns(&mut table, PeriodPolicy::Strict).expect("derive"));
        enrich(&mut table, PeriodPolicy::Strict).expect("second enrich");
        assert_eq!(table, snapshot);
    }

    #[test]
    fn strict_policy_rejects_malformed_period() {
        let mut table = period_table(&["2019/2", "2019-1"]);
        let err = derive_entry_columns(&mut table, PeriodPolicy::Strict).unwrap_err();
        match err {
            CohortError::MalformedPeriod {
                column,
                line,
                value,
            } => {
                assert_eq!(column, Column::EntryPeriod);
                assert_eq!(line, 3);
                assert_eq!(value, "2019-1");
            }
            other => panic!("unexpected error: {other}"),
        }
        // Nothing was written
        assert!(!table.has_column(Column::EntryYear));
        assert!(table.records()[0].entry.is_none());
    }

    #[test]
    fn malformed_exit_period_uses_recorded_line() {
        let records = vec![StudentRecord::new("1", "Physics", "Withdrawn")
            .with_entry_period("2019/1")
            .with_exit_period("20x1/2")
            .with_line(17)];
        let mut table = Table::from_records(
            [
                Column::StudentId,
                Column::Program,
                Column::Status,
                Column::EntryPeriod,
                Column::ExitPeriod,
            ],
            records,
            VocabularyChoice::Auto,
        );
        let err = enrich(&mut table, PeriodPolicy::Strict).unwrap_err();
        assert!(matches!(
            err,
            CohortError::MalformedPeriod { column: Column::ExitPeriod, line: 17, .. }
        ));
    }

    #[test]
    fn lenient_policy_leaves_malformed_period_absent() {
        let mut table = period_table(&["2019/2", "spring"]);
        derive_entry_columns(&mut table, PeriodPolicy::Lenient).expect("derive");
        assert_eq!(table.records()[0].entry_year(), Some(2019));
        assert_eq!(table.records()[1].entry, None);
    }

    #[test]
    fn missing_entry_period_column_is_reported() {
        let mut table = Table::from_records(
            [Column::Program, Column::Status],
            vec![StudentRecord::new("1", "Physics", "Active")],
            VocabularyChoice::Auto,
        );
        assert!(matches!(
            derive_entry_columns(&mut table, PeriodPolicy::Strict),
            Err(CohortError::MissingColumn(Column::EntryPeriod))
        ));
    }

    #[test]
    fn exit_year_is_nullable() {
        let records = vec![
            StudentRecord::new("1", "Physics", "Active").with_entry_period("2020/1"),
            StudentRecord::new("2", "Physics", "Graduated")
                .with_entry_period("2020/1")
                .with_exit_period("2023/1"),
        ];
        let mut table = Table::from_records(
            [
                Column::StudentId,
                Column::Program,
                Column::Status,
                Column::EntryPeriod,
                Column::ExitPeriod,
            ],
            records,
            VocabularyChoice::Auto,
        );
        assert!(derive_exit_year(&mut table, PeriodPolicy::Strict).expect("derive"));
        assert_eq!(table.records()[0].exit_year, None);
        assert_eq!(table.records()[1].exit_year, Some(2023));
    }

    #[test]
    fn exit_year_skipped_without_exit_period_column() {
        let mut table = period_table(&["2020/1"]);
        assert!(!derive_exit_year(&mut table, PeriodPolicy::Strict).expect("derive"));
        assert!(!table.has_column(Column::ExitYear));
    }
}
