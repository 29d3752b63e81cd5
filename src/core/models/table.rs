//! In-memory student table

use super::{Column, StudentRecord, Vocabulary, VocabularyChoice};
use crate::core::error::{CohortError, Result};
use std::collections::BTreeSet;

/// An owned table of student records plus the set of columns it carries.
///
/// The table is immutable apart from enrichment, which adds derived
/// columns in place (see [`crate::core::dataset::enrich`]).
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: BTreeSet<Column>,
    records: Vec<StudentRecord>,
    vocabulary: Vocabulary,
}

impl Table {
    /// Build a table from records.
    ///
    /// Every record's status is re-resolved against the chosen vocabulary:
    /// labels the vocabulary does not recognize leave `status` as `None`.
    #[must_use]
    pub fn from_records<I>(columns: I, records: Vec<StudentRecord>, choice: VocabularyChoice) -> Self
    where
        I: IntoIterator<Item = Column>,
    {
        let vocabulary = match choice {
            VocabularyChoice::Fixed(vocabulary) => vocabulary,
            VocabularyChoice::Auto => Vocabulary::detect(
                records
                    .iter()
                    .filter_map(|r| super::Status::from_label(&r.status_label)),
            ),
        };

        let records = records
            .into_iter()
            .map(|mut record| {
                record.status = super::Status::from_label(&record.status_label)
                    .filter(|status| vocabulary.recognizes(*status));
                record
            })
            .collect();

        Self {
            columns: columns.into_iter().collect(),
            records,
            vocabulary,
        }
    }

    /// Same columns and vocabulary, different rows. Used by filtering.
    #[must_use]
    pub(crate) fn with_records(&self, records: Vec<StudentRecord>) -> Self {
        Self {
            columns: self.columns.clone(),
            records,
            vocabulary: self.vocabulary,
        }
    }

    /// All records, including ones with an unrecognized status
    #[must_use]
    pub fn records(&self) -> &[StudentRecord] {
        &self.records
    }

    pub(crate) fn records_mut(&mut self) -> &mut [StudentRecord] {
        &mut self.records
    }

    /// Records whose status belongs to the table's vocabulary
    pub fn recognized(&self) -> impl Iterator<Item = &StudentRecord> {
        self.records.iter().filter(|r| r.status.is_some())
    }

    /// Number of rows whose status is outside the vocabulary
    #[must_use]
    pub fn unrecognized_count(&self) -> usize {
        self.records.iter().filter(|r| r.status.is_none()).count()
    }

    /// Number of rows
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Status vocabulary of this table
    #[must_use]
    pub const fn vocabulary(&self) -> Vocabulary {
        self.vocabulary
    }

    /// Columns present in this table
    #[must_use]
    pub const fn columns(&self) -> &BTreeSet<Column> {
        &self.columns
    }

    /// Whether `column` is present
    #[must_use]
    pub fn has_column(&self, column: Column) -> bool {
        self.columns.contains(&column)
    }

    /// Fail with [`CohortError::MissingColumn`] unless `column` is present.
    ///
    /// # Errors
    /// Returns `MissingColumn` if the column is absent.
    pub fn require(&self, column: Column) -> Result<()> {
        if self.has_column(column) {
            Ok(())
        } else {
            Err(CohortError::MissingColumn(column))
        }
    }

    pub(crate) fn add_column(&mut self, column: Column) {
        self.columns.insert(column);
    }

    /// Distinct programs, sorted
    #[must_use]
    pub fn programs(&self) -> BTreeSet<String> {
        self.records.iter().map(|r| r.program.clone()).collect()
    }

    /// Distinct entry years, sorted; rows without a known entry year are skipped
    #[must_use]
    pub fn entry_years(&self) -> BTreeSet<i32> {
        self.records
            .iter()
            .filter_map(StudentRecord::entry_year)
            .collect()
    }
}
