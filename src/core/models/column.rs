//! Logical columns of a student dataset

use std::fmt;

/// A logical column of the student table.
///
/// Source files may name columns differently; the loader resolves each
/// logical column to a header through the configured name, the canonical
/// name and finally the known aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    /// Enrollment number
    StudentId,
    /// Program (course of study)
    Program,
    /// Combined `"<year>/<term>"` entry period
    EntryPeriod,
    /// Entry year (loaded or derived)
    EntryYear,
    /// Entry term (loaded or derived)
    EntryTerm,
    /// Enrollment status label
    Status,
    /// Combined `"<year>/<term>"` exit period
    ExitPeriod,
    /// Exit year (loaded or derived)
    ExitYear,
    /// Terms between entry and exit
    TimeToExit,
}

impl Column {
    /// Every column, in display order.
    pub const ALL: [Self; 9] = [
        Self::StudentId,
        Self::Program,
        Self::EntryPeriod,
        Self::EntryYear,
        Self::EntryTerm,
        Self::Status,
        Self::ExitPeriod,
        Self::ExitYear,
        Self::TimeToExit,
    ];

    /// Canonical header name; also the key used in the `[columns]` config section.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::StudentId => "student_id",
            Self::Program => "program",
            Self::EntryPeriod => "entry_period",
            Self::EntryYear => "entry_year",
            Self::EntryTerm => "entry_term",
            Self::Status => "status",
            Self::ExitPeriod => "exit_period",
            Self::ExitYear => "exit_year",
            Self::TimeToExit => "time_to_exit",
        }
    }

    /// Headers used by earlier revisions of the enrollment exports.
    #[must_use]
    pub const fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::StudentId => &["matricula", "id"],
            Self::Program => &["curso"],
            Self::EntryPeriod => &["periodo ingresso", "periodo_ingresso"],
            Self::EntryYear => &["ano_ingresso"],
            Self::EntryTerm => &["semestre_ingresso"],
            Self::Status => &["situacao"],
            Self::ExitPeriod => &["periodo evasao", "periodo_evasao"],
            Self::ExitYear => &["ano_evasao", "ano_diploma"],
            Self::TimeToExit => &["tempo_ate_evasao"],
        }
    }

    /// Look up a column by its canonical name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_unique_and_resolvable() {
        for column in Column::ALL {
            assert_eq!(Column::from_name(column.name()), Some(column));
        }
        assert_eq!(Column::from_name(" Program "), Some(Column::Program));
        assert_eq!(Column::from_name("curso"), None);
    }
}
