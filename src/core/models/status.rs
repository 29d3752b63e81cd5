//! Enrollment status and the per-revision status vocabularies

use crate::core::error::CohortError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Enrollment state of a student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Status {
    /// Still enrolled
    Active,
    /// Completed the program
    Graduated,
    /// Left without completing
    Withdrawn,
    /// Left without completing (earliest dataset revision)
    Dropped,
}

impl Status {
    /// Parse a status label. English and Portuguese labels are accepted,
    /// case-insensitively.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "active" | "ativo" => Some(Self::Active),
            "graduated" | "diplomado" => Some(Self::Graduated),
            "withdrawn" | "desistente" => Some(Self::Withdrawn),
            "dropped" | "evadido" => Some(Self::Dropped),
            _ => None,
        }
    }

    /// Display label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Graduated => "Graduated",
            Self::Withdrawn => "Withdrawn",
            Self::Dropped => "Dropped",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Status {
    type Err = CohortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| CohortError::UnknownStatus(s.trim().to_string()))
    }
}

/// The set of statuses a dataset revision uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Vocabulary {
    /// Earliest revision: Active or Dropped
    Dropout,
    /// Later revisions: Active, Graduated or Withdrawn
    Completion,
}

impl Vocabulary {
    /// Statuses recognized by this vocabulary.
    #[must_use]
    pub const fn statuses(self) -> &'static [Status] {
        match self {
            Self::Dropout => &[Status::Active, Status::Dropped],
            Self::Completion => &[Status::Active, Status::Graduated, Status::Withdrawn],
        }
    }

    /// Terminal statuses, i.e. the ones counted as "exited".
    ///
    /// `time_to_exit` is only meaningful for rows with one of these.
    #[must_use]
    pub const fn terminal(self) -> &'static [Status] {
        match self {
            Self::Dropout => &[Status::Dropped],
            Self::Completion => &[Status::Graduated, Status::Withdrawn],
        }
    }

    /// Whether `status` belongs to this vocabulary
    #[must_use]
    pub fn recognizes(self, status: Status) -> bool {
        self.statuses().contains(&status)
    }

    /// Whether `status` is terminal in this vocabulary
    #[must_use]
    pub fn is_terminal(self, status: Status) -> bool {
        self.terminal().contains(&status)
    }

    /// Pick the vocabulary matching a set of parsed statuses: any
    /// Graduated or Withdrawn row means the completion vocabulary.
    pub fn detect<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = Status>,
    {
        if statuses
            .into_iter()
            .any(|s| matches!(s, Status::Graduated | Status::Withdrawn))
        {
            Self::Completion
        } else {
            Self::Dropout
        }
    }

    /// Config name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Dropout => "dropout",
            Self::Completion => "completion",
        }
    }
}

impl fmt::Display for Vocabulary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How the loader chooses the vocabulary of a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VocabularyChoice {
    /// Detect from the status labels present in the file
    #[default]
    Auto,
    /// Use the given vocabulary regardless of the file contents
    Fixed(Vocabulary),
}

impl FromStr for VocabularyChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "auto" => Ok(Self::Auto),
            "dropout" | "legacy" => Ok(Self::Fixed(Vocabulary::Dropout)),
            "completion" => Ok(Self::Fixed(Vocabulary::Completion)),
            other => Err(format!(
                "Unknown vocabulary '{other}'. Use: auto, dropout, or completion"
            )),
        }
    }
}

impl fmt::Display for VocabularyChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("auto"),
            Self::Fixed(vocabulary) => write!(f, "{vocabulary}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_english_and_portuguese_labels() {
        assert_eq!(Status::from_label("Active"), Some(Status::Active));
        assert_eq!(Status::from_label(" ativo "), Some(Status::Active));
        assert_eq!(Status::from_label("DIPLOMADO"), Some(Status::Graduated));
        assert_eq!(Status::from_label("Desistente"), Some(Status::Withdrawn));
        assert_eq!(Status::from_label("Evadido"), Some(Status::Dropped));
        assert_eq!(Status::from_label("Trancado"), None);
    }

    #[test]
    fn unknown_status_label_is_an_error() {
        assert_eq!("graduated".parse::<Status>().ok(), Some(Status::Graduated));
        assert!(matches!(
            "Trancado".parse::<Status>(),
            Err(CohortError::UnknownStatus(label)) if label == "Trancado"
        ));
    }

    #[test]
    fn vocabularies_partition_statuses() {
        assert!(Vocabulary::Dropout.recognizes(Status::Dropped));
        assert!(!Vocabulary::Dropout.recognizes(Status::Graduated));
        assert!(Vocabulary::Completion.recognizes(Status::Withdrawn));
        assert!(!Vocabulary::Completion.recognizes(Status::Dropped));

        assert!(Vocabulary::Completion.is_terminal(Status::Graduated));
        assert!(!Vocabulary::Completion.is_terminal(Status::Active));
        assert!(Vocabulary::Dropout.is_terminal(Status::Dropped));
    }

    #[test]
    fn detects_vocabulary_from_statuses() {
        assert_eq!(
            Vocabulary::detect([Status::Active, Status::Dropped]),
            Vocabulary::Dropout
        );
        assert_eq!(
            Vocabulary::detect([Status::Active, Status::Graduated]),
            Vocabulary::Completion
        );
        assert_eq!(Vocabulary::detect(std::iter::empty()), Vocabulary::Dropout);
    }

    #[test]
    fn vocabulary_choice_from_str() {
        assert_eq!("auto".parse::<VocabularyChoice>(), Ok(VocabularyChoice::Auto));
        assert_eq!(
            "Completion".parse::<VocabularyChoice>(),
            Ok(VocabularyChoice::Fixed(Vocabulary::Completion))
        );
        assert_eq!(
            "legacy".parse::<VocabularyChoice>(),
            Ok(VocabularyChoice::Fixed(Vocabulary::Dropout))
        );
        assert!("other".parse::<VocabularyChoice>().is_err());
    }
}
