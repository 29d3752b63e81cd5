//! Academic periods encoded as `"<year>/<term>"`

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// An academic year/term pair such as `2019/2`.
///
/// Terms are numbered from 1. Semester datasets use 1 and 2, but quarter
/// or summer terms (`2019/3`, `2019/4`) are accepted too; term 0 is not.
///
/// Ordering is chronological: by year, then by term. Periods never compare
/// lexically, so `2019/10` sorts after `2019/2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Period {
    /// Calendar year
    pub year: i32,
    /// Term within the year, starting at 1
    pub term: u8,
}

impl Period {
    /// Create a period from its parts
    #[must_use]
    pub const fn new(year: i32, term: u8) -> Self {
        Self { year, term }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.year, self.term)
    }
}

/// Returned when a string is not `<integer>/<term>` with a term of at least 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsePeriodError;

impl fmt::Display for ParsePeriodError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("expected <year>/<term>")
    }
}

impl std::error::Error for ParsePeriodError {}

impl FromStr for Period {
    type Err = ParsePeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, term) = s.trim().split_once('/').ok_or(ParsePeriodError)?;
        let year = year.trim().parse::<i32>().map_err(|_| ParsePeriodError)?;
        let term = term.trim().parse::<u8>().map_err(|_| ParsePeriodError)?;
        if term == 0 {
            return Err(ParsePeriodError);
        }
        Ok(Self { year, term })
    }
}
