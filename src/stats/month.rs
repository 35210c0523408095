use std::{fmt::Display, str::FromStr};

use chrono::{Datelike, NaiveDate};
use thiserror::Error;

/// Calendar month used as a key when grouping sessions. Ordering is chronological, and the text
/// form is always `YYYY-MM` with a zero-padded month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum YearMonthError {
    #[error("month {0} is outside of 1..=12")]
    MonthOutOfRange(u32),
    #[error("can't parse \"{0}\" as YYYY-MM")]
    Malformed(String),
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, YearMonthError> {
        if (1..=12).contains(&month) {
            Ok(Self { year, month })
        } else {
            Err(YearMonthError::MonthOutOfRange(month))
        }
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// Number of days in the month, 28 to 31.
    pub fn days_in_month(&self) -> u32 {
        let next = if self.month == 12 {
            NaiveDate::from_ymd_opt(self.year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(self.year, self.month + 1, 1)
        };
        match (self.first_day(), next) {
            (Some(first), Some(next)) => (next - first).num_days() as u32,
            // Only reachable at the edges of chrono's supported range.
            _ => 31,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        Self::of(date) == *self
    }
}

impl Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = YearMonthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || YearMonthError::Malformed(s.to_owned());
        let (year, month) = s.trim().split_once('-').ok_or_else(malformed)?;
        if month.len() != 2 {
            return Err(malformed());
        }
        let year = year.parse::<i32>().map_err(|_| malformed())?;
        let month = month.parse::<u32>().map_err(|_| malformed())?;
        Self::new(year, month)
    }
}
