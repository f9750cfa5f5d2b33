use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::SheetError;

/// A calendar month, written `YYYY-MM`.
///
/// Ordering is chronological: the year is compared first, then the month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Month {
    year: i32,
    month: u32,
}

impl Month {
    /// Builds a month from its parts, rejecting anything outside `1..=12`.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self::from)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// First day of the month.
    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default()
    }

    /// The following calendar month, rolling over the year boundary.
    pub fn succ(&self) -> Option<Month> {
        self.first_day()
            .checked_add_months(Months::new(1))
            .map(Month::from)
    }

    /// Short human label such as `Jan 2024`.
    pub fn label(&self) -> String {
        self.first_day().format("%b %Y").to_string()
    }

    fn ordinal(&self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month) - 1
    }
}

impl Default for Month {
    fn default() -> Self {
        Self::from(NaiveDate::default())
    }
}

impl From<NaiveDate> for Month {
    fn from(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Month {
    type Err = SheetError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || SheetError::InvalidMonth(raw.to_string());
        let trimmed = raw.trim();
        let (year, month) = trimmed.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        if !year.chars().chain(month.chars()).all(|ch| ch.is_ascii_digit()) {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Month::new(year, month).ok_or_else(invalid)
    }
}

impl TryFrom<String> for Month {
    type Error = SheetError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Month> for String {
    fn from(month: Month) -> Self {
        month.to_string()
    }
}

/// Signed number of month steps from `start` to `end`.
///
/// Negative when `end` precedes `start`.
pub fn months_between(start: Month, end: Month) -> i64 {
    end.ordinal() - start.ordinal()
}

/// Ordered, gap-free sequence of months between two endpoints, inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MonthRange {
    months: Vec<Month>,
}

impl MonthRange {
    /// Every month from `start` to `end` inclusive. Empty when `end` precedes `start`.
    pub fn between(start: Month, end: Month) -> Self {
        let capacity = usize::try_from(months_between(start, end) + 1).unwrap_or(0);
        let mut months = Vec::with_capacity(capacity);
        let mut cursor = Some(start);
        while let Some(month) = cursor {
            if month > end {
                break;
            }
            months.push(month);
            cursor = month.succ();
        }
        Self { months }
    }

    /// Parses both endpoints; unparsable input degrades to an empty range.
    pub fn parse(start: &str, end: &str) -> Self {
        match (start.parse::<Month>(), end.parse::<Month>()) {
            (Ok(start), Ok(end)) => {
                if end < start {
                    tracing::warn!(%start, %end, "month range ends before it starts");
                }
                Self::between(start, end)
            }
            (Err(err), _) | (_, Err(err)) => {
                tracing::warn!(error = %err, "ignoring unparsable month range");
                Self::default()
            }
        }
    }

    pub fn months(&self) -> &[Month] {
        &self.months
    }

    pub fn iter(&self) -> impl Iterator<Item = &Month> + '_ {
        self.months.iter()
    }

    pub fn len(&self) -> usize {
        self.months.len()
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    pub fn first(&self) -> Option<Month> {
        self.months.first().copied()
    }

    pub fn last(&self) -> Option<Month> {
        self.months.last().copied()
    }

    pub fn contains(&self, month: &Month) -> bool {
        self.months.binary_search(month).is_ok()
    }
}

impl<'a> IntoIterator for &'a MonthRange {
    type Item = &'a Month;
    type IntoIter = std::slice::Iter<'a, Month>;

    fn into_iter(self) -> Self::IntoIter {
        self.months.iter()
    }
}

/// Month-range generator over `YYYY-MM` strings.
pub fn month_range(start: &str, end: &str) -> Vec<Month> {
    MonthRange::parse(start, end).months
}
