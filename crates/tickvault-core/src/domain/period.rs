use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use time::{Date, Month};

use crate::ValidationError;

const MIN_YEAR: i32 = 1900;
const MAX_YEAR: i32 = 2100;

/// Calendar-year period for a history request.
///
/// Defines the inclusive date range `[year-01-01, year-12-31]`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "i32", into = "i32")]
pub struct Period(i32);

impl Period {
    pub fn new(year: i32) -> Result<Self, ValidationError> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(ValidationError::YearOutOfRange {
                year,
                min: MIN_YEAR,
                max: MAX_YEAR,
            });
        }
        Ok(Self(year))
    }

    pub const fn year(self) -> i32 {
        self.0
    }

    /// January 1 of the period year.
    pub fn first_day(self) -> Date {
        Date::from_calendar_date(self.0, Month::January, 1)
            .expect("January 1 exists for every supported year")
    }

    /// December 31 of the period year.
    pub fn last_day(self) -> Date {
        Date::from_calendar_date(self.0, Month::December, 31)
            .expect("December 31 exists for every supported year")
    }

    /// UTC unix-second window covering the whole period: midnight of
    /// January 1 up to (exclusive) midnight of January 1 of the next year,
    /// so December 31 trades are included.
    pub fn unix_window(self) -> (i64, i64) {
        let start = self.first_day().midnight().assume_utc().unix_timestamp();
        let end = Date::from_calendar_date(self.0 + 1, Month::January, 1)
            .expect("January 1 exists for every supported year")
            .midnight()
            .assume_utc()
            .unix_timestamp();
        (start, end)
    }

    /// Whether `date` falls inside the period.
    pub fn contains(self, date: Date) -> bool {
        date.year() == self.0
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i32> for Period {
    type Error = ValidationError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Period> for i32 {
    fn from(value: Period) -> Self {
        value.year()
    }
}
