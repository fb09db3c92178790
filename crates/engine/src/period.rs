use std::{fmt, str::FromStr};

use api_types::PeriodQuery;
use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::EngineError;

/// The month a screen is looking at.
///
/// Passed explicitly to every load so that two screens can look at different
/// months without sharing hidden state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    /// Validates `month` and keeps `year` within the range chrono can
    /// represent, so every period has a first day.
    pub fn new(year: i32, month: u32) -> Result<Self, EngineError> {
        if !(1..=12).contains(&month) {
            return Err(EngineError::InvalidPeriod(format!(
                "month must be 1..=12, got {month}"
            )));
        }
        let (min, max) = year_range();
        if !(min..=max).contains(&year) {
            return Err(EngineError::InvalidPeriod(format!(
                "year must be {min}..={max}, got {year}"
            )));
        }
        Ok(Self { year, month })
    }

    /// The period containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The current month in the user's timezone.
    pub fn current(tz: Tz) -> Self {
        Self::containing(Utc::now().with_timezone(&tz).date_naive())
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }

    /// Moves by `months`, negative values going back in time.
    ///
    /// Saturates at the first and last representable months.
    #[must_use]
    pub fn offset(self, months: i32) -> Self {
        let (min, max) = year_range();
        let index = (i64::from(self.year) * 12 + i64::from(self.month) - 1 + i64::from(months))
            .clamp(i64::from(min) * 12, i64::from(max) * 12 + 11);
        Self {
            year: index.div_euclid(12) as i32,
            month: index.rem_euclid(12) as u32 + 1,
        }
    }

    #[must_use]
    pub fn next(self) -> Self {
        self.offset(1)
    }

    #[must_use]
    pub fn prev(self) -> Self {
        self.offset(-1)
    }

    pub fn first_day(self) -> Result<NaiveDate, EngineError> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .ok_or_else(|| EngineError::InvalidPeriod(format!("{self} is out of range")))
    }

    /// Half-open `[start, end)` UTC range covering the month in `tz`.
    pub fn bounds(self, tz: Tz) -> Result<(DateTime<Utc>, DateTime<Utc>), EngineError> {
        let next = self.next();
        if next == self {
            return Err(EngineError::InvalidPeriod(format!("no month after {self}")));
        }
        let start = local_midnight(self.first_day()?, tz)?;
        let end = local_midnight(next.first_day()?, tz)?;
        Ok((start, end))
    }

    /// `YYYY-MM`.
    pub fn label(self) -> String {
        self.to_string()
    }

    pub fn query(self) -> PeriodQuery {
        PeriodQuery {
            year: self.year,
            month: self.month,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Period {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidPeriod(format!("expected YYYY-MM, got {s:?}"));
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month)
    }
}

fn year_range() -> (i32, i32) {
    (NaiveDate::MIN.year(), NaiveDate::MAX.year())
}

/// Parses an IANA timezone name (e.g. `Europe/Rome`).
pub fn parse_timezone(name: &str) -> Result<Tz, EngineError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|err| EngineError::InvalidConfig(format!("timezone {name:?}: {err}")))
}

fn local_midnight(date: NaiveDate, tz: Tz) -> Result<DateTime<Utc>, EngineError> {
    let naive = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| EngineError::InvalidPeriod(format!("no midnight on {date}")))?;
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| EngineError::InvalidPeriod(format!("no local midnight on {date}")))
}
