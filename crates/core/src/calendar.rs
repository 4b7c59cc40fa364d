#![forbid(unsafe_code)]

use std::fmt;

/// A civil calendar day. Ordering is chronological, the canonical text form is
/// ISO `YYYY-MM-DD`, which also sorts chronologically as a plain string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Day {
    year: i32,
    month: u8,
    day: u8,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DayParseError {
    Empty,
    InvalidFormat,
    OutOfRange,
}

impl DayParseError {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Empty => "date must not be empty",
            Self::InvalidFormat => "date must be YYYY-MM-DD",
            Self::OutOfRange => "date is not a valid calendar day",
        }
    }
}

impl Day {
    /// 1970-01-01, the epoch of the day-counting algorithms below.
    pub const UNIX_EPOCH: Day = Day {
        year: 1970,
        month: 1,
        day: 1,
    };

    pub fn try_new(year: i32, month: u8, day: u8) -> Result<Self, DayParseError> {
        if !(1..=12).contains(&month) {
            return Err(DayParseError::OutOfRange);
        }
        if day < 1 || day > days_in_month(year, month) {
            return Err(DayParseError::OutOfRange);
        }
        Ok(Self { year, month, day })
    }

    /// Accepts exactly the canonical form: four digit year, two digit month,
    /// two digit day, `-` separators.
    pub fn parse(value: &str) -> Result<Self, DayParseError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(DayParseError::Empty);
        }
        let bytes = value.as_bytes();
        if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
            return Err(DayParseError::InvalidFormat);
        }
        let digits = |range: std::ops::Range<usize>| -> Result<i32, DayParseError> {
            let mut out = 0i32;
            for &b in &bytes[range] {
                if !b.is_ascii_digit() {
                    return Err(DayParseError::InvalidFormat);
                }
                out = out * 10 + i32::from(b - b'0');
            }
            Ok(out)
        };
        let year = digits(0..4)?;
        let month = digits(5..7)? as u8;
        let day = digits(8..10)? as u8;
        Self::try_new(year, month, day)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn day(&self) -> u8 {
        self.day
    }

    /// 1..=4. January through March fall in quarter 1.
    pub fn quarter(&self) -> u8 {
        (self.month - 1) / 3 + 1
    }

    /// First and last day of the quarter containing this day.
    pub fn quarter_bounds(&self) -> (Day, Day) {
        let first_month = (self.quarter() - 1) * 3 + 1;
        let last_month = first_month + 2;
        (
            Day {
                year: self.year,
                month: first_month,
                day: 1,
            },
            Day {
                year: self.year,
                month: last_month,
                day: days_in_month(self.year, last_month),
            },
        )
    }

    /// First and last day of the month containing this day.
    pub fn month_bounds(&self) -> (Day, Day) {
        (
            Day {
                year: self.year,
                month: self.month,
                day: 1,
            },
            Day {
                year: self.year,
                month: self.month,
                day: days_in_month(self.year, self.month),
            },
        )
    }

    /// 0 = Sunday .. 6 = Saturday.
    pub fn days_from_sunday(&self) -> u8 {
        // 1970-01-01 (day zero) was a Thursday.
        ((self.to_epoch_days() + 4).rem_euclid(7)) as u8
    }

    /// Sunday..Saturday bounds of the week containing this day.
    pub fn week_sunday_bounds(&self) -> (Day, Day) {
        let start = self.add_days(-i64::from(self.days_from_sunday()));
        (start, start.add_days(6))
    }

    /// Ordinal of the 7-day slice of the month this day falls in: days 1-7
    /// are week 1, days 8-14 week 2, and so on.
    pub fn week_of_month(&self) -> u8 {
        (self.day - 1) / 7 + 1
    }

    pub fn add_days(&self, delta: i64) -> Day {
        from_epoch_days(self.to_epoch_days() + delta)
    }

    fn to_epoch_days(&self) -> i64 {
        days_from_civil(self.year, self.month, self.day)
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

pub fn days_in_month(year: i32, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 0,
    }
}

// Howard Hinnant's civil calendar algorithms; day zero is 1970-01-01.

fn days_from_civil(year: i32, month: u8, day: u8) -> i64 {
    let y = i64::from(year) - i64::from(month <= 2);
    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = y - era * 400;
    let mp = (i64::from(month) + 9) % 12;
    let doy = (153 * mp + 2) / 5 + i64::from(day) - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146097 + doe - 719468
}

fn from_epoch_days(days: i64) -> Day {
    let z = days + 719468;
    let era = if z >= 0 { z } else { z - 146096 } / 146097;
    let doe = z - era * 146097;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u8;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u8;
    Day {
        year: (y + i64::from(month <= 2)) as i32,
        month,
        day,
    }
}
