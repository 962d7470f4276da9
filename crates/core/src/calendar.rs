//! # Calendar
//!
//! Business hours, the slot grid and the week window. Everything here is pure
//! and stateless except [`Clock`], which is the single seam through which the
//! engine learns the current time.
//!
//! All instants are `DateTime<Utc>`. Input that arrives without an offset is
//! converted at the edge by [`parse_instant`] and never re-interpreted later.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc, Weekday};

use crate::errors::{BookingError, BookingResult};

/// Length of every slot and every appointment.
pub const SLOT_MINUTES: i64 = 30;

/// Number of bookable days in a week window (Monday to Friday).
pub const BUSINESS_DAYS: i64 = 5;

/// Years accepted from callers. Keeps every derived instant (slot ends,
/// weekly repeats, week windows) well inside chrono's representable range.
pub const YEAR_RANGE: std::ops::RangeInclusive<i32> = 1..=9999;

/// Opening hours and slot grid of the practice.
///
/// The default is 09:00 to 17:00 UTC in 30 minute steps, Monday to Friday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusinessCalendar {
    pub opens_at: NaiveTime,
    pub closes_at: NaiveTime,
}

impl Default for BusinessCalendar {
    fn default() -> Self {
        Self {
            opens_at: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN),
            closes_at: NaiveTime::from_hms_opt(17, 0, 0).unwrap_or(NaiveTime::MIN),
        }
    }
}

impl BusinessCalendar {
    pub fn slot_length(&self) -> Duration {
        Duration::minutes(SLOT_MINUTES)
    }

    pub fn is_business_day(&self, date: NaiveDate) -> bool {
        !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
    }

    /// Start times of every slot in a business day, in ascending order.
    pub fn slot_starts(&self) -> Vec<NaiveTime> {
        let mut starts = Vec::new();
        let mut current = self.opens_at;
        while current + self.slot_length() <= self.closes_at && current >= self.opens_at {
            starts.push(current);
            current += self.slot_length();
        }
        starts
    }

    /// Whether `time` sits exactly on the 30 minute grid.
    pub fn is_aligned(&self, time: NaiveTime) -> bool {
        time.second() == 0 && time.nanosecond() == 0 && i64::from(time.minute()) % SLOT_MINUTES == 0
    }

    /// Checks that `[start, end)` is exactly one bookable slot.
    ///
    /// Weekend days are reported as [`BookingError::Validation`] here; the
    /// booking service reports them as [`BookingError::InvalidDay`] before a
    /// write is attempted.
    pub fn check_slot(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> BookingResult<()> {
        if end - start != self.slot_length() {
            return Err(BookingError::Validation(format!(
                "Appointment duration must be exactly {} minutes",
                SLOT_MINUTES
            )));
        }

        let date = start.date_naive();
        if !self.is_business_day(date) {
            return Err(BookingError::Validation(format!(
                "Appointments cannot be on weekends ({})",
                date
            )));
        }

        let time = start.time();
        if !self.is_aligned(time) {
            return Err(BookingError::Validation(format!(
                "Start time must be in {}-minute increments",
                SLOT_MINUTES
            )));
        }

        if time < self.opens_at
            || time >= self.closes_at
            || time + self.slot_length() > self.closes_at
        {
            return Err(BookingError::Validation(format!(
                "Outside business hours ({} - {})",
                self.opens_at.format("%H:%M"),
                self.closes_at.format("%H:%M")
            )));
        }

        Ok(())
    }
}

/// `[week_start, week_start + 5 days)` anchored to a Monday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekWindow {
    monday: NaiveDate,
}

impl WeekWindow {
    /// Non-Mondays are rejected rather than snapped to the previous Monday.
    pub fn starting(week_start: NaiveDate) -> BookingResult<Self> {
        check_year(week_start)?;
        if week_start.weekday() != Weekday::Mon {
            return Err(BookingError::InvalidWeekStart(week_start));
        }
        Ok(Self { monday: week_start })
    }

    pub fn monday(&self) -> NaiveDate {
        self.monday
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        (0..BUSINESS_DAYS).map(|offset| self.monday + Duration::days(offset))
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.monday.and_time(NaiveTime::MIN).and_utc()
    }

    /// Exclusive upper bound (midnight at the start of Saturday).
    pub fn end(&self) -> DateTime<Utc> {
        self.start() + Duration::days(BUSINESS_DAYS)
    }
}

/// The Monday on or before `date`.
pub fn monday_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at a given instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

fn check_year(date: NaiveDate) -> BookingResult<()> {
    if YEAR_RANGE.contains(&date.year()) {
        Ok(())
    } else {
        Err(BookingError::Validation(format!(
            "Year {} is outside the supported range {}-{}",
            date.year(),
            YEAR_RANGE.start(),
            YEAR_RANGE.end()
        )))
    }
}

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parses a boundary timestamp into a UTC instant.
///
/// RFC 3339 values keep their offset and are converted to UTC. Values without
/// an offset are taken to be UTC already.
pub fn parse_instant(value: &str) -> BookingResult<DateTime<Utc>> {
    let value = value.trim();
    let instant = match DateTime::parse_from_rfc3339(value) {
        Ok(dt) => dt.with_timezone(&Utc),
        Err(_) => {
            let trimmed = value.strip_suffix('Z').unwrap_or(value);
            NAIVE_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
                .map(|naive| naive.and_utc())
                .ok_or_else(|| BookingError::Validation(format!("Invalid timestamp '{}'", value)))?
        }
    };

    check_year(instant.date_naive())?;
    Ok(instant)
}

/// Parses a `YYYY-MM-DD` calendar date.
pub fn parse_date(value: &str) -> BookingResult<NaiveDate> {
    let date = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        BookingError::Validation(format!("Invalid date '{}'. Expected YYYY-MM-DD", value))
    })?;
    check_year(date)?;
    Ok(date)
}

/// Serde adapter applying [`parse_instant`] to incoming timestamps.
pub mod instant {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_instant(&raw).map_err(serde::de::Error::custom)
    }

    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::{Deserialize, Deserializer};

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
        where
            D: Deserializer<'de>,
        {
            Option::<String>::deserialize(deserializer)?
                .map(|raw| crate::calendar::parse_instant(&raw).map_err(serde::de::Error::custom))
                .transpose()
        }
    }
}
