use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

use crate::calendar::SLOT_MINUTES;

/// A generated, immutable 30 minute bookable window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Slot {
    date: NaiveDate,
    start_time: NaiveTime,
    end_time: NaiveTime,
    datetime_key: DateTime<Utc>,
}

impl Slot {
    pub fn new(date: NaiveDate, start_time: NaiveTime) -> Self {
        let datetime_key = date.and_time(start_time).and_utc();
        Self {
            date,
            start_time,
            end_time: start_time + chrono::Duration::minutes(SLOT_MINUTES),
            datetime_key,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn start_time(&self) -> NaiveTime {
        self.start_time
    }

    pub fn end_time(&self) -> NaiveTime {
        self.end_time
    }

    /// The UTC instant that identifies this slot.
    pub fn datetime_key(&self) -> DateTime<Utc> {
        self.datetime_key
    }
}
