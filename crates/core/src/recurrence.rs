//! Weekly recurrence of a booking draft.

use chrono::Duration;

use crate::errors::{BookingError, BookingResult};
use crate::models::appointment::AppointmentDraft;

/// Largest number of extra weekly occurrences a single request may ask for.
pub const MAX_REPEAT: i64 = 4;

/// The base draft followed by `repeat_count` copies, each shifted by one
/// more week. Conflicts are not checked here; every occurrence goes through
/// the store's own validation.
pub fn expand(base: &AppointmentDraft, repeat_count: i64) -> BookingResult<Vec<AppointmentDraft>> {
    if !(0..=MAX_REPEAT).contains(&repeat_count) {
        return Err(BookingError::Validation(format!(
            "Repeat count must be between 0 and {}, got {}",
            MAX_REPEAT, repeat_count
        )));
    }

    (0..=repeat_count)
        .map(|week| {
            let shift = Duration::weeks(week);
            let shifted = base
                .start_time
                .checked_add_signed(shift)
                .zip(base.end_time.checked_add_signed(shift));
            match shifted {
                Some((start_time, end_time)) => Ok(AppointmentDraft {
                    start_time,
                    end_time,
                    ..base.clone()
                }),
                None => Err(BookingError::Validation(format!(
                    "Occurrence {} falls outside the supported date range",
                    week + 1
                ))),
            }
        })
        .collect()
}
