//! Canonical bookable slots for a week.

use chrono::NaiveDate;

use crate::calendar::{BusinessCalendar, WeekWindow};
use crate::errors::BookingResult;
use crate::models::slot::Slot;

/// Every slot of the week starting at `week_start`, ordered by date then
/// start time. Fails with `InvalidWeekStart` unless `week_start` is a Monday.
pub fn generate_slots(calendar: &BusinessCalendar, week_start: NaiveDate) -> BookingResult<Vec<Slot>> {
    let window = WeekWindow::starting(week_start)?;
    Ok(slots_in_window(calendar, &window))
}

pub fn slots_in_window(calendar: &BusinessCalendar, window: &WeekWindow) -> Vec<Slot> {
    let starts = calendar.slot_starts();
    window
        .days()
        .filter(|day| calendar.is_business_day(*day))
        .flat_map(|day| starts.iter().map(move |start| Slot::new(day, *start)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::BookingError;
    use chrono::{Datelike, Duration, NaiveTime, Weekday};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(NaiveDate::from_ymd_opt(2025, 2, 10).unwrap())]
    #[case(NaiveDate::from_ymd_opt(2024, 12, 30).unwrap())]
    #[case(NaiveDate::from_ymd_opt(2028, 2, 28).unwrap())]
    fn week_has_eighty_weekday_slots(#[case] monday: NaiveDate) {
        let calendar = BusinessCalendar::default();
        let slots = generate_slots(&calendar, monday).unwrap();

        assert_eq!(slots.len(), 80);
        let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        let five = NaiveTime::from_hms_opt(17, 0, 0).unwrap();
        for slot in &slots {
            assert!(!matches!(slot.date().weekday(), Weekday::Sat | Weekday::Sun));
            assert!(slot.start_time() >= nine);
            assert!(slot.end_time() <= five);
            assert_eq!(slot.end_time() - slot.start_time(), Duration::minutes(30));
            assert_eq!(slot.datetime_key().date_naive(), slot.date());
        }
    }

    #[test]
    fn slots_are_ordered_by_date_then_time() {
        let slots = generate_slots(
            &BusinessCalendar::default(),
            NaiveDate::from_ymd_opt(2025, 2, 10).unwrap(),
        )
        .unwrap();

        assert!(slots.windows(2).all(|w| w[0].datetime_key() < w[1].datetime_key()));
        assert_eq!(slots[0].date(), NaiveDate::from_ymd_opt(2025, 2, 10).unwrap());
        assert_eq!(slots[79].date(), NaiveDate::from_ymd_opt(2025, 2, 14).unwrap());
        assert_eq!(slots[79].start_time(), NaiveTime::from_hms_opt(16, 30, 0).unwrap());
    }

    #[test]
    fn generation_is_deterministic() {
        let calendar = BusinessCalendar::default();
        let monday = NaiveDate::from_ymd_opt(2025, 2, 10).unwrap();
        assert_eq!(
            generate_slots(&calendar, monday).unwrap(),
            generate_slots(&calendar, monday).unwrap()
        );
    }

    #[test]
    fn non_monday_is_rejected() {
        let wednesday = NaiveDate::from_ymd_opt(2025, 2, 12).unwrap();
        let err = generate_slots(&BusinessCalendar::default(), wednesday).unwrap_err();
        assert!(matches!(err, BookingError::InvalidWeekStart(_)));
    }
}
