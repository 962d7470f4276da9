//! # Availability Matching
//!
//! Classifies generated slots as free or taken by the active bookings.
//!
//! Both sides are keyed by `DateTime<Utc>`: a slot's datetime key and an
//! appointment's start time. Edge normalization guarantees the two
//! representations agree, so matching is plain equality on instants.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use tracing::error;

use crate::errors::{BookingError, BookingResult};
use crate::models::{appointment::Appointment, booking::Availability, slot::Slot};

/// Splits `slots` into available ones and a `datetime key -> appointment`
/// map of the booked ones.
///
/// Cancelled appointments never occupy a slot. Bookings that do not start on
/// one of `slots` are ignored.
///
/// # Errors
///
/// * `BookingError::AmbiguousBooking` - two active appointments share a start
///   time. The store's uniqueness guarantee makes this a consistency bug.
pub fn match_slots(slots: &[Slot], bookings: &[Appointment]) -> BookingResult<Availability> {
    let mut active: HashMap<DateTime<Utc>, &Appointment> = HashMap::new();
    for booking in bookings.iter().filter(|b| !b.cancelled) {
        if let Some(existing) = active.insert(booking.start_time, booking) {
            error!(
                "Two active appointments share slot {}: {} and {}",
                booking.start_time, existing.id, booking.id
            );
            return Err(BookingError::AmbiguousBooking(booking.start_time));
        }
    }

    let mut available = Vec::with_capacity(slots.len());
    let mut booked = BTreeMap::new();
    for slot in slots {
        match active.get(&slot.datetime_key()) {
            Some(appointment) => {
                booked.insert(slot.datetime_key(), (*appointment).clone());
            }
            None => available.push(*slot),
        }
    }

    Ok(Availability { available, booked })
}
