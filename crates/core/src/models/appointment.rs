use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calendar::{self, BusinessCalendar};
use crate::errors::{BookingError, BookingResult};
use crate::models::actor::ActorRef;

pub const MAX_NAME_CHARS: usize = 200;
pub const MAX_EMAIL_CHARS: usize = 254;
pub const MAX_PHONE_CHARS: usize = 32;
pub const MAX_REASON_CHARS: usize = 200;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email pattern")
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub reason: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub cancelled: bool,
    pub owner_ref: ActorRef,
    pub created_at: DateTime<Utc>,
}

impl Appointment {
    /// Builds an active appointment from a validated draft.
    pub fn from_draft(draft: AppointmentDraft, owner_ref: ActorRef, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: draft.name,
            email: draft.email,
            phone: draft.phone,
            reason: draft.reason,
            start_time: draft.start_time,
            end_time: draft.end_time,
            cancelled: false,
            owner_ref,
            created_at,
        }
    }

    /// Case-insensitive substring match over the contact and reason fields.
    /// `needle` must already be lowercase.
    pub fn matches_text(&self, needle: &str) -> bool {
        [
            Some(self.name.as_str()),
            Some(self.email.as_str()),
            self.phone.as_deref(),
            self.reason.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(needle))
    }

    /// Applies a patch and returns the resulting record. `end_time` follows
    /// the (possibly new) start time.
    pub fn patched(&self, patch: &AppointmentPatch, calendar: &BusinessCalendar) -> Self {
        let mut next = self.clone();
        if let Some(name) = &patch.name {
            next.name = name.trim().to_string();
        }
        if let Some(email) = &patch.email {
            next.email = email.trim().to_string();
        }
        if let Some(phone) = &patch.phone {
            next.phone = non_blank(Some(phone.clone()));
        }
        if let Some(reason) = &patch.reason {
            next.reason = non_blank(Some(reason.clone()));
        }
        if let Some(start_time) = patch.start_time {
            next.start_time = start_time;
        }
        next.end_time = next.start_time + calendar.slot_length();
        next
    }

    pub fn validate(&self, calendar: &BusinessCalendar) -> BookingResult<()> {
        validate_contact(&self.name, &self.email, self.phone.as_deref(), self.reason.as_deref())?;
        calendar.check_slot(self.start_time, self.end_time)
    }
}

/// The caller-supplied part of a new appointment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentDraft {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(deserialize_with = "calendar::instant::deserialize")]
    pub start_time: DateTime<Utc>,
    #[serde(deserialize_with = "calendar::instant::deserialize")]
    pub end_time: DateTime<Utc>,
}

impl AppointmentDraft {
    /// Trims text fields and drops blank optional ones.
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: non_blank(self.phone),
            reason: non_blank(self.reason),
            ..self
        }
    }

    pub fn validate(&self, calendar: &BusinessCalendar) -> BookingResult<()> {
        validate_contact(&self.name, &self.email, self.phone.as_deref(), self.reason.as_deref())?;
        calendar.check_slot(self.start_time, self.end_time)
    }
}

/// Fields an existing appointment may change. The end time is not listed:
/// it is always derived from the start time.
///
/// A blank `phone` or `reason` clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default, deserialize_with = "calendar::instant::option::deserialize")]
    pub start_time: Option<DateTime<Utc>>,
}

/// Filter for the free-text search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub text: String,
    pub on_date: Option<chrono::NaiveDate>,
    pub include_cancelled: bool,
}

impl SearchQuery {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            on_date: None,
            include_cancelled: true,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// The lowercase needle used for substring matching.
    pub fn needle(&self) -> String {
        self.text.trim().to_lowercase()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn validate_contact(name: &str, email: &str, phone: Option<&str>, reason: Option<&str>) -> BookingResult<()> {
    let name_len = name.trim().chars().count();
    if name_len == 0 {
        return Err(BookingError::Validation("Name is required".to_string()));
    }
    if name_len > MAX_NAME_CHARS {
        return Err(BookingError::Validation(format!(
            "Name must be at most {} characters",
            MAX_NAME_CHARS
        )));
    }

    let email = email.trim();
    if email.is_empty() {
        return Err(BookingError::Validation("Email is required".to_string()));
    }
    if email.chars().count() > MAX_EMAIL_CHARS || !EMAIL_PATTERN.is_match(email) {
        return Err(BookingError::Validation(format!("Invalid email address '{}'", email)));
    }

    if phone.is_some_and(|p| p.chars().count() > MAX_PHONE_CHARS) {
        return Err(BookingError::Validation(format!(
            "Phone must be at most {} characters",
            MAX_PHONE_CHARS
        )));
    }

    if reason.is_some_and(|r| r.chars().count() > MAX_REASON_CHARS) {
        return Err(BookingError::Validation(format!(
            "Reason must be at most {} characters",
            MAX_REASON_CHARS
        )));
    }

    Ok(())
}
