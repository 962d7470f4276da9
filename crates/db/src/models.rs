use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use slotbook_core::models::{actor::ActorRef, appointment::Appointment};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAppointment {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub reason: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub cancelled: bool,
    pub owner_ref: String,
    pub created_at: DateTime<Utc>,
}

impl From<DbAppointment> for Appointment {
    fn from(row: DbAppointment) -> Self {
        Appointment {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            reason: row.reason,
            start_time: row.start_time,
            end_time: row.end_time,
            cancelled: row.cancelled,
            owner_ref: ActorRef::new(row.owner_ref),
            created_at: row.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    #[test]
    fn row_converts_to_appointment() {
        let now = Utc::now();
        let row = DbAppointment {
            id: Uuid::new_v4(),
            name: "Alice".to_string(),
            email: "a@b.com".to_string(),
            phone: None,
            reason: Some("Checkup".to_string()),
            start_time: now,
            end_time: now + Duration::minutes(30),
            cancelled: true,
            owner_ref: "front-desk".to_string(),
            created_at: now,
        };

        let appointment = Appointment::from(row.clone());
        assert_eq!(appointment.id, row.id);
        assert_eq!(appointment.owner_ref.as_str(), "front-desk");
        assert!(appointment.cancelled);
        assert_eq!(appointment.reason, row.reason);
    }
}
