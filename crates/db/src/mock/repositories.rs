use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::mock;
use slotbook_core::{
    errors::BookingResult,
    models::{
        actor::ActorRef,
        appointment::{Appointment, AppointmentDraft, AppointmentPatch, SearchQuery},
    },
    store::AppointmentStore,
};
use uuid::Uuid;

// Mock store for testing callers of the booking service
mock! {
    pub AppointmentRepo {}

    #[async_trait]
    impl AppointmentStore for AppointmentRepo {
        async fn insert(
            &self,
            draft: &AppointmentDraft,
            owner: &ActorRef,
            created_at: DateTime<Utc>,
        ) -> BookingResult<Appointment>;

        async fn get(&self, id: Uuid) -> BookingResult<Option<Appointment>>;

        async fn update(&self, id: Uuid, patch: &AppointmentPatch) -> BookingResult<Appointment>;

        async fn cancel(&self, id: Uuid) -> BookingResult<Appointment>;

        async fn search(&self, query: &SearchQuery) -> BookingResult<Vec<Appointment>>;

        async fn list_range(
            &self,
            from: DateTime<Utc>,
            to: DateTime<Utc>,
            include_cancelled: bool,
        ) -> BookingResult<Vec<Appointment>>;

        async fn list_all(&self, include_cancelled: bool) -> BookingResult<Vec<Appointment>>;
    }
}
