use axum::{
    Router,
    routing::{get, patch},
};
use std::sync::Arc;

use crate::{ApiState, handlers::appointments};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/appointments",
            get(appointments::list_appointments).post(appointments::create_appointment),
        )
        .route("/api/appointments/search", get(appointments::search_appointments))
        .route(
            "/api/appointments/:id",
            patch(appointments::edit_appointment).delete(appointments::cancel_appointment),
        )
}
