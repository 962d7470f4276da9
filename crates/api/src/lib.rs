//! # SlotBook API
//!
//! The API crate provides the web server for the SlotBook appointment
//! booking engine. It exposes availability, booking, editing, cancellation
//! and search over HTTP.
//!
//! ## Architecture
//!
//! This crate follows a layered architecture:
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Translate HTTP requests into booking service calls
//! - **Middleware**: Bearer credential extraction and error mapping
//! - **Config**: Environment and application configuration
//!
//! The API uses Axum as the web framework. Persistence is whichever
//! `AppointmentStore` the binary hands over (PostgreSQL or in-memory).

/// Configuration module for API settings
pub mod config;
/// Request handlers that call into the booking service
pub mod handlers;
/// Middleware for authentication and error handling
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::{Router, http::HeaderValue};
use eyre::Result;
use slotbook_core::{service::BookingService, store::AppointmentStore};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

use crate::middleware::auth::{ActorResolver, StaticTokenResolver};

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    /// The booking engine
    pub service: BookingService,
    /// Resolves bearer credentials to actors
    pub resolver: Arc<dyn ActorResolver>,
}

impl ApiState {
    pub fn new(service: BookingService, resolver: Arc<dyn ActorResolver>) -> Self {
        Self { service, resolver }
    }
}

/// Builds the application router with all routes attached to `state`.
///
/// # Example
///
/// ```ignore
/// let state = Arc::new(ApiState::new(service, resolver));
/// let app = build_router(state);
/// ```
pub fn build_router(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Availability endpoints
        .merge(routes::availability::routes())
        // Appointment management endpoints
        .merge(routes::appointments::routes())
        // Attach shared state to all routes
        .with_state(state)
}

/// Installs the global tracing subscriber at `level`.
///
/// Call once, before anything logs; a second call fails.
pub fn init_tracing(level: Level) -> Result<()> {
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Starts the API server with the provided configuration and store
///
/// This function wires the booking service to the store, configures routes
/// and middleware, and starts the HTTP server. Logging is expected to be
/// set up already with [`init_tracing`].
///
/// # Arguments
///
/// * `config` - API configuration including host, port, and other settings
/// * `store` - Appointment store backing the booking service
///
/// # Returns
///
/// * `Result<()>` - Success or error result
pub async fn start_server(config: config::ApiConfig, store: Arc<dyn AppointmentStore>) -> Result<()> {
    if config.api_tokens.is_empty() {
        warn!("API_TOKENS is empty; every /api request will be rejected");
    }

    let service = BookingService::new(store).allow_past_bookings(config.allow_past_bookings);
    let resolver = Arc::new(StaticTokenResolver::new(config.api_tokens.clone()));
    let state = Arc::new(ApiState::new(service, resolver));

    let app = build_router(state);

    // Apply CORS configuration if origins are specified
    let app = if let Some(origins) = &config.cors_origins {
        let allowed = origins
            .iter()
            .filter_map(|origin| match origin.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!("Ignoring invalid CORS origin: {}", origin);
                    None
                }
            })
            .collect::<Vec<_>>();

        let cors = CorsLayer::new()
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::PATCH,
                axum::http::Method::DELETE,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers([
                axum::http::header::CONTENT_TYPE,
                axum::http::header::AUTHORIZATION,
                axum::http::header::ACCEPT,
            ])
            .allow_origin(allowed)
            .allow_credentials(true);

        app.layer(cors)
    } else {
        app
    };

    // Request timeout and request tracing
    let app = app.layer(
        tower::ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout))),
    );

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
