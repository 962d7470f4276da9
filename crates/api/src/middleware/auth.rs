//! # Authentication Module
//!
//! Every `/api` request carries an opaque bearer credential in the
//! `Authorization` header. An [`ActorResolver`] turns it into the
//! [`ActorRef`] recorded as the owner of new appointments; the booking engine
//! itself never looks inside the credential.
//!
//! Handlers opt in by taking an [`Authenticated`] argument:
//!
//! ```ignore
//! async fn handler(Authenticated(ctx): Authenticated) -> Result<Json<()>, AppError> {
//!     tracing::info!("called by {}", ctx.actor);
//!     Ok(Json(()))
//! }
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use slotbook_core::{
    errors::BookingError,
    models::actor::{ActorRef, Credential, RequestContext},
};
use tracing::debug;

use crate::{ApiState, middleware::error_handling::AppError};

/// Resolves a bearer credential to the actor it belongs to.
pub trait ActorResolver: Send + Sync {
    /// Returns `None` when the credential is not recognized.
    fn resolve(&self, credential: &Credential) -> Option<ActorRef>;
}

/// Resolver backed by a fixed `token -> actor` table (the `API_TOKENS` setting).
#[derive(Debug, Clone, Default)]
pub struct StaticTokenResolver {
    tokens: HashMap<String, ActorRef>,
}

impl StaticTokenResolver {
    pub fn new(tokens: HashMap<String, String>) -> Self {
        Self {
            tokens: tokens
                .into_iter()
                .map(|(token, actor)| (token, ActorRef::new(actor)))
                .collect(),
        }
    }
}

impl ActorResolver for StaticTokenResolver {
    fn resolve(&self, credential: &Credential) -> Option<ActorRef> {
        self.tokens.get(credential.expose()).cloned()
    }
}

/// Extractor yielding the [`RequestContext`] of an authenticated caller.
///
/// Rejects with `401 Unauthorized` when the header is missing, is not a
/// bearer credential, or names an unknown credential.
#[derive(Debug, Clone)]
pub struct Authenticated(pub RequestContext);

/// Pulls the token out of an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

#[async_trait]
impl FromRequestParts<Arc<ApiState>> for Authenticated {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<ApiState>) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                AppError(BookingError::Authentication(
                    "Missing Authorization header".to_string(),
                ))
            })?;

        let token = bearer_token(header).ok_or_else(|| {
            AppError(BookingError::Authentication(
                "Expected a bearer credential".to_string(),
            ))
        })?;

        let credential = Credential::new(token);
        let actor = state.resolver.resolve(&credential).ok_or_else(|| {
            debug!("Rejected unknown credential");
            AppError(BookingError::Authentication("Unknown credential".to_string()))
        })?;

        Ok(Authenticated(RequestContext::new(credential, actor)))
    }
}
