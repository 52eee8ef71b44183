//! HTTP adapters - REST API implementation.
//!
//! - `envelope` - the `{success, statusCode, data, message}` response shape
//! - `middleware` - credential verification and identity extraction
//! - `session` - session endpoint DTOs, handlers, and routes

pub mod envelope;
pub mod middleware;
pub mod session;

use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::ports::TokenVerifier;
use middleware::auth_middleware;
use session::SessionApiState;

/// Builds the application router: session routes under `/api/sessions`,
/// auth middleware resolving credentials into request extensions, and
/// request tracing.
pub fn app_router(state: SessionApiState, verifier: Arc<dyn TokenVerifier>) -> Router {
    Router::new()
        .nest("/api/sessions", session::session_routes(state))
        .layer(axum::middleware::from_fn_with_state(
            verifier,
            auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
}
