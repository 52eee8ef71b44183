//! HTTP routes for session endpoints.

use axum::{
    routing::get,
    Router,
};

use super::handlers::{
    create_session, delete_session, get_session, list_published, list_sessions, update_session,
    SessionApiState,
};

/// Creates the session router with all endpoints.
///
/// `/published` is registered alongside `/:id`; the literal segment wins
/// during matching, so the public listing never collides with id lookup.
pub fn session_routes(state: SessionApiState) -> Router {
    Router::new()
        .route("/", get(list_sessions).post(create_session))
        .route("/published", get(list_published))
        .route(
            "/:id",
            get(get_session).put(update_session).delete(delete_session),
        )
        .with_state(state)
}
