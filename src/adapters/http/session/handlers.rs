//! HTTP handlers for session endpoints.
//!
//! Handlers parse and validate the boundary, then delegate every
//! authorization decision to the lifecycle manager. Errors map centrally
//! to status codes here.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Response,
    Json,
};

use crate::adapters::http::envelope::{ApiFailure, ApiResponse};
use crate::adapters::http::middleware::{OptionalAuth, RequireAuth};
use crate::application::lifecycle::{
    CreateSessionCommand, SessionLifecycleManager, UpdateSessionCommand,
};
use crate::domain::foundation::SessionId;
use crate::domain::session::SessionError;

use super::dto::{SessionPayload, SessionResponse};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct SessionApiState {
    lifecycle: Arc<SessionLifecycleManager>,
    development: bool,
}

impl SessionApiState {
    pub fn new(lifecycle: Arc<SessionLifecycleManager>, development: bool) -> Self {
        Self {
            lifecycle,
            development,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/sessions - Create a session
pub async fn create_session(
    State(state): State<SessionApiState>,
    RequireAuth(user): RequireAuth,
    payload: Result<Json<SessionPayload>, JsonRejection>,
) -> Response {
    let payload = match parse_body(payload) {
        Ok(p) => p,
        Err(response) => return response,
    };

    if let Err(message) = payload.validate() {
        return ApiFailure::new(StatusCode::BAD_REQUEST, message).into_response();
    }

    let cmd = CreateSessionCommand {
        owner: user.id,
        fields: payload.into_fields(),
    };

    match state.lifecycle.create(cmd).await {
        Ok(session) => ApiResponse::new(
            StatusCode::CREATED,
            SessionResponse::from(session),
            "Session created successfully",
        )
        .into_response(),
        Err(e) => handle_session_error(e, state.development),
    }
}

/// GET /api/sessions - List the requester's sessions
pub async fn list_sessions(
    State(state): State<SessionApiState>,
    RequireAuth(user): RequireAuth,
) -> Response {
    match state.lifecycle.list_owned(&user.id).await {
        Ok(sessions) => {
            let items: Vec<SessionResponse> = sessions.iter().map(Into::into).collect();
            ApiResponse::new(StatusCode::OK, items, "Sessions retrieved successfully")
                .into_response()
        }
        Err(e) => handle_session_error(e, state.development),
    }
}

/// GET /api/sessions/published - List published sessions, no auth
pub async fn list_published(State(state): State<SessionApiState>) -> Response {
    match state.lifecycle.list_published().await {
        Ok(sessions) => {
            let items: Vec<SessionResponse> = sessions.iter().map(Into::into).collect();
            ApiResponse::new(StatusCode::OK, items, "Sessions retrieved successfully")
                .into_response()
        }
        Err(e) => handle_session_error(e, state.development),
    }
}

/// GET /api/sessions/:id - Read one session
///
/// Published sessions are readable by anyone; drafts only by their owner.
pub async fn get_session(
    State(state): State<SessionApiState>,
    OptionalAuth(user): OptionalAuth,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let requester = user.as_ref().map(|u| &u.id);
    match state.lifecycle.read(&session_id, requester).await {
        Ok(session) => ApiResponse::new(
            StatusCode::OK,
            SessionResponse::from(session),
            "Session retrieved successfully",
        )
        .into_response(),
        Err(e) => handle_session_error(e, state.development),
    }
}

/// PUT /api/sessions/:id - Update a session (full replacement)
pub async fn update_session(
    State(state): State<SessionApiState>,
    RequireAuth(user): RequireAuth,
    Path(session_id): Path<String>,
    payload: Result<Json<SessionPayload>, JsonRejection>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let payload = match parse_body(payload) {
        Ok(p) => p,
        Err(response) => return response,
    };

    if let Err(message) = payload.validate() {
        return ApiFailure::new(StatusCode::BAD_REQUEST, message).into_response();
    }

    let cmd = UpdateSessionCommand {
        session_id,
        requester: user.id,
        fields: payload.into_fields(),
    };

    match state.lifecycle.update(cmd).await {
        Ok(session) => ApiResponse::new(
            StatusCode::OK,
            SessionResponse::from(session),
            "Session updated successfully",
        )
        .into_response(),
        Err(e) => handle_session_error(e, state.development),
    }
}

/// DELETE /api/sessions/:id - Permanently delete a session
pub async fn delete_session(
    State(state): State<SessionApiState>,
    RequireAuth(user): RequireAuth,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.lifecycle.delete(&session_id, &user.id).await {
        Ok(()) => ApiResponse::new(
            StatusCode::OK,
            serde_json::json!({}),
            "Session deleted successfully",
        )
        .into_response(),
        Err(e) => handle_session_error(e, state.development),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Boundary helpers and error handling
// ════════════════════════════════════════════════════════════════════════════

fn parse_session_id(raw: &str) -> Result<SessionId, Response> {
    raw.parse::<SessionId>()
        .map_err(|_| ApiFailure::new(StatusCode::BAD_REQUEST, "Invalid session ID").into_response())
}

fn parse_body(
    payload: Result<Json<SessionPayload>, JsonRejection>,
) -> Result<SessionPayload, Response> {
    match payload {
        Ok(Json(payload)) => Ok(payload),
        Err(rejection) => Err(ApiFailure::new(
            StatusCode::BAD_REQUEST,
            format!("Invalid request body: {}", rejection.body_text()),
        )
        .into_response()),
    }
}

fn handle_session_error(error: SessionError, development: bool) -> Response {
    match error {
        SessionError::NotFound(_) => {
            ApiFailure::new(StatusCode::NOT_FOUND, "Session not found").into_response()
        }
        SessionError::Forbidden => ApiFailure::new(
            StatusCode::FORBIDDEN,
            "You don't have permission to access this session",
        )
        .into_response(),
        SessionError::Unauthenticated => {
            ApiFailure::new(StatusCode::UNAUTHORIZED, "Unauthorized request").into_response()
        }
        SessionError::ValidationFailed { message, .. } => {
            ApiFailure::new(StatusCode::BAD_REQUEST, message).into_response()
        }
        SessionError::Infrastructure(detail) => {
            tracing::error!("store failure: {}", detail);
            ApiFailure::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
                .with_stack(development, detail)
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::SessionId;

    #[test]
    fn not_found_maps_to_404() {
        let response = handle_session_error(SessionError::not_found(SessionId::new()), false);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn forbidden_maps_to_403() {
        let response = handle_session_error(SessionError::forbidden(), false);
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn unauthenticated_maps_to_401() {
        let response = handle_session_error(SessionError::unauthenticated(), false);
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn validation_maps_to_400() {
        let response = handle_session_error(
            SessionError::validation("title", "Title is required"),
            false,
        );
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn infrastructure_maps_to_500() {
        let response = handle_session_error(SessionError::infrastructure("boom"), false);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn invalid_session_id_is_rejected() {
        let result = parse_session_id("not-a-uuid");
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn valid_session_id_parses() {
        let id = SessionId::new();
        let parsed = parse_session_id(&id.to_string()).unwrap();
        assert_eq!(parsed, id);
    }
}
