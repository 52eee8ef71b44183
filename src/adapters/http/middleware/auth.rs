//! Authentication middleware and extractors for axum.
//!
//! This module provides:
//! - `auth_middleware` - Layer that resolves credentials and injects the user into extensions
//! - `RequireAuth` - Extractor that requires authentication
//! - `OptionalAuth` - Extractor for optional authentication
//!
//! # Architecture
//!
//! The middleware uses the `TokenVerifier` port, keeping it
//! provider-agnostic. The credential is read from the `Authorization`
//! header (`Bearer <token>`) or, failing that, from the `accessToken`
//! cookie.
//!
//! ```text
//! Request → auth_middleware → injects AuthenticatedUser into extensions
//!                                      ↓
//!                              Handler → RequireAuth extractor reads from extensions
//! ```
//!
//! Requests with an invalid credential terminate here; requests with no
//! credential continue, and routes that need an identity reject them via
//! `RequireAuth`. All ownership checks happen downstream in the lifecycle
//! manager.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::adapters::http::envelope::ApiFailure;
use crate::domain::foundation::{AuthError, AuthenticatedUser};
use crate::ports::TokenVerifier;

/// Auth middleware state - the token verifier.
pub type AuthState = Arc<dyn TokenVerifier>;

/// Pulls the raw credential from the request.
///
/// Prefers the `Authorization: Bearer` header; falls back to the
/// `accessToken` cookie.
fn extract_credential(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
    {
        return Some(token.to_string());
    }

    headers
        .get(header::COOKIE)
        .and_then(|h| h.to_str().ok())
        .and_then(|cookies| {
            cookies
                .split(';')
                .map(str::trim)
                .find_map(|c| c.strip_prefix("accessToken="))
                .map(str::to_string)
        })
}

/// Authentication middleware that resolves request credentials.
///
/// 1. Extracts the credential (Bearer header or cookie)
/// 2. Verifies it using the `TokenVerifier` port
/// 3. On success, injects `AuthenticatedUser` into request extensions
/// 4. On missing credential, continues without injecting (for public routes)
/// 5. On invalid credential, terminates the request with 401
pub async fn auth_middleware(
    State(verifier): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = extract_credential(request.headers());

    match token {
        Some(token) => match verifier.verify(&token).await {
            Ok(user) => {
                request.extensions_mut().insert(user);
                next.run(request).await
            }
            Err(e) => {
                let (status, message) = match &e {
                    AuthError::TokenExpired => (StatusCode::UNAUTHORIZED, "Token expired"),
                    AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid access token"),
                    AuthError::UserNotFound => (StatusCode::UNAUTHORIZED, "Invalid access token"),
                    AuthError::ServiceUnavailable(msg) => {
                        tracing::error!("Auth service unavailable: {}", msg);
                        (
                            StatusCode::SERVICE_UNAVAILABLE,
                            "Authentication service unavailable",
                        )
                    }
                };

                ApiFailure::new(status, message).into_response()
            }
        },
        None => next.run(request).await,
    }
}

/// Extractor that requires authentication.
///
/// Use in handlers that require an authenticated user. If no user is in
/// the request extensions (the middleware saw no valid credential),
/// returns 401 Unauthorized.
#[derive(Debug, Clone)]
pub struct RequireAuth(pub AuthenticatedUser);

impl<S> axum::extract::FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            parts
                .extensions
                .get::<AuthenticatedUser>()
                .cloned()
                .map(RequireAuth)
                .ok_or(AuthRejection::Unauthenticated)
        })
    }
}

/// Extractor for optional authentication.
///
/// Returns `None` when no valid credential was provided, `Some(user)`
/// when authenticated. Used by the conditional read endpoint.
#[derive(Debug, Clone)]
pub struct OptionalAuth(pub Option<AuthenticatedUser>);

impl<S> axum::extract::FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let user = parts.extensions.get::<AuthenticatedUser>().cloned();
            Ok(OptionalAuth(user))
        })
    }
}

/// Rejection type for authentication failures.
#[derive(Debug, Clone)]
pub enum AuthRejection {
    /// No valid authentication credential was provided.
    Unauthenticated,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            AuthRejection::Unauthenticated => {
                ApiFailure::new(StatusCode::UNAUTHORIZED, "Unauthorized request").into_response()
            }
        }
    }
}
