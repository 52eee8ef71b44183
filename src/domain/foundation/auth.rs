//! Authentication types for the domain layer.
//!
//! These types represent an authenticated user extracted from a verified
//! credential. They have **no external dependencies** - any identity
//! provider can populate them via the `TokenVerifier` port.
//!
//! # Design Decisions
//!
//! - `AuthenticatedUser` carries only the claims the service actually uses,
//!   sensitive fields (password hashes, refresh tokens) never cross this
//!   boundary
//! - `AuthError` is domain-centric, not provider-specific
//! - Types are `Clone` for easy use in request handlers

use super::UserId;
use thiserror::Error;

/// Authenticated user extracted from a verified credential.
///
/// This is a **domain type** with no provider dependencies. The
/// `TokenVerifier` port populates it after validating a token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// The unique user identifier from the auth provider.
    pub id: UserId,

    /// User's email address from the token claims.
    pub email: String,

    /// Display name if available.
    pub display_name: Option<String>,
}

impl AuthenticatedUser {
    /// Creates a new authenticated user.
    ///
    /// Typically called by a `TokenVerifier` adapter after successfully
    /// validating a credential.
    pub fn new(id: UserId, email: impl Into<String>, display_name: Option<String>) -> Self {
        Self {
            id,
            email: email.into(),
            display_name,
        }
    }

    /// Returns the user's display name, or email as fallback.
    pub fn display_name_or_email(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.email)
    }
}

/// Authentication errors that can occur during credential verification.
///
/// These errors are **domain-centric** - they describe what went wrong
/// from the application's perspective, not the auth provider's.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// The token is missing, malformed, or has an invalid signature.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The token has expired (separate from InvalidToken for specific handling).
    #[error("Token expired")]
    TokenExpired,

    /// Token is valid but the user no longer exists in the system.
    #[error("User not found")]
    UserNotFound,

    /// The authentication service is unavailable (network, config, etc.).
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    /// Creates a service unavailable error with a message.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Returns true if this error indicates the user should re-authenticate.
    pub fn requires_reauthentication(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidToken | AuthError::TokenExpired | AuthError::UserNotFound
        )
    }

    /// Returns true if this is a transient error that may succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, AuthError::ServiceUnavailable(_))
    }
}
