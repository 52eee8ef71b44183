//! Session-specific error types.

use crate::domain::foundation::{DomainError, ErrorCode, SessionId};

/// Errors raised by the session lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Session was not found.
    NotFound(SessionId),
    /// Requester is authenticated but not the owner.
    Forbidden,
    /// No identity was presented for an operation that requires one.
    Unauthenticated,
    /// Validation failed.
    ValidationFailed { field: String, message: String },
    /// Infrastructure error.
    Infrastructure(String),
}

impl SessionError {
    pub fn not_found(id: SessionId) -> Self {
        SessionError::NotFound(id)
    }

    pub fn forbidden() -> Self {
        SessionError::Forbidden
    }

    pub fn unauthenticated() -> Self {
        SessionError::Unauthenticated
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        SessionError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        SessionError::Infrastructure(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            SessionError::NotFound(_) => ErrorCode::SessionNotFound,
            SessionError::Forbidden => ErrorCode::Forbidden,
            SessionError::Unauthenticated => ErrorCode::Unauthenticated,
            SessionError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            SessionError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    pub fn message(&self) -> String {
        match self {
            SessionError::NotFound(_) => "Session not found".to_string(),
            SessionError::Forbidden => "You don't have permission to access this session".to_string(),
            SessionError::Unauthenticated => "Authentication required".to_string(),
            SessionError::ValidationFailed { message, .. } => message.clone(),
            SessionError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for SessionError {}

impl From<DomainError> for SessionError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::SessionNotFound => SessionError::Infrastructure(err.to_string()),
            ErrorCode::Forbidden => SessionError::Forbidden,
            ErrorCode::Unauthenticated => SessionError::Unauthenticated,
            ErrorCode::ValidationFailed | ErrorCode::EmptyField | ErrorCode::InvalidFormat => {
                SessionError::ValidationFailed {
                    field: err
                        .details
                        .get("field")
                        .cloned()
                        .unwrap_or_else(|| "unknown".to_string()),
                    message: err.message,
                }
            }
            _ => SessionError::Infrastructure(err.to_string()),
        }
    }
}
