//! User directory port - the opaque identity resolver.
//!
//! Credential issuance and account management live outside this service.
//! The directory is consulted by the token verifier so that a structurally
//! valid token whose user has since been deleted is still rejected.

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser, UserId};

/// Looks up user profiles by ID, excluding sensitive fields.
///
/// # Contract
///
/// Implementations must:
/// - Return the user if they exist in the identity system
/// - Return `AuthError::UserNotFound` if the user doesn't exist
/// - Return `AuthError::ServiceUnavailable` for transient errors
/// - Never expose credentials or other sensitive account fields
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Get a user by their ID.
    async fn get_user(&self, user_id: &UserId) -> Result<AuthenticatedUser, AuthError>;
}
