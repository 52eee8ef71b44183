//! Token verification port - the authentication boundary.
//!
//! This port defines the contract for resolving a request credential into a
//! user identity. It is provider-agnostic: the production adapter verifies
//! HS256 JWTs, and tests use an in-memory mock.
//!
//! This is the **sole authentication boundary**. All authorization
//! (ownership checks) happens downstream in the lifecycle manager, never
//! here.

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser};

/// Resolves a raw credential into an authenticated user.
///
/// # Contract
///
/// Implementations must:
/// - Validate the credential's signature and expiry
/// - Confirm the resolved identity still exists
/// - Return `AuthError::InvalidToken` for malformed/bad-signature tokens
/// - Return `AuthError::TokenExpired` for expired tokens
/// - Return `AuthError::UserNotFound` when the identity vanished
/// - Return `AuthError::ServiceUnavailable` for transient errors
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Verify a credential and return the authenticated user.
    ///
    /// The token arrives raw, without a "Bearer " prefix; it may have been
    /// read from the Authorization header or the `accessToken` cookie.
    async fn verify(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;
    use std::collections::HashMap;
    use std::sync::RwLock;

    /// Simple mock implementation for testing the trait
    struct TestTokenVerifier {
        tokens: RwLock<HashMap<String, AuthenticatedUser>>,
    }

    impl TestTokenVerifier {
        fn new() -> Self {
            Self {
                tokens: RwLock::new(HashMap::new()),
            }
        }

        fn add_valid_token(&self, token: &str, user: AuthenticatedUser) {
            self.tokens.write().unwrap().insert(token.to_string(), user);
        }
    }

    #[async_trait]
    impl TokenVerifier for TestTokenVerifier {
        async fn verify(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
            self.tokens
                .read()
                .unwrap()
                .get(token)
                .cloned()
                .ok_or(AuthError::InvalidToken)
        }
    }

    fn test_user() -> AuthenticatedUser {
        AuthenticatedUser::new(
            UserId::new("user-123").unwrap(),
            "test@example.com",
            Some("Test User".to_string()),
        )
    }

    #[tokio::test]
    async fn token_verifier_returns_user_for_valid_token() {
        let verifier = TestTokenVerifier::new();
        verifier.add_valid_token("valid-token-123", test_user());

        let result = verifier.verify("valid-token-123").await;

        assert!(result.is_ok());
        let user = result.unwrap();
        assert_eq!(user.id.as_str(), "user-123");
        assert_eq!(user.email, "test@example.com");
    }

    #[tokio::test]
    async fn token_verifier_returns_error_for_invalid_token() {
        let verifier = TestTokenVerifier::new();

        let result = verifier.verify("invalid-token").await;

        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn token_verifier_trait_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn TokenVerifier>();
    }
}
