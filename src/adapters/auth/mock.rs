//! Mock authentication adapters for testing.
//!
//! These adapters implement the `TokenVerifier` and `UserDirectory` ports
//! for use in tests, avoiding the need for a real identity provider.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser, UserId};
use crate::ports::{TokenVerifier, UserDirectory};

/// Mock token verifier for testing.
///
/// Stores a map of tokens to users. Tokens not in the map fail with
/// `InvalidToken`.
#[derive(Debug, Default)]
pub struct MockTokenVerifier {
    /// Map of valid tokens to their associated users
    tokens: RwLock<HashMap<String, AuthenticatedUser>>,
    /// Optional error to return for all verifications (for error testing)
    force_error: RwLock<Option<AuthError>>,
}

impl MockTokenVerifier {
    /// Creates a new empty mock verifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a valid token that maps to a user.
    pub fn with_user(self, token: impl Into<String>, user: AuthenticatedUser) -> Self {
        self.tokens.write().unwrap().insert(token.into(), user);
        self
    }

    /// Adds a valid token with a simple test user.
    pub fn with_test_user(self, token: impl Into<String>, user_id: impl Into<String>) -> Self {
        let user_id = user_id.into();
        let user = AuthenticatedUser::new(
            UserId::new(&user_id).unwrap(),
            format!("{}@test.example.com", user_id),
            Some(format!("Test User {}", user_id)),
        );
        self.with_user(token, user)
    }

    /// Forces all verifications to return the specified error.
    pub fn with_error(self, error: AuthError) -> Self {
        *self.force_error.write().unwrap() = Some(error);
        self
    }

    /// Registers a new valid token at runtime.
    pub fn add_token(&self, token: impl Into<String>, user: AuthenticatedUser) {
        self.tokens.write().unwrap().insert(token.into(), user);
    }

    /// Removes a token, making it invalid.
    pub fn remove_token(&self, token: &str) {
        self.tokens.write().unwrap().remove(token);
    }
}

#[async_trait]
impl TokenVerifier for MockTokenVerifier {
    async fn verify(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        if let Some(error) = self.force_error.read().unwrap().clone() {
            return Err(error);
        }

        self.tokens
            .read()
            .unwrap()
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}

/// Mock user directory for testing.
///
/// Stores a map of user IDs to users. Unknown IDs return `UserNotFound`.
#[derive(Debug, Default)]
pub struct MockUserDirectory {
    users: RwLock<HashMap<String, AuthenticatedUser>>,
    force_error: RwLock<Option<AuthError>>,
}

impl MockUserDirectory {
    /// Creates a new empty mock directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a user to the directory.
    pub fn with_user(self, user: AuthenticatedUser) -> Self {
        self.users
            .write()
            .unwrap()
            .insert(user.id.as_str().to_string(), user);
        self
    }

    /// Adds a simple test user.
    pub fn with_test_user(self, user_id: impl Into<String>) -> Self {
        let user_id = user_id.into();
        let user = AuthenticatedUser::new(
            UserId::new(&user_id).unwrap(),
            format!("{}@test.example.com", user_id),
            Some(format!("Test User {}", user_id)),
        );
        self.with_user(user)
    }

    /// Forces all lookups to return the specified error.
    pub fn with_error(self, error: AuthError) -> Self {
        *self.force_error.write().unwrap() = Some(error);
        self
    }

    /// Removes a user.
    pub fn remove_user(&self, user_id: &UserId) {
        self.users.write().unwrap().remove(user_id.as_str());
    }
}

#[async_trait]
impl UserDirectory for MockUserDirectory {
    async fn get_user(&self, user_id: &UserId) -> Result<AuthenticatedUser, AuthError> {
        if let Some(error) = self.force_error.read().unwrap().clone() {
            return Err(error);
        }

        self.users
            .read()
            .unwrap()
            .get(user_id.as_str())
            .cloned()
            .ok_or(AuthError::UserNotFound)
    }
}
