//! Session store port.
//!
//! Defines the contract for persisting and retrieving Session aggregates.
//! Implementations handle the actual database operations.
//!
//! # Design
//!
//! - **Keyed by session id**: create/read/update/delete plus two list shapes
//! - **No version tokens**: updates are last-write-wins; overlapping writers
//!   are resolved by whichever write lands last
//! - **Owner-scoped listing**: the common query is by owner, newest first

use crate::domain::foundation::{DomainError, SessionId, UserId};
use crate::domain::session::Session;
use async_trait::async_trait;

/// Store port for Session aggregate persistence.
///
/// Implementations must order list results by `updated_at` descending.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Save a new session.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn save(&self, session: &Session) -> Result<(), DomainError>;

    /// Update an existing session, replacing the stored row.
    ///
    /// # Errors
    ///
    /// - `SessionNotFound` if session doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn update(&self, session: &Session) -> Result<(), DomainError>;

    /// Find a session by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &SessionId) -> Result<Option<Session>, DomainError>;

    /// Find all sessions owned by a user, ordered by updated_at descending.
    async fn find_by_owner(&self, owner: &UserId) -> Result<Vec<Session>, DomainError>;

    /// Find all published sessions, ordered by updated_at descending.
    async fn find_published(&self) -> Result<Vec<Session>, DomainError>;

    /// Permanently delete a session.
    ///
    /// # Errors
    ///
    /// - `SessionNotFound` if session doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn delete(&self, id: &SessionId) -> Result<(), DomainError>;
}
