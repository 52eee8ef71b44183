//! In-Memory Session Store Adapter
//!
//! Stores session aggregates in a HashMap. Useful for testing and
//! development. Update semantics match the production store: plain
//! replacement, last write wins.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, SessionId, UserId};
use crate::domain::session::Session;
use crate::ports::SessionStore;

/// In-memory implementation of SessionStore.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, Session>>>,
}

impl InMemorySessionStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all stored sessions (useful for tests).
    pub async fn clear(&self) {
        self.sessions.write().await.clear();
    }

    /// Get the number of stored sessions.
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn save(&self, session: &Session) -> Result<(), DomainError> {
        let mut sessions = self.sessions.write().await;
        sessions.insert(*session.id(), session.clone());
        Ok(())
    }

    async fn update(&self, session: &Session) -> Result<(), DomainError> {
        let mut sessions = self.sessions.write().await;
        if !sessions.contains_key(session.id()) {
            return Err(DomainError::new(
                ErrorCode::SessionNotFound,
                format!("Session not found: {}", session.id()),
            ));
        }
        sessions.insert(*session.id(), session.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &SessionId) -> Result<Option<Session>, DomainError> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(id).cloned())
    }

    async fn find_by_owner(&self, owner: &UserId) -> Result<Vec<Session>, DomainError> {
        let sessions = self.sessions.read().await;
        let mut owned: Vec<Session> = sessions
            .values()
            .filter(|s| s.owner() == owner)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.updated_at().cmp(a.updated_at()));
        Ok(owned)
    }

    async fn find_published(&self) -> Result<Vec<Session>, DomainError> {
        let sessions = self.sessions.read().await;
        let mut published: Vec<Session> = sessions
            .values()
            .filter(|s| s.is_publicly_readable())
            .cloned()
            .collect();
        published.sort_by(|a, b| b.updated_at().cmp(a.updated_at()));
        Ok(published)
    }

    async fn delete(&self, id: &SessionId) -> Result<(), DomainError> {
        let mut sessions = self.sessions.write().await;
        if sessions.remove(id).is_none() {
            return Err(DomainError::new(
                ErrorCode::SessionNotFound,
                format!("Session not found: {}", id),
            ));
        }
        Ok(())
    }
}
