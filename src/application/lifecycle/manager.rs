//! SessionLifecycleManager - the authorization core of the service.
//!
//! Enforces ownership and publication-state access rules on top of the
//! `SessionStore` port, using identities produced by the auth boundary.
//! Every operation is all-or-nothing; no partial state is ever persisted.

use std::sync::Arc;

use crate::domain::foundation::{ErrorCode, SessionId, UserId};
use crate::domain::session::{Session, SessionError, SessionFields};
use crate::ports::SessionStore;

/// Command to create a new session.
#[derive(Debug, Clone)]
pub struct CreateSessionCommand {
    pub owner: UserId,
    pub fields: SessionFields,
}

/// Command to update an existing session.
///
/// The field set is a full replacement; status moves freely in both
/// directions at this layer.
#[derive(Debug, Clone)]
pub struct UpdateSessionCommand {
    pub session_id: SessionId,
    pub requester: UserId,
    pub fields: SessionFields,
}

/// Enforces who may read and mutate sessions.
///
/// Rules:
/// - published sessions are readable by anyone, including anonymous
/// - everything else is owner-only
/// - owner is fixed at creation, mutations and deletes require it
pub struct SessionLifecycleManager {
    store: Arc<dyn SessionStore>,
}

impl SessionLifecycleManager {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Create a session owned by the caller.
    ///
    /// Status defaults to draft unless the fields specify otherwise;
    /// `last_auto_saved_at` is set to the creation instant.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if title or content is empty
    /// - `Infrastructure` on store failure
    pub async fn create(&self, cmd: CreateSessionCommand) -> Result<Session, SessionError> {
        let session = Session::new(SessionId::new(), cmd.owner, cmd.fields)?;
        self.store
            .save(&session)
            .await
            .map_err(|e| SessionError::infrastructure(e.to_string()))?;

        tracing::info!(session_id = %session.id(), owner = %session.owner(), "session created");
        Ok(session)
    }

    /// Read a session.
    ///
    /// Published sessions are returned to any requester, including
    /// anonymous. Drafts are owner-only: anonymous requesters get
    /// `Unauthenticated`, authenticated non-owners get `Forbidden`.
    ///
    /// # Errors
    ///
    /// - `NotFound` for unknown ids
    pub async fn read(
        &self,
        id: &SessionId,
        requester: Option<&UserId>,
    ) -> Result<Session, SessionError> {
        let session = self.load(id).await?;

        if session.is_publicly_readable() {
            return Ok(session);
        }

        match requester {
            None => Err(SessionError::unauthenticated()),
            Some(user) if session.is_owner(user) => Ok(session),
            Some(_) => Err(SessionError::forbidden()),
        }
    }

    /// Update a session, fully replacing its mutable fields.
    ///
    /// `last_auto_saved_at` is refreshed unconditionally on every
    /// successful update, whether invoked from an explicit save or from
    /// the autosave pipeline. The update is a read-modify-write with no
    /// version check: overlapping writers resolve last-write-wins.
    ///
    /// # Errors
    ///
    /// - `NotFound` for unknown ids
    /// - `Forbidden` when the requester is not the owner
    /// - `ValidationFailed` if title or content is empty
    pub async fn update(&self, cmd: UpdateSessionCommand) -> Result<Session, SessionError> {
        let mut session = self.load(&cmd.session_id).await?;

        if !session.is_owner(&cmd.requester) {
            return Err(SessionError::forbidden());
        }

        session.replace_fields(cmd.fields)?;

        self.store
            .update(&session)
            .await
            .map_err(|e| match e.code {
                ErrorCode::SessionNotFound => SessionError::not_found(cmd.session_id),
                _ => SessionError::infrastructure(e.to_string()),
            })?;

        Ok(session)
    }

    /// Permanently delete a session. Owner-only, no soft-delete.
    ///
    /// # Errors
    ///
    /// - `NotFound` for unknown ids
    /// - `Forbidden` when the requester is not the owner
    pub async fn delete(&self, id: &SessionId, requester: &UserId) -> Result<(), SessionError> {
        let session = self.load(id).await?;

        if !session.is_owner(requester) {
            return Err(SessionError::forbidden());
        }

        self.store.delete(id).await.map_err(|e| match e.code {
            ErrorCode::SessionNotFound => SessionError::not_found(*id),
            _ => SessionError::infrastructure(e.to_string()),
        })?;

        tracing::info!(session_id = %id, "session deleted");
        Ok(())
    }

    /// List all sessions owned by the requester, newest first.
    pub async fn list_owned(&self, requester: &UserId) -> Result<Vec<Session>, SessionError> {
        self.store
            .find_by_owner(requester)
            .await
            .map_err(|e| SessionError::infrastructure(e.to_string()))
    }

    /// List all published sessions, newest first. No identity required.
    pub async fn list_published(&self) -> Result<Vec<Session>, SessionError> {
        self.store
            .find_published()
            .await
            .map_err(|e| SessionError::infrastructure(e.to_string()))
    }

    async fn load(&self, id: &SessionId) -> Result<Session, SessionError> {
        self.store
            .find_by_id(id)
            .await
            .map_err(|e| SessionError::infrastructure(e.to_string()))?
            .ok_or_else(|| SessionError::not_found(*id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemorySessionStore;
    use crate::domain::foundation::SessionStatus;

    fn owner() -> UserId {
        UserId::new("author-1").unwrap()
    }

    fn intruder() -> UserId {
        UserId::new("someone-else").unwrap()
    }

    fn fields(title: &str, content: &str) -> SessionFields {
        SessionFields {
            title: title.to_string(),
            tags: vec!["calm".to_string()],
            json_url: None,
            content: content.to_string(),
            status: SessionStatus::Draft,
        }
    }

    fn manager() -> SessionLifecycleManager {
        SessionLifecycleManager::new(Arc::new(InMemorySessionStore::new()))
    }

    async fn create_session(mgr: &SessionLifecycleManager, f: SessionFields) -> Session {
        mgr.create(CreateSessionCommand {
            owner: owner(),
            fields: f,
        })
        .await
        .unwrap()
    }

    // Create

    #[tokio::test]
    async fn create_defaults_to_draft() {
        let mgr = manager();
        let session = create_session(&mgr, fields("Stretch", "Reach up.")).await;
        assert_eq!(session.status(), SessionStatus::Draft);
        assert_eq!(session.owner(), &owner());
    }

    #[tokio::test]
    async fn create_rejects_empty_title() {
        let mgr = manager();
        let result = mgr
            .create(CreateSessionCommand {
                owner: owner(),
                fields: fields("", "Content"),
            })
            .await;
        assert!(matches!(result, Err(SessionError::ValidationFailed { .. })));
    }

    #[tokio::test]
    async fn create_rejects_empty_content() {
        let mgr = manager();
        let result = mgr
            .create(CreateSessionCommand {
                owner: owner(),
                fields: fields("Title", "   "),
            })
            .await;
        assert!(matches!(result, Err(SessionError::ValidationFailed { .. })));
    }

    // Read

    #[tokio::test]
    async fn read_round_trips_created_fields() {
        let mgr = manager();
        let mut f = fields("T", "C");
        f.tags = vec!["x".to_string(), "y".to_string()];
        let created = create_session(&mgr, f).await;

        let read = mgr.read(created.id(), Some(&owner())).await.unwrap();
        assert_eq!(read.title(), "T");
        assert_eq!(read.content(), "C");
        assert_eq!(read.tags(), &["x".to_string(), "y".to_string()]);
        assert_eq!(read.status(), SessionStatus::Draft);
    }

    #[tokio::test]
    async fn anonymous_cannot_read_draft() {
        let mgr = manager();
        let session = create_session(&mgr, fields("Draft", "Hidden")).await;

        let result = mgr.read(session.id(), None).await;
        assert!(matches!(result, Err(SessionError::Unauthenticated)));
    }

    #[tokio::test]
    async fn non_owner_cannot_read_draft() {
        let mgr = manager();
        let session = create_session(&mgr, fields("Draft", "Hidden")).await;

        let result = mgr.read(session.id(), Some(&intruder())).await;
        assert!(matches!(result, Err(SessionError::Forbidden)));
    }

    #[tokio::test]
    async fn anyone_can_read_published() {
        let mgr = manager();
        let mut f = fields("Public", "Visible");
        f.status = SessionStatus::Published;
        let session = create_session(&mgr, f).await;

        assert!(mgr.read(session.id(), None).await.is_ok());
        assert!(mgr.read(session.id(), Some(&intruder())).await.is_ok());
        assert!(mgr.read(session.id(), Some(&owner())).await.is_ok());
    }

    #[tokio::test]
    async fn read_unknown_id_is_not_found() {
        let mgr = manager();
        let result = mgr.read(&SessionId::new(), Some(&owner())).await;
        assert!(matches!(result, Err(SessionError::NotFound(_))));
    }

    // Update

    #[tokio::test]
    async fn update_replaces_all_fields_and_refreshes_save_timestamp() {
        let mgr = manager();
        let created = create_session(&mgr, fields("Before", "Old")).await;
        let saved_at = *created.last_auto_saved_at();

        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        let updated = mgr
            .update(UpdateSessionCommand {
                session_id: *created.id(),
                requester: owner(),
                fields: SessionFields {
                    title: "After".to_string(),
                    tags: vec![],
                    json_url: Some("https://example.com/a.json".to_string()),
                    content: "New".to_string(),
                    status: SessionStatus::Published,
                },
            })
            .await
            .unwrap();

        assert_eq!(updated.title(), "After");
        assert!(updated.tags().is_empty());
        assert_eq!(updated.json_url(), Some("https://example.com/a.json"));
        assert_eq!(updated.content(), "New");
        assert_eq!(updated.status(), SessionStatus::Published);
        assert!(updated.last_auto_saved_at().is_after(&saved_at));
    }

    #[tokio::test]
    async fn update_by_non_owner_is_forbidden_even_when_published() {
        let mgr = manager();
        let mut f = fields("Public", "Visible");
        f.status = SessionStatus::Published;
        let session = create_session(&mgr, f.clone()).await;

        let result = mgr
            .update(UpdateSessionCommand {
                session_id: *session.id(),
                requester: intruder(),
                fields: f,
            })
            .await;
        assert!(matches!(result, Err(SessionError::Forbidden)));
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found() {
        let mgr = manager();
        let result = mgr
            .update(UpdateSessionCommand {
                session_id: SessionId::new(),
                requester: owner(),
                fields: fields("T", "C"),
            })
            .await;
        assert!(matches!(result, Err(SessionError::NotFound(_))));
    }

    #[tokio::test]
    async fn published_can_revert_to_draft() {
        // Current contract: no terminal-state enforcement at this layer.
        let mgr = manager();
        let mut f = fields("Flow", "Body scan.");
        f.status = SessionStatus::Published;
        let session = create_session(&mgr, f.clone()).await;

        f.status = SessionStatus::Draft;
        let updated = mgr
            .update(UpdateSessionCommand {
                session_id: *session.id(),
                requester: owner(),
                fields: f,
            })
            .await
            .unwrap();
        assert_eq!(updated.status(), SessionStatus::Draft);
    }

    #[tokio::test]
    async fn update_with_empty_title_fails_validation() {
        let mgr = manager();
        let session = create_session(&mgr, fields("T", "C")).await;

        let result = mgr
            .update(UpdateSessionCommand {
                session_id: *session.id(),
                requester: owner(),
                fields: fields("", "C"),
            })
            .await;
        assert!(matches!(result, Err(SessionError::ValidationFailed { .. })));
    }

    // Delete

    #[tokio::test]
    async fn delete_by_owner_removes_permanently() {
        let mgr = manager();
        let session = create_session(&mgr, fields("Gone", "Soon")).await;

        mgr.delete(session.id(), &owner()).await.unwrap();

        let result = mgr.read(session.id(), Some(&owner())).await;
        assert!(matches!(result, Err(SessionError::NotFound(_))));
    }

    #[tokio::test]
    async fn delete_by_non_owner_is_forbidden() {
        let mgr = manager();
        let session = create_session(&mgr, fields("Keep", "Safe")).await;

        let result = mgr.delete(session.id(), &intruder()).await;
        assert!(matches!(result, Err(SessionError::Forbidden)));
        assert!(mgr.read(session.id(), Some(&owner())).await.is_ok());
    }

    #[tokio::test]
    async fn delete_unknown_id_is_not_found() {
        let mgr = manager();
        let result = mgr.delete(&SessionId::new(), &owner()).await;
        assert!(matches!(result, Err(SessionError::NotFound(_))));
    }

    // Listing

    #[tokio::test]
    async fn list_owned_returns_only_own_sessions_newest_first() {
        let mgr = manager();
        let first = create_session(&mgr, fields("First", "One")).await;
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        let second = create_session(&mgr, fields("Second", "Two")).await;

        mgr.create(CreateSessionCommand {
            owner: intruder(),
            fields: fields("Other", "Theirs"),
        })
        .await
        .unwrap();

        let sessions = mgr.list_owned(&owner()).await.unwrap();
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].id(), second.id());
        assert_eq!(sessions[1].id(), first.id());
        assert!(sessions.iter().all(|s| s.owner() == &owner()));
    }

    #[tokio::test]
    async fn list_published_returns_only_published() {
        let mgr = manager();
        create_session(&mgr, fields("Draft", "Hidden")).await;
        let mut f = fields("Public", "Visible");
        f.status = SessionStatus::Published;
        let published = create_session(&mgr, f).await;

        let sessions = mgr.list_published().await.unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].id(), published.id());
    }
}
