//! Session aggregate entity.
//!
//! A session is a short authored document: title, free-form content, tags,
//! an optional external URL reference, and a draft/published status.
//!
//! # Ownership
//!
//! The owner is fixed at creation and never rewritten. Only the owner may
//! mutate or delete a session; publication state decides read visibility.

use crate::domain::foundation::{DomainError, SessionId, SessionStatus, Timestamp, UserId};
use serde::{Deserialize, Serialize};

/// Maximum length for session title.
pub const MAX_TITLE_LENGTH: usize = 500;

/// The mutable field set of a session.
///
/// Updates are full replacement: every field here overwrites the stored
/// value, whether the call came from an explicit save or the autosave
/// pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionFields {
    pub title: String,
    pub tags: Vec<String>,
    pub json_url: Option<String>,
    pub content: String,
    pub status: SessionStatus,
}

/// Session aggregate - an authored wellness session document.
///
/// # Invariants
///
/// - `id` is globally unique
/// - `title` and `content` are non-empty after trimming
/// - `owner` is set once at creation and never changed
/// - every successful mutation refreshes `updated_at` and
///   `last_auto_saved_at` together
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Unique identifier for this session.
    id: SessionId,

    /// User who owns this session.
    owner: UserId,

    /// Session title.
    title: String,

    /// Ordered tags, may be empty.
    tags: Vec<String>,

    /// Optional external URL reference.
    json_url: Option<String>,

    /// Free-form session content.
    content: String,

    /// Current publication status.
    status: SessionStatus,

    /// When the session was created.
    created_at: Timestamp,

    /// When the session was last updated.
    updated_at: Timestamp,

    /// When the session was last persisted, by either save path.
    last_auto_saved_at: Timestamp,
}

impl Session {
    /// Create a new session owned by `owner`.
    ///
    /// Status comes from `fields` (default draft); `last_auto_saved_at`
    /// starts at the creation instant.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if title or content is empty or too long
    pub fn new(id: SessionId, owner: UserId, fields: SessionFields) -> Result<Self, DomainError> {
        Self::validate_title(&fields.title)?;
        Self::validate_content(&fields.content)?;

        let now = Timestamp::now();
        Ok(Self {
            id,
            owner,
            title: fields.title.trim().to_string(),
            tags: Self::normalize_tags(fields.tags),
            json_url: Self::normalize_url(fields.json_url),
            content: fields.content.trim().to_string(),
            status: fields.status,
            created_at: now,
            updated_at: now,
            last_auto_saved_at: now,
        })
    }

    /// Reconstitute a session from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: SessionId,
        owner: UserId,
        title: String,
        tags: Vec<String>,
        json_url: Option<String>,
        content: String,
        status: SessionStatus,
        created_at: Timestamp,
        updated_at: Timestamp,
        last_auto_saved_at: Timestamp,
    ) -> Self {
        Self {
            id,
            owner,
            title,
            tags,
            json_url,
            content,
            status,
            created_at,
            updated_at,
            last_auto_saved_at,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns the session ID.
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Returns the owner's user ID.
    pub fn owner(&self) -> &UserId {
        &self.owner
    }

    /// Returns the session title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the tags.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Returns the optional external URL reference.
    pub fn json_url(&self) -> Option<&str> {
        self.json_url.as_deref()
    }

    /// Returns the session content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the current publication status.
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Returns when the session was created.
    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    /// Returns when the session was last updated.
    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    /// Returns when the session was last saved, by either save path.
    pub fn last_auto_saved_at(&self) -> &Timestamp {
        &self.last_auto_saved_at
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Authorization
    // ─────────────────────────────────────────────────────────────────────────

    /// Checks if the given user owns this session.
    pub fn is_owner(&self, user_id: &UserId) -> bool {
        &self.owner == user_id
    }

    /// Returns true if the session is readable without authentication.
    pub fn is_publicly_readable(&self) -> bool {
        self.status.is_public()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Replace all mutable fields with the supplied values.
    ///
    /// Both save paths funnel here; `updated_at` and `last_auto_saved_at`
    /// are refreshed unconditionally on success. Status transitions are
    /// unrestricted in both directions.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if title or content is empty or too long
    pub fn replace_fields(&mut self, fields: SessionFields) -> Result<(), DomainError> {
        Self::validate_title(&fields.title)?;
        Self::validate_content(&fields.content)?;

        self.title = fields.title.trim().to_string();
        self.tags = Self::normalize_tags(fields.tags);
        self.json_url = Self::normalize_url(fields.json_url);
        self.content = fields.content.trim().to_string();
        self.status = fields.status;

        let now = Timestamp::now();
        self.updated_at = now;
        self.last_auto_saved_at = now;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Private helpers
    // ─────────────────────────────────────────────────────────────────────────

    /// Validates the session title.
    fn validate_title(title: &str) -> Result<(), DomainError> {
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("title", "Title is required"));
        }
        if trimmed.len() > MAX_TITLE_LENGTH {
            return Err(DomainError::validation(
                "title",
                format!("Title must be {} characters or less", MAX_TITLE_LENGTH),
            ));
        }
        Ok(())
    }

    /// Validates the session content.
    fn validate_content(content: &str) -> Result<(), DomainError> {
        if content.trim().is_empty() {
            return Err(DomainError::validation("content", "Content is required"));
        }
        Ok(())
    }

    /// Trims each tag and drops empty ones, preserving order.
    fn normalize_tags(tags: Vec<String>) -> Vec<String> {
        tags.into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect()
    }

    /// Trims the URL, mapping whitespace-only values to None.
    fn normalize_url(url: Option<String>) -> Option<String> {
        url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_owner() -> UserId {
        UserId::new("user-123").unwrap()
    }

    fn test_fields() -> SessionFields {
        SessionFields {
            title: "Morning Breathing".to_string(),
            tags: vec!["breath".to_string(), "morning".to_string()],
            json_url: None,
            content: "Inhale for four counts, exhale for six.".to_string(),
            status: SessionStatus::Draft,
        }
    }

    fn test_session() -> Session {
        Session::new(SessionId::new(), test_owner(), test_fields()).unwrap()
    }

    // Construction tests

    #[test]
    fn new_session_defaults_to_draft() {
        let session = test_session();
        assert_eq!(session.status(), SessionStatus::Draft);
    }

    #[test]
    fn new_session_can_be_created_published() {
        let mut fields = test_fields();
        fields.status = SessionStatus::Published;
        let session = Session::new(SessionId::new(), test_owner(), fields).unwrap();
        assert_eq!(session.status(), SessionStatus::Published);
    }

    #[test]
    fn new_session_rejects_empty_title() {
        let mut fields = test_fields();
        fields.title = String::new();
        assert!(Session::new(SessionId::new(), test_owner(), fields).is_err());
    }

    #[test]
    fn new_session_rejects_whitespace_title() {
        let mut fields = test_fields();
        fields.title = "   ".to_string();
        assert!(Session::new(SessionId::new(), test_owner(), fields).is_err());
    }

    #[test]
    fn new_session_rejects_empty_content() {
        let mut fields = test_fields();
        fields.content = "  \n ".to_string();
        assert!(Session::new(SessionId::new(), test_owner(), fields).is_err());
    }

    #[test]
    fn new_session_rejects_too_long_title() {
        let mut fields = test_fields();
        fields.title = "x".repeat(MAX_TITLE_LENGTH + 1);
        assert!(Session::new(SessionId::new(), test_owner(), fields).is_err());
    }

    #[test]
    fn new_session_normalizes_tags() {
        let mut fields = test_fields();
        fields.tags = vec![
            " breath ".to_string(),
            String::new(),
            "  ".to_string(),
            "calm".to_string(),
        ];
        let session = Session::new(SessionId::new(), test_owner(), fields).unwrap();
        assert_eq!(session.tags(), &["breath".to_string(), "calm".to_string()]);
    }

    #[test]
    fn new_session_drops_blank_url() {
        let mut fields = test_fields();
        fields.json_url = Some("   ".to_string());
        let session = Session::new(SessionId::new(), test_owner(), fields).unwrap();
        assert!(session.json_url().is_none());
    }

    #[test]
    fn new_session_timestamps_are_aligned() {
        let session = test_session();
        assert_eq!(session.created_at(), session.updated_at());
        assert_eq!(session.updated_at(), session.last_auto_saved_at());
    }

    // Mutation tests

    #[test]
    fn replace_fields_rewrites_everything() {
        let mut session = test_session();
        let fields = SessionFields {
            title: "Evening Wind-down".to_string(),
            tags: vec!["evening".to_string()],
            json_url: Some("https://example.com/flow.json".to_string()),
            content: "Dim the lights.".to_string(),
            status: SessionStatus::Published,
        };
        session.replace_fields(fields).unwrap();

        assert_eq!(session.title(), "Evening Wind-down");
        assert_eq!(session.tags(), &["evening".to_string()]);
        assert_eq!(session.json_url(), Some("https://example.com/flow.json"));
        assert_eq!(session.content(), "Dim the lights.");
        assert_eq!(session.status(), SessionStatus::Published);
    }

    #[test]
    fn replace_fields_refreshes_save_timestamp() {
        let mut session = test_session();
        let before = *session.last_auto_saved_at();
        std::thread::sleep(std::time::Duration::from_millis(10));
        session.replace_fields(test_fields()).unwrap();
        assert!(session.last_auto_saved_at().is_after(&before));
        assert_eq!(session.updated_at(), session.last_auto_saved_at());
    }

    #[test]
    fn replace_fields_rejects_empty_content() {
        let mut session = test_session();
        let mut fields = test_fields();
        fields.content = String::new();
        assert!(session.replace_fields(fields).is_err());
        // Original content untouched on failure.
        assert_eq!(session.content(), "Inhale for four counts, exhale for six.");
    }

    #[test]
    fn published_session_can_revert_to_draft() {
        let mut session = test_session();
        let mut fields = test_fields();
        fields.status = SessionStatus::Published;
        session.replace_fields(fields.clone()).unwrap();
        assert_eq!(session.status(), SessionStatus::Published);

        fields.status = SessionStatus::Draft;
        session.replace_fields(fields).unwrap();
        assert_eq!(session.status(), SessionStatus::Draft);
    }

    #[test]
    fn replace_fields_never_changes_owner() {
        let mut session = test_session();
        session.replace_fields(test_fields()).unwrap();
        assert_eq!(session.owner(), &test_owner());
    }

    // Authorization tests

    #[test]
    fn owner_is_recognized() {
        let session = test_session();
        assert!(session.is_owner(&test_owner()));
    }

    #[test]
    fn non_owner_is_not_recognized() {
        let session = test_session();
        let other = UserId::new("other-user").unwrap();
        assert!(!session.is_owner(&other));
    }

    #[test]
    fn draft_is_not_publicly_readable() {
        let session = test_session();
        assert!(!session.is_publicly_readable());
    }

    #[test]
    fn published_is_publicly_readable() {
        let mut session = test_session();
        let mut fields = test_fields();
        fields.status = SessionStatus::Published;
        session.replace_fields(fields).unwrap();
        assert!(session.is_publicly_readable());
    }
}
