//! HTTP DTOs for session endpoints.
//!
//! These types decouple the camelCase wire format from domain types and
//! validate the body at the boundary, before anything reaches the
//! lifecycle manager.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::SessionStatus;
use crate::domain::session::{Session, SessionFields};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Body of POST /api/sessions and PUT /api/sessions/:id.
///
/// The same shape serves both: updates are full replacement. Every field
/// is defaulted so that missing required fields surface as validation
/// messages rather than deserialization errors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPayload {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_url: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub status: SessionStatus,
}

impl SessionPayload {
    /// Boundary validation, mirroring the invariants the aggregate
    /// enforces so invalid bodies never reach the manager.
    ///
    /// Returns the offending message on failure.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.title.trim().is_empty() {
            return Err("Title is required");
        }
        if self.content.trim().is_empty() {
            return Err("Content is required");
        }
        Ok(())
    }

    /// Converts into the domain field set.
    pub fn into_fields(self) -> SessionFields {
        SessionFields {
            title: self.title,
            tags: self.tags,
            json_url: self.json_url,
            content: self.content,
            status: self.status,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Session view for API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub id: String,
    pub owner: String,
    pub title: String,
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_url: Option<String>,
    pub content: String,
    pub status: SessionStatus,
    pub created_at: String,
    pub updated_at: String,
    pub last_auto_saved_at: String,
}

impl From<&Session> for SessionResponse {
    fn from(session: &Session) -> Self {
        Self {
            id: session.id().to_string(),
            owner: session.owner().to_string(),
            title: session.title().to_string(),
            tags: session.tags().to_vec(),
            json_url: session.json_url().map(str::to_string),
            content: session.content().to_string(),
            status: session.status(),
            created_at: session.created_at().to_rfc3339(),
            updated_at: session.updated_at().to_rfc3339(),
            last_auto_saved_at: session.last_auto_saved_at().to_rfc3339(),
        }
    }
}

impl From<Session> for SessionResponse {
    fn from(session: Session) -> Self {
        Self::from(&session)
    }
}
