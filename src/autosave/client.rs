//! Persistence client for the autosave pipeline.
//!
//! `SessionPersistence` is the pipeline's outbound port; `SessionApiClient`
//! implements it over HTTP. The client is an explicit authenticated
//! context: base URL and credential are injected at construction and
//! travel with every request, never read from process-wide state.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use crate::adapters::http::envelope::{ApiFailure, ApiResponse};
use crate::adapters::http::session::{SessionPayload, SessionResponse};
use crate::domain::foundation::{SessionId, SessionStatus, Timestamp};

/// The editor's working copy of a session.
#[derive(Debug, Clone, Default)]
pub struct SessionDraft {
    /// Assigned after the first successful create.
    pub session_id: Option<SessionId>,
    pub title: String,
    pub tags: Vec<String>,
    pub json_url: Option<String>,
    pub content: String,
    pub status: SessionStatus,
}

impl SessionDraft {
    /// A draft is ready to persist once title and content survive trimming.
    pub fn is_valid(&self) -> bool {
        !self.title.trim().is_empty() && !self.content.trim().is_empty()
    }

    /// Wire payload for this draft.
    pub fn to_payload(&self) -> SessionPayload {
        SessionPayload {
            title: self.title.clone(),
            tags: self.tags.clone(),
            json_url: self.json_url.clone(),
            content: self.content.clone(),
            status: self.status,
        }
    }
}

/// What the pipeline needs back from a successful save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedSession {
    pub id: SessionId,
    pub status: SessionStatus,
    pub last_auto_saved_at: Timestamp,
}

/// Errors surfaced by persistence calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Credential rejected; the editor must re-authenticate.
    #[error("Authentication required")]
    Unauthenticated,

    /// The draft cannot be persisted as-is.
    #[error("{0}")]
    InvalidDraft(&'static str),

    /// The server rejected the request.
    #[error("Save failed ({status}): {message}")]
    Api { status: u16, message: String },

    /// The request never produced a usable response.
    #[error("Transport error: {0}")]
    Transport(String),
}

/// Outbound port for persisting drafts.
#[async_trait]
pub trait SessionPersistence: Send + Sync {
    /// Create a new session from the draft.
    async fn create(&self, draft: &SessionDraft) -> Result<SavedSession, ClientError>;

    /// Update an existing session with the draft.
    async fn update(&self, id: &SessionId, draft: &SessionDraft)
        -> Result<SavedSession, ClientError>;
}

/// HTTP implementation of `SessionPersistence`.
///
/// Holds the authenticated context explicitly; every call stamps the
/// bearer credential onto the request itself.
pub struct SessionApiClient {
    http: reqwest::Client,
    base_url: String,
    access_token: SecretString,
}

impl SessionApiClient {
    /// Creates a client for `base_url` acting as the given credential.
    pub fn new(base_url: impl Into<String>, access_token: SecretString) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token,
        }
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        draft: &SessionDraft,
    ) -> Result<SavedSession, ClientError> {
        let response = request
            .bearer_auth(self.access_token.expose_secret())
            .json(&draft.to_payload())
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ClientError::Unauthenticated);
        }

        if !status.is_success() {
            let message = response
                .json::<ApiFailure>()
                .await
                .map(|f| f.message)
                .unwrap_or_else(|_| status.to_string());
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let envelope = response
            .json::<ApiResponse<SessionResponse>>()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        saved_from_response(envelope.data)
    }
}

fn saved_from_response(data: SessionResponse) -> Result<SavedSession, ClientError> {
    let id = data
        .id
        .parse::<SessionId>()
        .map_err(|_| ClientError::Transport("malformed session id in response".to_string()))?;
    let last_auto_saved_at = data
        .last_auto_saved_at
        .parse::<chrono::DateTime<chrono::Utc>>()
        .map(Timestamp::from_datetime)
        .unwrap_or_default();

    Ok(SavedSession {
        id,
        status: data.status,
        last_auto_saved_at,
    })
}

#[async_trait]
impl SessionPersistence for SessionApiClient {
    async fn create(&self, draft: &SessionDraft) -> Result<SavedSession, ClientError> {
        let url = format!("{}/api/sessions", self.base_url);
        self.send(self.http.post(url), draft).await
    }

    async fn update(
        &self,
        id: &SessionId,
        draft: &SessionDraft,
    ) -> Result<SavedSession, ClientError> {
        let url = format!("{}/api/sessions/{}", self.base_url, id);
        self.send(self.http.put(url), draft).await
    }
}
