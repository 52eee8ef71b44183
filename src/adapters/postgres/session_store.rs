//! PostgreSQL implementation of SessionStore.
//!
//! Persists Session aggregates to a `sessions` table. Updates are plain
//! row replacement with no version column: overlapping writers resolve
//! last-write-wins.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{
    DomainError, ErrorCode, SessionId, SessionStatus, Timestamp, UserId,
};
use crate::domain::session::Session;
use crate::ports::SessionStore;

/// PostgreSQL implementation of SessionStore.
#[derive(Clone)]
pub struct PostgresSessionStore {
    pool: PgPool,
}

impl PostgresSessionStore {
    /// Creates a new PostgresSessionStore.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for PostgresSessionStore {
    async fn save(&self, session: &Session) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO sessions (
                id, owner, title, tags, json_url, content, status,
                created_at, updated_at, last_auto_saved_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(session.id().as_uuid())
        .bind(session.owner().as_str())
        .bind(session.title())
        .bind(session.tags())
        .bind(session.json_url())
        .bind(session.content())
        .bind(status_to_str(session.status()))
        .bind(session.created_at().as_datetime())
        .bind(session.updated_at().as_datetime())
        .bind(session.last_auto_saved_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to insert session: {}", e),
            )
        })?;

        Ok(())
    }

    async fn update(&self, session: &Session) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE sessions SET
                title = $2,
                tags = $3,
                json_url = $4,
                content = $5,
                status = $6,
                updated_at = $7,
                last_auto_saved_at = $8
            WHERE id = $1
            "#,
        )
        .bind(session.id().as_uuid())
        .bind(session.title())
        .bind(session.tags())
        .bind(session.json_url())
        .bind(session.content())
        .bind(status_to_str(session.status()))
        .bind(session.updated_at().as_datetime())
        .bind(session.last_auto_saved_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to update session: {}", e),
            )
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::SessionNotFound,
                format!("Session not found: {}", session.id()),
            ));
        }

        Ok(())
    }

    async fn find_by_id(&self, id: &SessionId) -> Result<Option<Session>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, owner, title, tags, json_url, content, status,
                   created_at, updated_at, last_auto_saved_at
            FROM sessions
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch session: {}", e),
            )
        })?;

        match row {
            Some(row) => Ok(Some(row_to_session(row)?)),
            None => Ok(None),
        }
    }

    async fn find_by_owner(&self, owner: &UserId) -> Result<Vec<Session>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, owner, title, tags, json_url, content, status,
                   created_at, updated_at, last_auto_saved_at
            FROM sessions
            WHERE owner = $1
            ORDER BY updated_at DESC
            "#,
        )
        .bind(owner.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to list sessions: {}", e),
            )
        })?;

        rows.into_iter().map(row_to_session).collect()
    }

    async fn find_published(&self) -> Result<Vec<Session>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, owner, title, tags, json_url, content, status,
                   created_at, updated_at, last_auto_saved_at
            FROM sessions
            WHERE status = 'published'
            ORDER BY updated_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to list published sessions: {}", e),
            )
        })?;

        rows.into_iter().map(row_to_session).collect()
    }

    async fn delete(&self, id: &SessionId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to delete session: {}", e),
                )
            })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::SessionNotFound,
                format!("Session not found: {}", id),
            ));
        }

        Ok(())
    }
}

fn status_to_str(status: SessionStatus) -> &'static str {
    match status {
        SessionStatus::Draft => "draft",
        SessionStatus::Published => "published",
    }
}

fn status_from_str(s: &str) -> Result<SessionStatus, DomainError> {
    match s {
        "draft" => Ok(SessionStatus::Draft),
        "published" => Ok(SessionStatus::Published),
        other => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Unknown session status in store: {}", other),
        )),
    }
}

fn row_to_session(row: PgRow) -> Result<Session, DomainError> {
    let map_err = |e: sqlx::Error| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to read session row: {}", e),
        )
    };

    let id: uuid::Uuid = row.try_get("id").map_err(map_err)?;
    let owner: String = row.try_get("owner").map_err(map_err)?;
    let title: String = row.try_get("title").map_err(map_err)?;
    let tags: Vec<String> = row.try_get("tags").map_err(map_err)?;
    let json_url: Option<String> = row.try_get("json_url").map_err(map_err)?;
    let content: String = row.try_get("content").map_err(map_err)?;
    let status: String = row.try_get("status").map_err(map_err)?;
    let created_at: chrono::DateTime<chrono::Utc> = row.try_get("created_at").map_err(map_err)?;
    let updated_at: chrono::DateTime<chrono::Utc> = row.try_get("updated_at").map_err(map_err)?;
    let last_auto_saved_at: chrono::DateTime<chrono::Utc> =
        row.try_get("last_auto_saved_at").map_err(map_err)?;

    let owner = UserId::new(owner)
        .map_err(|e| DomainError::new(ErrorCode::DatabaseError, e.to_string()))?;

    Ok(Session::reconstitute(
        SessionId::from_uuid(id),
        owner,
        title,
        tags,
        json_url,
        content,
        status_from_str(&status)?,
        Timestamp::from_datetime(created_at),
        Timestamp::from_datetime(updated_at),
        Timestamp::from_datetime(last_auto_saved_at),
    ))
}
