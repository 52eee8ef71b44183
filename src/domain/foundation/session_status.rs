//! SessionStatus enum for the draft/published lifecycle.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Publication status of an authored session.
///
/// Both transitions are permitted at the lifecycle layer: the backend
/// contract allows a published session to be reverted to draft. The editor
/// surface treats published sessions as read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Draft,
    Published,
}

impl SessionStatus {
    /// Returns true if the session is visible to anonymous readers.
    pub fn is_public(&self) -> bool {
        matches!(self, SessionStatus::Published)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionStatus::Draft => "draft",
            SessionStatus::Published => "published",
        };
        write!(f, "{}", s)
    }
}
