//! Session domain module.
//!
//! Handles the authored-session lifecycle: creation, full-replace updates
//! from either save path (manual or autosave), publication, and permanent
//! deletion. Sessions are owned by exactly one user for their entire life.

mod aggregate;
mod errors;

pub use aggregate::{Session, SessionFields};
pub use errors::SessionError;
