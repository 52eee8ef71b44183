//! HTTP adapter for session endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{SessionPayload, SessionResponse};
pub use handlers::SessionApiState;
pub use routes::session_routes;
