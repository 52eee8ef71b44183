//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `auth` - Token verification (JWT, mock)
//! - `http` - REST API (axum routes, DTOs, middleware)
//! - `postgres` - PostgreSQL session store
//! - `storage` - In-memory session store (tests/development)

pub mod auth;
pub mod http;
pub mod postgres;
pub mod storage;
