//! Authentication adapters.
//!
//! - `JwtTokenVerifier` - HS256 JWT verification for production
//! - `MockTokenVerifier` / `MockUserDirectory` - in-memory doubles for tests

mod jwt;
mod mock;

pub use jwt::JwtTokenVerifier;
pub use mock::{MockTokenVerifier, MockUserDirectory};
