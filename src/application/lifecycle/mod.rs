//! Session lifecycle - ownership and publication-state rules.

mod manager;

pub use manager::{CreateSessionCommand, SessionLifecycleManager, UpdateSessionCommand};
