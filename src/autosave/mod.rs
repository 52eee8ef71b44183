//! Autosave pipeline - client-side persistence scheduling.
//!
//! Observes edits and issues create/update calls against the session API
//! without losing in-progress work and without persisting invalid drafts.
//! Two triggers feed one scheduler: a 5-second debounce restarted on every
//! edit, and a 30-second periodic floor that bounds staleness under
//! continuous editing. Both run in a single loop with saves awaited
//! inline, so at most one persistence call is in flight at a time.

mod client;
mod pipeline;
mod timer;

pub use client::{ClientError, SavedSession, SessionApiClient, SessionDraft, SessionPersistence};
pub use pipeline::{
    AutosaveConfig, AutosaveHandle, AutosavePipeline, AutosaveStatus, FieldEdit, LeaveOutcome,
    PipelineError, SaveState,
};
pub use timer::DebounceTimer;
