//! The autosave scheduler.
//!
//! One loop owns every trigger: field edits restart a 5-second debounce,
//! a 30-second interval bounds staleness under continuous editing, and
//! explicit saves flow through the same routine. Persistence calls are
//! awaited inline, so a trigger firing mid-save is absorbed into the next
//! flush instead of racing a second request.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::domain::foundation::{SessionId, SessionStatus, Timestamp};

use super::client::{ClientError, SavedSession, SessionDraft, SessionPersistence};
use super::timer::DebounceTimer;

const COMMAND_BUFFER: usize = 64;

/// Timing knobs for the scheduler.
#[derive(Debug, Clone)]
pub struct AutosaveConfig {
    /// Quiet period after the last edit before an autosave fires.
    pub debounce_window: Duration,
    /// Staleness bound: a flush is attempted at least this often.
    pub flush_interval: Duration,
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            debounce_window: Duration::from_secs(5),
            flush_interval: Duration::from_secs(30),
        }
    }
}

/// A single field edit from the editor surface.
#[derive(Debug, Clone)]
pub enum FieldEdit {
    Title(String),
    Tags(Vec<String>),
    JsonUrl(Option<String>),
    Content(String),
}

/// Where the last save attempt left the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SaveState {
    #[default]
    Idle,
    Saving,
    Saved,
    /// Recoverable failure; retried on the next edit or timer tick.
    Failed(String),
    /// Credential rejected; the editor must re-authenticate.
    ReauthRequired,
}

/// Observable pipeline state, published on every change.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AutosaveStatus {
    /// Set once the first create succeeds.
    pub session_id: Option<SessionId>,
    pub has_unsaved_changes: bool,
    pub last_saved: Option<Timestamp>,
    pub save_count: u64,
    pub state: SaveState,
}

/// Result of asking to leave the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveOutcome {
    /// Pipeline shut down; pending timers cancelled, no final flush.
    Left,
    /// The confirmation was declined; the pipeline keeps running.
    Stayed,
}

/// Errors constructing a pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// The editor treats published sessions as read-only.
    #[error("Published sessions cannot be edited")]
    PublishedReadOnly,
}

enum EditorCommand {
    Edit(FieldEdit),
    Save {
        status: SessionStatus,
        reply: oneshot::Sender<Result<SavedSession, ClientError>>,
    },
    Shutdown,
}

/// Editor-facing handle to a running pipeline.
#[derive(Clone)]
pub struct AutosaveHandle {
    commands: mpsc::Sender<EditorCommand>,
    status: watch::Receiver<AutosaveStatus>,
}

impl AutosaveHandle {
    /// Records a field edit, restarting the debounce window.
    pub async fn edit(&self, edit: FieldEdit) {
        let _ = self.commands.send(EditorCommand::Edit(edit)).await;
    }

    /// Explicit save with the given target status.
    ///
    /// Unlike autosave, validation problems are surfaced to the caller
    /// instead of being skipped silently.
    pub async fn save(&self, status: SessionStatus) -> Result<SavedSession, ClientError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(EditorCommand::Save { status, reply })
            .await
            .map_err(|_| ClientError::Transport("editor pipeline closed".to_string()))?;
        response
            .await
            .map_err(|_| ClientError::Transport("editor pipeline closed".to_string()))?
    }

    /// Current pipeline status snapshot.
    pub fn status(&self) -> AutosaveStatus {
        self.status.borrow().clone()
    }

    /// Ask to leave the editor.
    ///
    /// With unsaved changes, `confirm` is consulted first; declining keeps
    /// the pipeline alive. Accepting (or leaving clean) shuts the pipeline
    /// down with pending timers cancelled and no final flush.
    pub async fn leave(&self, confirm: impl FnOnce() -> bool) -> LeaveOutcome {
        if self.status().has_unsaved_changes && !confirm() {
            return LeaveOutcome::Stayed;
        }
        let _ = self.commands.send(EditorCommand::Shutdown).await;
        LeaveOutcome::Left
    }
}

/// The scheduler itself. Construct with [`AutosavePipeline::new`], then
/// drive it with [`AutosavePipeline::run`] on the editor's runtime.
pub struct AutosavePipeline {
    client: Arc<dyn SessionPersistence>,
    config: AutosaveConfig,
    draft: SessionDraft,
    has_unsaved_changes: bool,
    last_saved: Option<Timestamp>,
    save_count: u64,
    state: SaveState,
    commands: mpsc::Receiver<EditorCommand>,
    status_tx: watch::Sender<AutosaveStatus>,
}

impl AutosavePipeline {
    /// Creates a pipeline over `draft`, returning it with its handle.
    ///
    /// # Errors
    ///
    /// - `PublishedReadOnly` when the draft is an already-persisted
    ///   published session
    pub fn new(
        client: Arc<dyn SessionPersistence>,
        draft: SessionDraft,
        config: AutosaveConfig,
    ) -> Result<(Self, AutosaveHandle), PipelineError> {
        if draft.session_id.is_some() && draft.status.is_public() {
            return Err(PipelineError::PublishedReadOnly);
        }

        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let initial = AutosaveStatus {
            session_id: draft.session_id,
            ..AutosaveStatus::default()
        };
        let (status_tx, status_rx) = watch::channel(initial);

        let pipeline = Self {
            client,
            config,
            draft,
            has_unsaved_changes: false,
            last_saved: None,
            save_count: 0,
            state: SaveState::Idle,
            commands: command_rx,
            status_tx,
        };
        let handle = AutosaveHandle {
            commands: command_tx,
            status: status_rx,
        };
        Ok((pipeline, handle))
    }

    /// Runs the scheduler until the editor leaves or every handle drops.
    pub async fn run(mut self) {
        let mut debounce = DebounceTimer::new(self.config.debounce_window);
        let mut ticker = interval_at(
            Instant::now() + self.config.flush_interval,
            self.config.flush_interval,
        );
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(EditorCommand::Edit(edit)) => {
                        self.apply_edit(edit);
                        debounce.restart();
                    }
                    Some(EditorCommand::Save { status, reply }) => {
                        debounce.cancel();
                        let result = self.manual_save(status).await;
                        let _ = reply.send(result);
                    }
                    Some(EditorCommand::Shutdown) | None => break,
                },
                _ = debounce.fired() => {
                    debounce.cancel();
                    self.autosave_tick().await;
                }
                _ = ticker.tick() => {
                    self.autosave_tick().await;
                }
            }
        }
    }

    fn apply_edit(&mut self, edit: FieldEdit) {
        match edit {
            FieldEdit::Title(title) => self.draft.title = title,
            FieldEdit::Tags(tags) => self.draft.tags = tags,
            FieldEdit::JsonUrl(url) => self.draft.json_url = url,
            FieldEdit::Content(content) => self.draft.content = content,
        }
        self.has_unsaved_changes = true;
        self.publish_status();
    }

    /// The shared check-and-save used by both timers.
    ///
    /// Skips silently when there is nothing to save or the draft is not
    /// yet a valid session.
    async fn autosave_tick(&mut self) {
        if !self.has_unsaved_changes {
            return;
        }
        if !self.draft.is_valid() {
            tracing::debug!("skipping autosave: title or content empty");
            return;
        }
        let _ = self.persist().await;
    }

    async fn manual_save(&mut self, status: SessionStatus) -> Result<SavedSession, ClientError> {
        self.draft.status = status;
        if self.draft.title.trim().is_empty() {
            return Err(ClientError::InvalidDraft("Title is required"));
        }
        if self.draft.content.trim().is_empty() {
            return Err(ClientError::InvalidDraft("Content is required"));
        }
        self.persist().await
    }

    /// The single persistence routine: create on first save, update after.
    async fn persist(&mut self) -> Result<SavedSession, ClientError> {
        self.state = SaveState::Saving;
        self.publish_status();

        let result = match &self.draft.session_id {
            None => self.client.create(&self.draft).await,
            Some(id) => self.client.update(id, &self.draft).await,
        };

        match &result {
            Ok(saved) => {
                self.draft.session_id = Some(saved.id);
                self.has_unsaved_changes = false;
                self.last_saved = Some(Timestamp::now());
                self.save_count += 1;
                self.state = SaveState::Saved;
            }
            Err(ClientError::Unauthenticated) => {
                tracing::warn!("autosave rejected: re-authentication required");
                self.state = SaveState::ReauthRequired;
            }
            Err(e) => {
                tracing::warn!("autosave failed: {}", e);
                self.state = SaveState::Failed(e.to_string());
            }
        }

        self.publish_status();
        result
    }

    fn publish_status(&self) {
        self.status_tx.send_replace(AutosaveStatus {
            session_id: self.draft.session_id,
            has_unsaved_changes: self.has_unsaved_changes,
            last_saved: self.last_saved,
            save_count: self.save_count,
            state: self.state.clone(),
        });
    }
}
