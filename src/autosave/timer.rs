//! Cancellable debounce timer.
//!
//! A deadline that can be started, reset, and cancelled. Restarting while
//! armed discards the previous deadline, which is what coalesces a burst
//! of edits into one save.

use std::time::Duration;

use tokio::time::{sleep_until, Instant};

/// Single-deadline timer with start/reset/cancel semantics.
#[derive(Debug)]
pub struct DebounceTimer {
    window: Duration,
    deadline: Option<Instant>,
}

impl DebounceTimer {
    /// Creates a disarmed timer with the given window.
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    /// Arms the timer (or re-arms it) one window from now.
    pub fn restart(&mut self) {
        self.deadline = Some(Instant::now() + self.window);
    }

    /// Disarms the timer.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Returns true while a deadline is pending.
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Completes when the armed deadline elapses.
    ///
    /// Never completes while disarmed, which makes it safe to poll from a
    /// `select!` arm alongside other triggers.
    pub async fn fired(&self) {
        match self.deadline {
            Some(deadline) => sleep_until(deadline).await,
            None => futures::future::pending().await,
        }
    }
}
