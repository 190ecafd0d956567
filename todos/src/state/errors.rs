//! User-visible error banner with timed auto-dismiss.
//!
//! The channel holds at most one message. Raising a new message replaces the
//! old one and supersedes its dismiss timer; every raise gets a new
//! generation number, and a timer only clears the message it was armed for.

use std::time::Duration;

use tokio::task::AbortHandle;

/// How long a message stays visible when nothing replaces or dismisses it.
pub const DISMISS_AFTER: Duration = Duration::from_millis(3000);

/// The failures the controller reports to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Failure {
    /// Initial fetch failed.
    #[error("Unable to load todos")]
    Load,
    /// The new-task title was blank.
    #[error("Title should not be empty")]
    EmptyTitle,
    /// Create request failed.
    #[error("Unable to add a todo")]
    Create,
    /// Delete request failed.
    #[error("Unable to delete a todo")]
    Delete,
    /// Title or status update failed.
    #[error("Unable to update a todo")]
    Update,
}

/// Identifies one raised message.
pub type Generation = u64;

/// Holder of the current error message and its dismiss timer.
#[derive(Debug, Default)]
pub struct ErrorChannel {
    message: Option<String>,
    generation: Generation,
    timer: Option<AbortHandle>,
}

impl ErrorChannel {
    /// Creates an empty channel.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The message currently shown, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Shows `message`, cancelling any pending dismissal.
    ///
    /// Returns the generation the caller must pass to [`expire`](Self::expire)
    /// when the new dismiss timer fires. Arm that timer with
    /// [`arm`](Self::arm).
    pub fn raise(&mut self, message: impl Into<String>) -> Generation {
        self.cancel_timer();
        self.generation += 1;
        self.message = Some(message.into());
        self.generation
    }

    /// Attaches the dismiss timer for the current generation.
    pub fn arm(&mut self, timer: AbortHandle) {
        self.cancel_timer();
        self.timer = Some(timer);
    }

    /// Clears the message on user request and cancels the timer.
    pub fn dismiss(&mut self) {
        self.cancel_timer();
        self.message = None;
    }

    /// Clears the message if `generation` is still current.
    ///
    /// A stale or duplicate expiry is a no-op and returns `false`.
    pub fn expire(&mut self, generation: Generation) -> bool {
        if generation != self.generation || self.message.is_none() {
            return false;
        }
        self.timer = None;
        self.message = None;
        true
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl Drop for ErrorChannel {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}
