//! Messages flowing into the controller.
//!
//! [`Intent`]s come from the user; [`Completion`]s come back from spawned
//! remote calls and timers, in the order they finish.

use todos_proto::filter::Filter;
use todos_proto::task::{Task, TaskId};

use crate::state::SessionTicket;
use crate::state::errors::Generation;
use crate::store::StoreError;

/// A user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Replace the new-task input text.
    SetNewTitle(String),
    /// Submit the new-task input.
    SubmitNew,
    /// Flip a task's completion flag.
    ToggleStatus(TaskId),
    /// Complete every task, or reopen all when all are complete.
    ToggleAll,
    /// Delete a task.
    Delete(TaskId),
    /// Delete every completed task.
    ClearCompleted,
    /// Open the inline editor on a task.
    StartEdit(TaskId),
    /// Replace the inline editor text.
    EditDraft(String),
    /// Submit the inline editor (Enter or leaving the row).
    CommitEdit,
    /// Abandon the inline editor (Escape).
    CancelEdit,
    /// Change the visible subset.
    SetFilter(Filter),
    /// Close the error banner.
    DismissError,
}

/// Who asked for a delete; decides the follow-up on completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOrigin {
    /// The row's delete control or clear-completed.
    Row,
    /// A blank draft committed from the inline editor.
    Edit(SessionTicket),
}

/// The outcome of a spawned request or timer.
#[derive(Debug)]
pub enum Completion {
    /// Initial fetch finished.
    Loaded(Result<Vec<Task>, StoreError>),
    /// Create finished.
    Created(Result<Task, StoreError>),
    /// Delete finished.
    Deleted {
        /// Target task.
        id: TaskId,
        /// Who issued it.
        origin: DeleteOrigin,
        /// Outcome.
        result: Result<(), StoreError>,
    },
    /// Status update finished.
    StatusUpdated {
        /// Target task.
        id: TaskId,
        /// Outcome.
        result: Result<Task, StoreError>,
    },
    /// Title update finished.
    TitleUpdated {
        /// Target task.
        id: TaskId,
        /// Session that issued it.
        ticket: SessionTicket,
        /// Outcome.
        result: Result<Task, StoreError>,
    },
    /// An error banner's dismiss timer fired.
    ErrorExpired(Generation),
}

impl Completion {
    /// Returns `true` for completions of remote requests (not timers).
    #[must_use]
    pub const fn is_request(&self) -> bool {
        !matches!(self, Self::ErrorExpired(_))
    }
}
