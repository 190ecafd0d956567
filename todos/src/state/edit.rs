//! Inline-rename session state machine.
//!
//! ```text
//! Idle ──start──▶ Editing ──commit──▶ Saving ──finish──▶ Idle
//!                   │  ▲                 │
//!                   │  └── set_draft     └── cancel ──▶ Idle
//!                   └── cancel / unchanged commit ──▶ Idle
//! ```
//!
//! At most one session exists. Each session gets a [`SessionTicket`] so a
//! late completion for an older session never closes a newer one.

use todos_proto::task::{Task, TaskId, normalize_title};

/// What happens when an edit starts while another session is open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionPolicy {
    /// Discard the open session (and its unsaved draft) and start the new one.
    #[default]
    Replace,
    /// Keep the open session and refuse the new one.
    Reject,
}

/// Identifies one edit session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionTicket(u64);

/// Errors from [`EditSession::start`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EditError {
    /// Another session is open and the policy is [`SessionPolicy::Reject`].
    #[error("task {0} is already being edited")]
    SessionActive(TaskId),
}

/// An open session: the task as captured at edit start plus the draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    ticket: SessionTicket,
    original: Task,
    draft: String,
}

impl Session {
    /// The session's ticket.
    #[must_use]
    pub const fn ticket(&self) -> SessionTicket {
        self.ticket
    }

    /// The task as it was when the edit started.
    #[must_use]
    pub const fn original(&self) -> &Task {
        &self.original
    }

    /// The in-progress text.
    #[must_use]
    pub fn draft(&self) -> &str {
        &self.draft
    }
}

/// Current phase of the edit session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditState {
    /// No row is being edited.
    #[default]
    Idle,
    /// A row is being edited; the draft is mutable.
    Editing(Session),
    /// The draft was submitted and a request is outbound.
    Saving(Session),
}

/// The request a commit resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Commit {
    /// Draft was blank: delete the task.
    Delete {
        /// Session that issued the request.
        ticket: SessionTicket,
        /// Task to delete.
        id: TaskId,
    },
    /// Draft equals the original title: nothing to send.
    Unchanged,
    /// Draft differs: rename the task.
    Rename {
        /// Session that issued the request.
        ticket: SessionTicket,
        /// Task to rename.
        id: TaskId,
        /// Trimmed new title.
        title: String,
    },
}

/// Single-slot edit session.
#[derive(Debug, Default)]
pub struct EditSession {
    state: EditState,
    policy: SessionPolicy,
    next_ticket: u64,
}

impl EditSession {
    /// Creates an idle session slot with the given policy.
    #[must_use]
    pub fn new(policy: SessionPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Current phase.
    #[must_use]
    pub const fn state(&self) -> &EditState {
        &self.state
    }

    /// The open session, in either Editing or Saving.
    #[must_use]
    pub const fn session(&self) -> Option<&Session> {
        match &self.state {
            EditState::Idle => None,
            EditState::Editing(s) | EditState::Saving(s) => Some(s),
        }
    }

    /// Returns `true` while a session exists.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !matches!(self.state, EditState::Idle)
    }

    /// Returns `true` only in the Editing phase.
    #[must_use]
    pub const fn is_editing(&self) -> bool {
        matches!(self.state, EditState::Editing(_))
    }

    /// Id of the task bound to the open session.
    #[must_use]
    pub fn editing_id(&self) -> Option<TaskId> {
        self.session().map(|s| s.original.id)
    }

    /// Opens a session on `task` with its title as the draft.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::SessionActive`] if a session is open and the
    /// policy is [`SessionPolicy::Reject`].
    pub fn start(&mut self, task: Task) -> Result<SessionTicket, EditError> {
        if let Some(open) = self.session() {
            match self.policy {
                SessionPolicy::Reject => {
                    return Err(EditError::SessionActive(open.original.id));
                }
                SessionPolicy::Replace => {
                    tracing::debug!(
                        task_id = %open.original.id,
                        "replacing open edit session, draft discarded"
                    );
                }
            }
        }
        self.next_ticket += 1;
        let ticket = SessionTicket(self.next_ticket);
        self.state = EditState::Editing(Session {
            ticket,
            draft: task.title.clone(),
            original: task,
        });
        Ok(ticket)
    }

    /// Replaces the draft. Ignored unless Editing; returns whether it applied.
    pub fn set_draft(&mut self, text: impl Into<String>) -> bool {
        if let EditState::Editing(session) = &mut self.state {
            session.draft = text.into();
            true
        } else {
            false
        }
    }

    /// Resolves the draft into a request.
    ///
    /// Only legal while Editing; returns `None` otherwise, so a duplicate
    /// submit (Enter followed by blur) is dropped. `Delete` and `Rename` move
    /// the session to Saving; `Unchanged` closes it.
    pub fn commit(&mut self) -> Option<Commit> {
        if !self.is_editing() {
            return None;
        }
        let EditState::Editing(session) = std::mem::take(&mut self.state) else {
            return None;
        };
        let ticket = session.ticket;
        let id = session.original.id;
        let commit = match normalize_title(&session.draft) {
            None => Commit::Delete { ticket, id },
            Some(title) if title == session.original.title => Commit::Unchanged,
            Some(title) => Commit::Rename { ticket, id, title },
        };
        self.state = match commit {
            Commit::Unchanged => EditState::Idle,
            Commit::Delete { .. } | Commit::Rename { .. } => EditState::Saving(session),
        };
        Some(commit)
    }

    /// Closes the session if it is Saving under `ticket`.
    ///
    /// Returns `false` when the ticket is stale (cancelled or replaced).
    pub fn finish(&mut self, ticket: SessionTicket) -> bool {
        match &self.state {
            EditState::Saving(session) if session.ticket == ticket => {
                self.state = EditState::Idle;
                true
            }
            _ => false,
        }
    }

    /// Discards the open session. Returns whether one existed.
    pub fn cancel(&mut self) -> bool {
        let was_active = self.is_active();
        self.state = EditState::Idle;
        was_active
    }
}
