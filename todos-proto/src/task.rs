//! Task model for the `todos` REST contract.
//!
//! Field names follow the JSON wire format (`userId`, `completed`) so the
//! same types are used by the HTTP client and the reference server.

use serde::{Deserialize, Serialize};

/// Maximum allowed task title length in characters.
pub const MAX_TASK_TITLE_LENGTH: usize = 256;

/// Server-assigned task identifier.
///
/// Real identifiers are positive. `0` is reserved for the placeholder shown
/// while a create request is outbound (see [`TaskId::PENDING`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(u64);

impl TaskId {
    /// Sentinel id carried by a task that the server has not confirmed yet.
    pub const PENDING: Self = Self(0);

    /// Creates a `TaskId` from its raw value.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Returns `true` for the pending-creation sentinel.
    #[must_use]
    pub const fn is_pending(self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the user that owns a task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(u32);

impl OwnerId {
    /// Creates an `OwnerId` from its raw value.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw numeric value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for OwnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A persisted task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Server-assigned identifier, immutable once created.
    pub id: TaskId,
    /// Owner of the task.
    pub user_id: OwnerId,
    /// Trimmed, non-empty title.
    pub title: String,
    /// Completion flag.
    pub completed: bool,
}

impl Task {
    /// Builds the placeholder shown at the end of the list while a create
    /// request is in flight.
    #[must_use]
    pub fn pending(user_id: OwnerId, title: impl Into<String>) -> Self {
        Self {
            id: TaskId::PENDING,
            user_id,
            title: title.into(),
            completed: false,
        }
    }
}

/// Request body for `POST /todos`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    /// Owner of the new task.
    pub user_id: OwnerId,
    /// Title of the new task.
    pub title: String,
    /// Initial completion flag (always `false` from the client).
    #[serde(default)]
    pub completed: bool,
}

/// Request body for `PATCH /todos/{id}`.
///
/// Absent fields are left untouched by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPatch {
    /// New title, if changing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New completion flag, if changing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TaskPatch {
    /// Patch that only changes the title.
    #[must_use]
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            completed: None,
        }
    }

    /// Patch that only changes the completion flag.
    #[must_use]
    pub const fn completed(completed: bool) -> Self {
        Self {
            title: None,
            completed: Some(completed),
        }
    }

    /// Returns `true` if the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none() && self.completed.is_none()
    }
}

/// Trims a raw title, returning `None` when nothing is left.
#[must_use]
pub fn normalize_title(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
