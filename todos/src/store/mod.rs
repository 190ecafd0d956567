//! Remote store abstraction for `todos`.
//!
//! Defines the [`RemoteStore`] trait that every backend must satisfy.
//! Concrete implementations include:
//! - [`memory::InMemoryStore`]: in-process store with fault injection for tests and demo mode
//! - [`http::HttpStore`]: JSON REST client

pub mod http;
pub mod memory;

use std::fmt;

use todos_proto::task::{OwnerId, Task, TaskId};

/// The remote operations a controller can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Fetch every task of an owner.
    FetchAll,
    /// Create a task.
    Create,
    /// Change a task's title.
    UpdateTitle,
    /// Change a task's completion flag.
    UpdateStatus,
    /// Delete a task.
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FetchAll => write!(f, "fetch-all"),
            Self::Create => write!(f, "create"),
            Self::UpdateTitle => write!(f, "update-title"),
            Self::UpdateStatus => write!(f, "update-status"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// Errors that can occur during remote store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The request could not be sent or the response could not be read.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("server returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// The response body was not valid JSON for the expected type.
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    /// A request URL could not be built.
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    /// The addressed task does not exist.
    #[error("task {0} not found")]
    NotFound(TaskId),

    /// The backend refused the operation.
    #[error("{0} unavailable")]
    Unavailable(Operation),
}

/// Async task store consumed by the controller.
///
/// Each call is a single attempt: it resolves with the value or with a
/// [`StoreError`]. Retries, authentication, and pagination are the
/// implementation's concern, never the caller's.
pub trait RemoteStore: Send + Sync + 'static {
    /// Fetch every task owned by `owner`, in display order.
    fn fetch_all(
        &self,
        owner: OwnerId,
    ) -> impl std::future::Future<Output = Result<Vec<Task>, StoreError>> + Send;

    /// Create a task and return it with its server-assigned id.
    fn create(
        &self,
        owner: OwnerId,
        title: &str,
    ) -> impl std::future::Future<Output = Result<Task, StoreError>> + Send;

    /// Replace a task's title.
    fn update_title(
        &self,
        id: TaskId,
        title: &str,
    ) -> impl std::future::Future<Output = Result<Task, StoreError>> + Send;

    /// Set a task's completion flag.
    fn update_status(
        &self,
        id: TaskId,
        completed: bool,
    ) -> impl std::future::Future<Output = Result<Task, StoreError>> + Send;

    /// Delete a task.
    fn delete(&self, id: TaskId) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;
}
