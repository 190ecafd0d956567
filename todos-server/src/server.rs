//! HTTP routes for the todo REST contract.
//!
//! | Method   | Path          | Body                          | Success          |
//! |----------|---------------|-------------------------------|------------------|
//! | `GET`    | `/todos`      | `?userId=N` (optional)        | `200` task array |
//! | `POST`   | `/todos`      | `{userId, title, completed}`  | `201` task       |
//! | `PATCH`  | `/todos/{id}` | `{title}` and/or `{completed}`| `200` task       |
//! | `DELETE` | `/todos/{id}` |                               | `204`            |
//!
//! Titles are trimmed and must be non-empty and at most `max_title_len`
//! characters (`422` otherwise). Unknown ids yield `404`.

use std::sync::Arc;
use std::time::Duration;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch};
use todos_proto::task::{
    MAX_TASK_TITLE_LENGTH, NewTask, OwnerId, Task, TaskId, TaskPatch, normalize_title,
};

use crate::store::TodoStore;

/// Errors returned to HTTP clients.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ApiError {
    /// No task has this id.
    #[error("todo {0} not found")]
    NotFound(TaskId),
    /// Title is blank after trimming.
    #[error("title should not be empty")]
    EmptyTitle,
    /// Title exceeds the configured maximum.
    #[error("title exceeds {max} characters")]
    TitleTooLong {
        /// Configured maximum.
        max: usize,
    },
    /// PATCH body changes nothing.
    #[error("patch must set title or completed")]
    EmptyPatch,
}

impl ApiError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::EmptyTitle | Self::TitleTooLong { .. } | Self::EmptyPatch => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}

/// Shared server state.
pub struct ServerState {
    store: TodoStore,
    latency: Duration,
    max_title_len: usize,
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerState {
    /// Empty store, no latency, default title limit.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(TodoStore::new(), Duration::ZERO, MAX_TASK_TITLE_LENGTH)
    }

    /// State with a given store, artificial per-request latency, and title limit.
    #[must_use]
    pub const fn with_config(store: TodoStore, latency: Duration, max_title_len: usize) -> Self {
        Self {
            store,
            latency,
            max_title_len,
        }
    }

    /// The underlying task table.
    #[must_use]
    pub const fn store(&self) -> &TodoStore {
        &self.store
    }

    fn validate_title(&self, raw: &str) -> Result<String, ApiError> {
        let title = normalize_title(raw).ok_or(ApiError::EmptyTitle)?;
        if title.chars().count() > self.max_title_len {
            return Err(ApiError::TitleTooLong {
                max: self.max_title_len,
            });
        }
        Ok(title)
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

type SharedState = Arc<ServerState>;

/// Builds the router over `state`.
pub fn router(state: SharedState) -> axum::Router {
    axum::Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/{id}", patch(update_todo).delete(delete_todo))
        .with_state(state)
}

/// Starts the server on the given address and returns the bound address
/// and a join handle.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind to the given address.
pub async fn start_server(
    addr: &str,
) -> Result<
    (std::net::SocketAddr, tokio::task::JoinHandle<()>),
    Box<dyn std::error::Error + Send + Sync>,
> {
    start_server_with_state(addr, Arc::new(ServerState::new())).await
}

/// Starts the server with a pre-configured [`ServerState`].
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind to the given address.
pub async fn start_server_with_state(
    addr: &str,
    state: SharedState,
) -> Result<
    (std::net::SocketAddr, tokio::task::JoinHandle<()>),
    Box<dyn std::error::Error + Send + Sync>,
> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "todos server error");
        }
    });

    Ok((bound_addr, handle))
}

#[derive(Debug, serde::Deserialize)]
struct ListParams {
    #[serde(rename = "userId")]
    user_id: Option<u32>,
}

async fn list_todos(
    State(state): State<SharedState>,
    Query(params): Query<ListParams>,
) -> Json<Vec<Task>> {
    state.simulate_latency().await;
    let tasks = state.store.list(params.user_id.map(OwnerId::new)).await;
    tracing::debug!(user_id = ?params.user_id, count = tasks.len(), "listed todos");
    Json(tasks)
}

async fn create_todo(
    State(state): State<SharedState>,
    Json(mut new): Json<NewTask>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    state.simulate_latency().await;
    new.title = state.validate_title(&new.title)?;
    let task = state.store.create(new).await;
    tracing::info!(task_id = %task.id, user_id = %task.user_id, "todo created");
    Ok((StatusCode::CREATED, Json(task)))
}

async fn update_todo(
    State(state): State<SharedState>,
    Path(id): Path<u64>,
    Json(mut patch): Json<TaskPatch>,
) -> Result<Json<Task>, ApiError> {
    state.simulate_latency().await;
    let id = TaskId::new(id);
    if patch.is_empty() {
        return Err(ApiError::EmptyPatch);
    }
    if let Some(title) = patch.title.take() {
        patch.title = Some(state.validate_title(&title)?);
    }
    let task = state
        .store
        .update(id, patch)
        .await
        .ok_or(ApiError::NotFound(id))?;
    tracing::info!(task_id = %id, "todo updated");
    Ok(Json(task))
}

async fn delete_todo(
    State(state): State<SharedState>,
    Path(id): Path<u64>,
) -> Result<StatusCode, ApiError> {
    state.simulate_latency().await;
    let id = TaskId::new(id);
    if state.store.delete(id).await {
        tracing::info!(task_id = %id, "todo deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(id))
    }
}
