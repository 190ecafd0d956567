//! Orchestration of user intents, remote calls, and client state.
//!
//! The [`Controller`] owns every state component and is mutated from exactly
//! two places: [`Controller::handle`] for user [`Intent`]s and
//! [`Controller::apply`] for [`Completion`]s. Remote calls run as spawned
//! tokio tasks that report back over an unbounded channel, so completions
//! are applied in the order they finish, not the order they were issued.
//!
//! # Architecture
//!
//! ```text
//! UI ── Intent ──▶ Controller ── spawn ──▶ RemoteStore call
//!                     ▲                          │
//!                     └──────── Completion ──────┘
//! ```
//!
//! Every intent captures the task snapshot current at dispatch time; the
//! spawned request only carries ids and values copied from that snapshot.

pub mod intent;
pub mod view;

use std::future::Future;
use std::sync::Arc;

use tokio::sync::mpsc;
use todos_proto::filter::Filter;
use todos_proto::task::{OwnerId, Task, TaskId, normalize_title};

use crate::state::{
    BusyRelease, BusySet, Commit, DISMISS_AFTER, EditSession, ErrorChannel, Failure,
    SessionPolicy, TaskList,
};
use crate::store::RemoteStore;

pub use intent::{Completion, DeleteOrigin, Intent};
pub use view::{FilterCache, RowView, TodoView};

/// Settings that shape controller behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Owner whose list is loaded and who owns created tasks.
    pub owner: OwnerId,
    /// What starting a second edit session does.
    pub session_policy: SessionPolicy,
    /// How busy markers are released.
    pub busy_release: BusyRelease,
    /// Filter selected at startup.
    pub initial_filter: Filter,
}

impl ControllerConfig {
    /// Default settings for `owner`.
    #[must_use]
    pub fn new(owner: OwnerId) -> Self {
        Self {
            owner,
            session_policy: SessionPolicy::default(),
            busy_release: BusyRelease::default(),
            initial_filter: Filter::default(),
        }
    }
}

/// Owner of the task list, edit session, busy markers, filter, and error banner.
///
/// All methods that issue requests spawn tokio tasks and must run inside a
/// tokio runtime.
pub struct Controller<S: RemoteStore> {
    store: Arc<S>,
    owner: OwnerId,
    tasks: TaskList,
    edit: EditSession,
    busy: BusySet,
    errors: ErrorChannel,
    filter: Filter,
    cache: FilterCache,
    new_title: String,
    started: bool,
    in_flight: usize,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
}

impl<S: RemoteStore> Controller<S> {
    /// Creates a controller with empty state. Call [`start`](Self::start) to load.
    #[must_use]
    pub fn new(store: Arc<S>, config: ControllerConfig) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            store,
            owner: config.owner,
            tasks: TaskList::new(),
            edit: EditSession::new(config.session_policy),
            busy: BusySet::new(config.busy_release),
            errors: ErrorChannel::new(),
            filter: config.initial_filter,
            cache: FilterCache::default(),
            new_title: String::new(),
            started: false,
            in_flight: 0,
            tx,
            rx,
        }
    }

    // --- accessors ---

    /// Current task list snapshot.
    #[must_use]
    pub const fn tasks(&self) -> &TaskList {
        &self.tasks
    }

    /// Current edit session.
    #[must_use]
    pub const fn edit(&self) -> &EditSession {
        &self.edit
    }

    /// Current busy markers.
    #[must_use]
    pub const fn busy(&self) -> &BusySet {
        &self.busy
    }

    /// Error banner text, if shown.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.errors.message()
    }

    /// Active filter.
    #[must_use]
    pub const fn filter(&self) -> Filter {
        self.filter
    }

    /// New-task input text.
    #[must_use]
    pub fn new_title(&self) -> &str {
        &self.new_title
    }

    /// Number of remote requests not yet applied.
    #[must_use]
    pub const fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// The tasks visible under the active filter.
    pub fn visible(&mut self) -> Vec<Task> {
        self.cache.visible(&self.tasks, self.filter).to_vec()
    }

    /// Builds a render-ready snapshot.
    pub fn view(&mut self) -> TodoView {
        let visible = self.cache.visible(&self.tasks, self.filter);
        let session = self.edit.session();
        let mut rows: Vec<RowView> = visible
            .iter()
            .map(|task| RowView {
                task: task.clone(),
                busy: self.busy.contains(task.id),
                draft: session
                    .filter(|s| s.original().id == task.id)
                    .map(|s| s.draft().to_string()),
            })
            .collect();
        if let Some(pending) = self.tasks.pending() {
            rows.push(RowView {
                task: pending.clone(),
                busy: true,
                draft: None,
            });
        }
        TodoView {
            rows,
            filter: self.filter,
            active_count: self.tasks.active_count(),
            completed_count: self.tasks.completed_count(),
            all_completed: self.tasks.all_completed(),
            new_title: self.new_title.clone(),
            input_locked: self.tasks.pending().is_some(),
            editing: self.edit.editing_id(),
            error: self.errors.message().map(str::to_string),
        }
    }

    // --- driving ---

    /// Issues the initial fetch. Subsequent calls are ignored.
    pub fn start(&mut self) {
        if self.started {
            tracing::debug!("load already issued, ignoring");
            return;
        }
        self.started = true;
        let owner = self.owner;
        let store = Arc::clone(&self.store);
        tracing::debug!(%owner, "loading todos");
        self.spawn_request(async move { Completion::Loaded(store.fetch_all(owner).await) });
    }

    /// Applies one user intent.
    pub fn handle(&mut self, intent: Intent) {
        match intent {
            Intent::SetNewTitle(text) => {
                if self.tasks.pending().is_none() {
                    self.new_title = text;
                }
            }
            Intent::SubmitNew => self.submit_new(),
            Intent::ToggleStatus(id) => self.toggle_status(id),
            Intent::ToggleAll => self.toggle_all(),
            Intent::Delete(id) => self.delete(id),
            Intent::ClearCompleted => self.clear_completed(),
            Intent::StartEdit(id) => self.start_edit(id),
            Intent::EditDraft(text) => {
                self.edit.set_draft(text);
            }
            Intent::CommitEdit => self.commit_edit(),
            Intent::CancelEdit => self.cancel_edit(),
            Intent::SetFilter(filter) => self.filter = filter,
            Intent::DismissError => self.errors.dismiss(),
        }
    }

    /// Applies every completion that has already arrived, without waiting.
    ///
    /// Returns the number applied.
    pub fn drain(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(completion) = self.rx.try_recv() {
            self.apply(completion);
            applied += 1;
        }
        applied
    }

    /// Waits for the next completion (request or timer) and applies it.
    pub async fn step(&mut self) {
        if let Some(completion) = self.rx.recv().await {
            self.apply(completion);
        }
    }

    /// Applies completions until no remote request is outstanding.
    ///
    /// Timer completions that arrive meanwhile are applied too.
    pub async fn settle(&mut self) {
        while self.in_flight > 0 {
            self.step().await;
        }
    }

    /// Applies the outcome of a spawned request or timer.
    pub fn apply(&mut self, completion: Completion) {
        if completion.is_request() {
            self.in_flight = self.in_flight.saturating_sub(1);
        }
        match completion {
            Completion::Loaded(result) => self.on_loaded(result),
            Completion::Created(result) => self.on_created(result),
            Completion::Deleted { id, origin, result } => {
                match result {
                    Ok(()) => {
                        tracing::info!(task_id = %id, "task deleted");
                        self.tasks = self.tasks.apply_delete(id);
                    }
                    Err(e) => {
                        tracing::warn!(task_id = %id, error = %e, "delete failed");
                        self.raise(Failure::Delete);
                    }
                }
                if let DeleteOrigin::Edit(ticket) = origin {
                    self.edit.finish(ticket);
                }
                self.busy.release(id);
            }
            Completion::StatusUpdated { id, result } => {
                match result {
                    Ok(task) => {
                        tracing::info!(task_id = %id, completed = task.completed, "status updated");
                        self.tasks = self.tasks.apply_status_toggle(id);
                    }
                    Err(e) => {
                        tracing::warn!(task_id = %id, error = %e, "status update failed");
                        self.raise(Failure::Update);
                    }
                }
                self.busy.release(id);
            }
            Completion::TitleUpdated { id, ticket, result } => {
                match result {
                    Ok(_) => tracing::info!(task_id = %id, "title updated"),
                    Err(e) => {
                        // The optimistic title stays in place.
                        tracing::warn!(task_id = %id, error = %e, "title update failed");
                        self.raise(Failure::Update);
                    }
                }
                self.edit.finish(ticket);
                self.busy.release(id);
            }
            Completion::ErrorExpired(generation) => {
                if self.errors.expire(generation) {
                    tracing::debug!(generation, "error message expired");
                }
            }
        }
    }

    // --- intents ---

    fn submit_new(&mut self) {
        if self.tasks.pending().is_some() {
            tracing::debug!("create already in flight, submit ignored");
            return;
        }
        let Some(title) = normalize_title(&self.new_title) else {
            self.raise(Failure::EmptyTitle);
            return;
        };
        self.tasks = self
            .tasks
            .apply_pending(Task::pending(self.owner, title.clone()));
        let owner = self.owner;
        let store = Arc::clone(&self.store);
        tracing::debug!(%owner, %title, "creating task");
        self.spawn_request(async move { Completion::Created(store.create(owner, &title).await) });
    }

    fn toggle_status(&mut self, id: TaskId) {
        let Some(task) = self.tasks.get(id) else {
            tracing::debug!(task_id = %id, "toggle ignored, task not in list");
            return;
        };
        let completed = !task.completed;
        self.request_status(id, completed);
    }

    fn toggle_all(&mut self) {
        let target = !self.tasks.all_completed();
        let ids: Vec<TaskId> = self
            .tasks
            .tasks()
            .iter()
            .filter(|t| t.completed != target)
            .map(|t| t.id)
            .collect();
        tracing::debug!(count = ids.len(), completed = target, "toggling all");
        for id in ids {
            self.request_status(id, target);
        }
    }

    fn request_status(&mut self, id: TaskId, completed: bool) {
        self.busy.mark(id);
        let store = Arc::clone(&self.store);
        tracing::debug!(task_id = %id, completed, "updating status");
        self.spawn_request(async move {
            Completion::StatusUpdated {
                id,
                result: store.update_status(id, completed).await,
            }
        });
    }

    fn delete(&mut self, id: TaskId) {
        if self.tasks.get(id).is_none() {
            tracing::debug!(task_id = %id, "delete ignored, task not in list");
            return;
        }
        self.request_delete(id, DeleteOrigin::Row);
    }

    fn clear_completed(&mut self) {
        let ids: Vec<TaskId> = self
            .tasks
            .tasks()
            .iter()
            .filter(|t| t.completed)
            .map(|t| t.id)
            .collect();
        tracing::debug!(count = ids.len(), "clearing completed");
        for id in ids {
            self.request_delete(id, DeleteOrigin::Row);
        }
    }

    fn request_delete(&mut self, id: TaskId, origin: DeleteOrigin) {
        self.busy.mark(id);
        let store = Arc::clone(&self.store);
        tracing::debug!(task_id = %id, ?origin, "deleting task");
        self.spawn_request(async move {
            Completion::Deleted {
                id,
                origin,
                result: store.delete(id).await,
            }
        });
    }

    fn start_edit(&mut self, id: TaskId) {
        let Some(task) = self.tasks.get(id).cloned() else {
            tracing::debug!(task_id = %id, "edit ignored, task not in list");
            return;
        };
        if let Err(e) = self.edit.start(task) {
            tracing::warn!(task_id = %id, error = %e, "edit refused");
        }
    }

    fn commit_edit(&mut self) {
        match self.edit.commit() {
            None => tracing::debug!("commit ignored, no session in editing state"),
            Some(Commit::Unchanged) => {
                tracing::debug!("title unchanged, edit closed");
                self.busy.release_on_cancel();
            }
            Some(Commit::Delete { ticket, id }) => {
                self.request_delete(id, DeleteOrigin::Edit(ticket));
            }
            Some(Commit::Rename { ticket, id, title }) => {
                self.tasks = self.tasks.apply_title_update(id, &title);
                self.busy.mark(id);
                let store = Arc::clone(&self.store);
                tracing::debug!(task_id = %id, %title, "renaming task");
                self.spawn_request(async move {
                    Completion::TitleUpdated {
                        id,
                        ticket,
                        result: store.update_title(id, &title).await,
                    }
                });
            }
        }
    }

    fn cancel_edit(&mut self) {
        if self.edit.cancel() {
            tracing::debug!("edit cancelled");
            self.busy.release_on_cancel();
        }
    }

    // --- plumbing ---

    fn on_loaded(&mut self, result: Result<Vec<Task>, crate::store::StoreError>) {
        match result {
            Ok(tasks) => {
                tracing::info!(count = tasks.len(), "todos loaded");
                self.tasks = self.tasks.apply_load(tasks);
            }
            Err(e) => {
                tracing::warn!(error = %e, "load failed");
                self.raise(Failure::Load);
            }
        }
    }

    fn on_created(&mut self, result: Result<Task, crate::store::StoreError>) {
        match result {
            Ok(task) => {
                tracing::info!(task_id = %task.id, "task created");
                self.tasks = self.tasks.apply_create(task);
                self.new_title.clear();
            }
            Err(e) => {
                tracing::warn!(error = %e, "create failed");
                self.tasks = self.tasks.clear_pending();
                self.raise(Failure::Create);
            }
        }
    }

    fn spawn_request<F>(&mut self, request: F)
    where
        F: Future<Output = Completion> + Send + 'static,
    {
        self.in_flight += 1;
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(request.await);
        });
    }

    fn raise(&mut self, failure: Failure) {
        let generation = self.errors.raise(failure.to_string());
        // Deadline is fixed at raise time, not when the timer task first runs.
        let deadline = tokio::time::Instant::now() + DISMISS_AFTER;
        let tx = self.tx.clone();
        let timer = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            let _ = tx.send(Completion::ErrorExpired(generation));
        });
        self.errors.arm(timer.abort_handle());
    }
}
