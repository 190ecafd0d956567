//! The authoritative client-side task collection.
//!
//! `TaskList` is an immutable snapshot: every `apply_*` method returns a new
//! list and leaves `self` untouched. Readers holding an older snapshot never
//! observe a mutation, and [`TaskList::revision`] changes only when the
//! content does.

use std::sync::Arc;

use todos_proto::task::{Task, TaskId};

/// Ordered collection of confirmed tasks plus the optional pending placeholder.
#[derive(Debug, Clone, Default)]
pub struct TaskList {
    tasks: Arc<[Task]>,
    pending: Option<Task>,
    revision: u64,
}

impl TaskList {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Confirmed tasks in display order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// The placeholder for an outbound create request, if any.
    #[must_use]
    pub const fn pending(&self) -> Option<&Task> {
        self.pending.as_ref()
    }

    /// Monotonic content revision, bumped by every effective change.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Number of confirmed tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns `true` if there are no confirmed tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Looks up a confirmed task by id.
    #[must_use]
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Number of tasks that are not completed.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.tasks.iter().filter(|t| !t.completed).count()
    }

    /// Number of completed tasks.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.tasks.len() - self.active_count()
    }

    /// Returns `true` if the list is non-empty and every task is completed.
    #[must_use]
    pub fn all_completed(&self) -> bool {
        !self.tasks.is_empty() && self.tasks.iter().all(|t| t.completed)
    }

    fn replaced(&self, tasks: Vec<Task>) -> Self {
        Self {
            tasks: tasks.into(),
            pending: self.pending.clone(),
            revision: self.revision + 1,
        }
    }

    /// Replaces the whole collection with a freshly loaded one.
    #[must_use]
    pub fn apply_load(&self, tasks: Vec<Task>) -> Self {
        self.replaced(tasks)
    }

    /// Shows `task` as the pending placeholder.
    #[must_use]
    pub fn apply_pending(&self, task: Task) -> Self {
        Self {
            tasks: Arc::clone(&self.tasks),
            pending: Some(task),
            revision: self.revision + 1,
        }
    }

    /// Drops the pending placeholder, if any.
    #[must_use]
    pub fn clear_pending(&self) -> Self {
        if self.pending.is_none() {
            return self.clone();
        }
        Self {
            tasks: Arc::clone(&self.tasks),
            pending: None,
            revision: self.revision + 1,
        }
    }

    /// Appends a server-confirmed task and clears the pending placeholder.
    ///
    /// A task whose id is already present replaces the existing entry in
    /// place, so ids stay unique.
    #[must_use]
    pub fn apply_create(&self, task: Task) -> Self {
        let mut tasks = self.tasks.to_vec();
        if let Some(existing) = tasks.iter_mut().find(|t| t.id == task.id) {
            *existing = task;
        } else {
            tasks.push(task);
        }
        let mut next = self.replaced(tasks);
        next.pending = None;
        next
    }

    /// Removes the task with `id`; no-op if absent.
    #[must_use]
    pub fn apply_delete(&self, id: TaskId) -> Self {
        if self.get(id).is_none() {
            return self.clone();
        }
        self.replaced(self.tasks.iter().filter(|t| t.id != id).cloned().collect())
    }

    /// Flips `completed` on the task with `id`; no-op if absent.
    #[must_use]
    pub fn apply_status_toggle(&self, id: TaskId) -> Self {
        self.map_one(id, |t| t.completed = !t.completed)
    }

    /// Replaces the title of the task with `id`; no-op if absent.
    #[must_use]
    pub fn apply_title_update(&self, id: TaskId, title: &str) -> Self {
        self.map_one(id, |t| t.title = title.to_string())
    }

    fn map_one(&self, id: TaskId, edit: impl FnOnce(&mut Task)) -> Self {
        let Some(index) = self.tasks.iter().position(|t| t.id == id) else {
            return self.clone();
        };
        let mut tasks = self.tasks.to_vec();
        edit(&mut tasks[index]);
        self.replaced(tasks)
    }
}
