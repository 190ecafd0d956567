//! In-memory task table behind the REST handlers.
//!
//! Tasks are kept in creation order. Ids are assigned from a counter that
//! never reuses a value, even after deletes.

use tokio::sync::RwLock;
use todos_proto::task::{NewTask, OwnerId, Task, TaskId, TaskPatch};

struct Table {
    tasks: Vec<Task>,
    next_id: u64,
}

/// Thread-safe task table.
///
/// Thread-safe via [`RwLock`]; reads (listing) can proceed concurrently.
pub struct TodoStore {
    table: RwLock<Table>,
}

impl Default for TodoStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TodoStore {
    /// Creates an empty store. The first task gets id 1.
    #[must_use]
    pub fn new() -> Self {
        Self::with_tasks(Vec::new())
    }

    /// Creates a store seeded with `tasks`; new ids continue after the highest.
    #[must_use]
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let next_id = tasks.iter().map(|t| t.id.get()).max().unwrap_or(0) + 1;
        Self {
            table: RwLock::new(Table { tasks, next_id }),
        }
    }

    /// Lists tasks in creation order, optionally restricted to one owner.
    pub async fn list(&self, owner: Option<OwnerId>) -> Vec<Task> {
        let table = self.table.read().await;
        table
            .tasks
            .iter()
            .filter(|t| owner.is_none_or(|o| t.user_id == o))
            .cloned()
            .collect()
    }

    /// Inserts a task with a fresh id. The caller has validated the title.
    pub async fn create(&self, new: NewTask) -> Task {
        let mut table = self.table.write().await;
        let task = Task {
            id: TaskId::new(table.next_id),
            user_id: new.user_id,
            title: new.title,
            completed: new.completed,
        };
        table.next_id += 1;
        table.tasks.push(task.clone());
        drop(table);
        task
    }

    /// Applies `patch` to task `id`, returning the updated task.
    ///
    /// Returns `None` if the id is unknown.
    pub async fn update(&self, id: TaskId, patch: TaskPatch) -> Option<Task> {
        let mut table = self.table.write().await;
        let task = table.tasks.iter_mut().find(|t| t.id == id)?;
        if let Some(title) = patch.title {
            task.title = title;
        }
        if let Some(completed) = patch.completed {
            task.completed = completed;
        }
        Some(task.clone())
    }

    /// Removes task `id`. Returns `false` if it did not exist.
    pub async fn delete(&self, id: TaskId) -> bool {
        let mut table = self.table.write().await;
        let before = table.tasks.len();
        table.tasks.retain(|t| t.id != id);
        table.tasks.len() != before
    }
}
