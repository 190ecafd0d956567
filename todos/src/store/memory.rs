//! In-memory remote store for tests and demo mode.
//!
//! [`InMemoryStore`] behaves like the REST backend but lives in-process.
//! Failures and latency can be injected per [`Operation`], and every call is
//! recorded so tests can assert which requests were issued.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use parking_lot::Mutex;
use todos_proto::task::{OwnerId, Task, TaskId};

use super::{Operation, RemoteStore, StoreError};

/// A request observed by the store, in invocation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    /// `fetch_all(owner)`.
    FetchAll(OwnerId),
    /// `create(owner, title)`.
    Create {
        /// Requested owner.
        owner: OwnerId,
        /// Requested title.
        title: String,
    },
    /// `update_title(id, title)`.
    UpdateTitle {
        /// Target task.
        id: TaskId,
        /// Requested title.
        title: String,
    },
    /// `update_status(id, completed)`.
    UpdateStatus {
        /// Target task.
        id: TaskId,
        /// Requested flag.
        completed: bool,
    },
    /// `delete(id)`.
    Delete(TaskId),
}

impl Call {
    /// The operation kind of this call.
    #[must_use]
    pub const fn operation(&self) -> Operation {
        match self {
            Self::FetchAll(_) => Operation::FetchAll,
            Self::Create { .. } => Operation::Create,
            Self::UpdateTitle { .. } => Operation::UpdateTitle,
            Self::UpdateStatus { .. } => Operation::UpdateStatus,
            Self::Delete(_) => Operation::Delete,
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    tasks: Vec<Task>,
    next_id: u64,
    failing: HashSet<Operation>,
    delays: HashMap<Operation, Duration>,
    calls: Vec<Call>,
}

/// Thread-safe in-memory task store with fault injection.
#[derive(Debug)]
pub struct InMemoryStore {
    inner: Mutex<Inner>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    /// Creates an empty store. The first created task gets id 1.
    #[must_use]
    pub fn new() -> Self {
        Self::with_tasks(Vec::new())
    }

    /// Creates a store pre-populated with `tasks`.
    ///
    /// New ids continue after the highest seeded id.
    #[must_use]
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let next_id = tasks.iter().map(|t| t.id.get()).max().unwrap_or(0) + 1;
        Self {
            inner: Mutex::new(Inner {
                tasks,
                next_id,
                ..Inner::default()
            }),
        }
    }

    /// Makes every subsequent call of `op` fail with [`StoreError::Unavailable`].
    pub fn fail(&self, op: Operation) {
        self.inner.lock().failing.insert(op);
    }

    /// Undoes [`fail`](Self::fail) for `op`.
    pub fn heal(&self, op: Operation) {
        self.inner.lock().failing.remove(&op);
    }

    /// Delays every subsequent call of `op` by `delay` before it resolves.
    pub fn delay(&self, op: Operation, delay: Duration) {
        self.inner.lock().delays.insert(op, delay);
    }

    /// Returns every call observed so far.
    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().calls.clone()
    }

    /// Counts the calls observed for `op`.
    #[must_use]
    pub fn call_count(&self, op: Operation) -> usize {
        self.inner
            .lock()
            .calls
            .iter()
            .filter(|c| c.operation() == op)
            .count()
    }

    /// Returns the stored tasks in insertion order.
    #[must_use]
    pub fn tasks(&self) -> Vec<Task> {
        self.inner.lock().tasks.clone()
    }

    /// Records the call and returns its configured delay and failure flag.
    fn begin(&self, call: Call) -> (Duration, bool) {
        let mut inner = self.inner.lock();
        let op = call.operation();
        inner.calls.push(call);
        let delay = inner.delays.get(&op).copied().unwrap_or_default();
        let failing = inner.failing.contains(&op);
        drop(inner);
        (delay, failing)
    }

    async fn settle(delay: Duration, failing: bool, op: Operation) -> Result<(), StoreError> {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if failing {
            return Err(StoreError::Unavailable(op));
        }
        Ok(())
    }

    fn modify(&self, id: TaskId, edit: impl FnOnce(&mut Task)) -> Result<Task, StoreError> {
        let mut inner = self.inner.lock();
        let task = inner
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(StoreError::NotFound(id))?;
        edit(task);
        Ok(task.clone())
    }
}

impl RemoteStore for InMemoryStore {
    async fn fetch_all(&self, owner: OwnerId) -> Result<Vec<Task>, StoreError> {
        let (delay, failing) = self.begin(Call::FetchAll(owner));
        Self::settle(delay, failing, Operation::FetchAll).await?;
        Ok(self
            .inner
            .lock()
            .tasks
            .iter()
            .filter(|t| t.user_id == owner)
            .cloned()
            .collect())
    }

    async fn create(&self, owner: OwnerId, title: &str) -> Result<Task, StoreError> {
        let (delay, failing) = self.begin(Call::Create {
            owner,
            title: title.to_string(),
        });
        Self::settle(delay, failing, Operation::Create).await?;
        let mut inner = self.inner.lock();
        let task = Task {
            id: TaskId::new(inner.next_id),
            user_id: owner,
            title: title.to_string(),
            completed: false,
        };
        inner.next_id += 1;
        inner.tasks.push(task.clone());
        drop(inner);
        Ok(task)
    }

    async fn update_title(&self, id: TaskId, title: &str) -> Result<Task, StoreError> {
        let (delay, failing) = self.begin(Call::UpdateTitle {
            id,
            title: title.to_string(),
        });
        Self::settle(delay, failing, Operation::UpdateTitle).await?;
        self.modify(id, |t| t.title = title.to_string())
    }

    async fn update_status(&self, id: TaskId, completed: bool) -> Result<Task, StoreError> {
        let (delay, failing) = self.begin(Call::UpdateStatus { id, completed });
        Self::settle(delay, failing, Operation::UpdateStatus).await?;
        self.modify(id, |t| t.completed = completed)
    }

    async fn delete(&self, id: TaskId) -> Result<(), StoreError> {
        let (delay, failing) = self.begin(Call::Delete(id));
        Self::settle(delay, failing, Operation::Delete).await?;
        let mut inner = self.inner.lock();
        let before = inner.tasks.len();
        inner.tasks.retain(|t| t.id != id);
        let removed = inner.tasks.len() != before;
        drop(inner);
        if removed {
            Ok(())
        } else {
            Err(StoreError::NotFound(id))
        }
    }
}
