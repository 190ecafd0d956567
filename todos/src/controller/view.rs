//! Render-ready snapshot of the controller state.

use todos_proto::filter::Filter;
use todos_proto::task::{Task, TaskId};

use crate::state::TaskList;

/// One displayed row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    /// The task as currently known (placeholder id for the pending row).
    pub task: Task,
    /// Request outstanding: show the loading marker and ignore input.
    pub busy: bool,
    /// Inline editor text when this row is being edited.
    pub draft: Option<String>,
}

impl RowView {
    /// Returns `true` for the not-yet-confirmed create placeholder.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.task.id.is_pending()
    }
}

/// Everything the UI needs for one frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoView {
    /// Visible rows; the pending row, if any, is last.
    pub rows: Vec<RowView>,
    /// Active filter.
    pub filter: Filter,
    /// Number of tasks not completed.
    pub active_count: usize,
    /// Number of completed tasks.
    pub completed_count: usize,
    /// Whether every task is completed (drives the toggle-all marker).
    pub all_completed: bool,
    /// New-task input text.
    pub new_title: String,
    /// New-task input is locked while a create is outbound.
    pub input_locked: bool,
    /// Id of the row under edit, if any.
    pub editing: Option<TaskId>,
    /// Error banner text.
    pub error: Option<String>,
}

impl TodoView {
    /// Returns `true` if there are no confirmed tasks at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.active_count == 0 && self.completed_count == 0
    }
}

/// Memoised filter projection keyed by list revision and filter.
#[derive(Debug, Default)]
pub struct FilterCache {
    key: Option<(u64, Filter)>,
    visible: Vec<Task>,
}

impl FilterCache {
    /// Returns the visible tasks, recomputing only when the list or filter changed.
    pub fn visible(&mut self, list: &TaskList, filter: Filter) -> &[Task] {
        let key = (list.revision(), filter);
        if self.key != Some(key) {
            self.visible = filter.apply(list.tasks());
            self.key = Some(key);
        }
        &self.visible
    }
}
