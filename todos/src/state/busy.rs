//! Per-row loading markers.

use std::collections::HashMap;

use todos_proto::task::TaskId;

/// How markers are dropped when an operation resolves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BusyRelease {
    /// Any completion clears every marker.
    ///
    /// Two rows in flight at once un-busy each other when the first one
    /// resolves. Kept as the default to match the established behaviour.
    #[default]
    All,
    /// A completion removes only its own marker. Markers are counted, so a
    /// row with two overlapping requests stays busy until both resolve.
    PerId,
}

/// Set of task ids with an outstanding request.
#[derive(Debug, Clone, Default)]
pub struct BusySet {
    marks: HashMap<TaskId, usize>,
    release: BusyRelease,
}

impl BusySet {
    /// Creates an empty set with the given release policy.
    #[must_use]
    pub fn new(release: BusyRelease) -> Self {
        Self {
            marks: HashMap::new(),
            release,
        }
    }

    /// Marks `id` as busy.
    pub fn mark(&mut self, id: TaskId) {
        *self.marks.entry(id).or_insert(0) += 1;
    }

    /// Called when a request for `id` resolves, successfully or not.
    pub fn release(&mut self, id: TaskId) {
        match self.release {
            BusyRelease::All => self.clear_all(),
            BusyRelease::PerId => {
                if let Some(count) = self.marks.get_mut(&id) {
                    *count -= 1;
                    if *count == 0 {
                        self.marks.remove(&id);
                    }
                }
            }
        }
    }

    /// Called when an edit session is cancelled.
    ///
    /// Under [`BusyRelease::All`] this clears every marker; under
    /// [`BusyRelease::PerId`] markers of in-flight requests are kept.
    pub fn release_on_cancel(&mut self) {
        if self.release == BusyRelease::All {
            self.clear_all();
        }
    }

    /// Removes every marker.
    pub fn clear_all(&mut self) {
        self.marks.clear();
    }

    /// Returns `true` if `id` has an outstanding request.
    #[must_use]
    pub fn contains(&self, id: TaskId) -> bool {
        self.marks.contains_key(&id)
    }

    /// Returns `true` if no id is busy.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    /// Number of distinct busy ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.marks.len()
    }
}
