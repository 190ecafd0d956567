//! Property-based tests for task filtering.
//!
//! Uses proptest to verify:
//! 1. Applying a filter twice equals applying it once.
//! 2. Active and Completed partition the list without reordering.
//! 3. Filtering never invents or duplicates tasks.

use proptest::prelude::*;
use todos_proto::filter::Filter;
use todos_proto::task::{OwnerId, Task, TaskId};

/// Strategy for generating arbitrary `Filter` values.
fn arb_filter() -> impl Strategy<Value = Filter> {
    prop_oneof![Just(Filter::All), Just(Filter::Active), Just(Filter::Completed)]
}

/// Strategy for generating a task list with distinct ids.
fn arb_tasks() -> impl Strategy<Value = Vec<Task>> {
    prop::collection::vec(("[a-z ]{1,24}", any::<bool>()), 0..32).prop_map(|rows| {
        (1_u64..)
            .zip(rows)
            .map(|(id, (title, completed))| Task {
                id: TaskId::new(id),
                user_id: OwnerId::new(1),
                title,
                completed,
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn filter_is_idempotent(filter in arb_filter(), tasks in arb_tasks()) {
        let once = filter.apply(&tasks);
        let twice = filter.apply(&once);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn active_and_completed_partition_the_list(tasks in arb_tasks()) {
        let active = Filter::Active.apply(&tasks);
        let completed = Filter::Completed.apply(&tasks);
        prop_assert_eq!(active.len() + completed.len(), tasks.len());
        prop_assert!(active.iter().all(|t| !t.completed));
        prop_assert!(completed.iter().all(|t| t.completed));

        let mut merged: Vec<&Task> = active.iter().chain(completed.iter()).collect();
        merged.sort_by_key(|t| t.id);
        let original: Vec<&Task> = tasks.iter().collect();
        prop_assert_eq!(merged, original);
    }

    #[test]
    fn filter_preserves_relative_order(filter in arb_filter(), tasks in arb_tasks()) {
        let visible = filter.apply(&tasks);
        let ids: Vec<TaskId> = visible.iter().map(|t| t.id).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        prop_assert_eq!(ids, sorted);
    }
}
