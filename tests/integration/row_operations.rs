//! Integration tests for row operations, busy markers, and the error banner.
//!
//! Exercises the controller against an in-memory store with injected
//! failures and latency. The dismiss-timer tests run on a paused clock.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use todos::controller::{Controller, ControllerConfig, Intent};
use todos::state::{BusyRelease, DISMISS_AFTER};
use todos::store::Operation;
use todos::store::memory::{Call, InMemoryStore};
use todos_proto::filter::Filter;
use todos_proto::task::{OwnerId, Task, TaskId};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn task(id: u64, title: &str, completed: bool) -> Task {
    Task {
        id: TaskId::new(id),
        user_id: OwnerId::new(1),
        title: title.to_string(),
        completed,
    }
}

fn config() -> ControllerConfig {
    ControllerConfig::new(OwnerId::new(1))
}

async fn loaded_with(
    tasks: Vec<Task>,
    config: ControllerConfig,
) -> (Controller<InMemoryStore>, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::with_tasks(tasks));
    let mut ctrl = Controller::new(Arc::clone(&store), config);
    ctrl.start();
    ctrl.settle().await;
    (ctrl, store)
}

async fn loaded(tasks: Vec<Task>) -> (Controller<InMemoryStore>, Arc<InMemoryStore>) {
    loaded_with(tasks, config()).await
}

/// Lets spawned tasks run without moving the paused clock.
async fn yield_many() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

// ---------------------------------------------------------------------------
// Status toggle and delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn toggle_completes_task_and_clears_busy() {
    let (mut ctrl, store) = loaded(vec![task(1, "Buy milk", false)]).await;
    ctrl.handle(Intent::ToggleStatus(TaskId::new(1)));
    ctrl.settle().await;

    assert_eq!(ctrl.tasks().tasks(), &[task(1, "Buy milk", true)]);
    assert!(ctrl.busy().is_empty());
    assert!(store.calls().contains(&Call::UpdateStatus {
        id: TaskId::new(1),
        completed: true
    }));
}

#[tokio::test]
async fn failed_toggle_leaves_flag_and_reports() {
    let (mut ctrl, store) = loaded(vec![task(1, "a", false)]).await;
    store.fail(Operation::UpdateStatus);
    ctrl.handle(Intent::ToggleStatus(TaskId::new(1)));
    ctrl.settle().await;

    assert!(!ctrl.tasks().get(TaskId::new(1)).unwrap().completed);
    assert_eq!(ctrl.error(), Some("Unable to update a todo"));
    assert!(ctrl.busy().is_empty());
}

#[tokio::test]
async fn delete_removes_row_and_failure_keeps_it() {
    let (mut ctrl, store) = loaded(vec![task(1, "a", false), task(2, "b", false)]).await;
    ctrl.handle(Intent::Delete(TaskId::new(1)));
    ctrl.settle().await;
    assert!(ctrl.tasks().get(TaskId::new(1)).is_none());

    store.fail(Operation::Delete);
    ctrl.handle(Intent::Delete(TaskId::new(2)));
    ctrl.settle().await;
    assert!(ctrl.tasks().get(TaskId::new(2)).is_some());
    assert_eq!(ctrl.error(), Some("Unable to delete a todo"));
    assert!(ctrl.busy().is_empty());
}

#[tokio::test]
async fn completions_apply_in_arrival_order() {
    let (mut ctrl, store) = loaded(vec![task(1, "a", false), task(2, "b", false)]).await;
    store.delay(Operation::Delete, Duration::from_millis(40));

    ctrl.handle(Intent::Delete(TaskId::new(1)));
    ctrl.handle(Intent::ToggleStatus(TaskId::new(2)));

    // The undelayed toggle lands first.
    ctrl.step().await;
    assert!(ctrl.tasks().get(TaskId::new(2)).unwrap().completed);
    assert!(ctrl.tasks().get(TaskId::new(1)).is_some());

    ctrl.settle().await;
    assert!(ctrl.tasks().get(TaskId::new(1)).is_none());
}

// ---------------------------------------------------------------------------
// Busy markers
// ---------------------------------------------------------------------------

#[tokio::test]
async fn wholesale_release_clears_other_rows_early() {
    let (mut ctrl, store) = loaded(vec![task(1, "a", false), task(2, "b", false)]).await;
    store.delay(Operation::Delete, Duration::from_millis(40));

    ctrl.handle(Intent::Delete(TaskId::new(1)));
    ctrl.handle(Intent::ToggleStatus(TaskId::new(2)));
    assert_eq!(ctrl.busy().len(), 2);

    ctrl.step().await;
    assert!(ctrl.busy().is_empty());
    ctrl.settle().await;
}

#[tokio::test]
async fn per_id_release_keeps_other_rows_busy() {
    let mut cfg = config();
    cfg.busy_release = BusyRelease::PerId;
    let (mut ctrl, store) = loaded_with(vec![task(1, "a", false), task(2, "b", false)], cfg).await;
    store.delay(Operation::Delete, Duration::from_millis(40));

    ctrl.handle(Intent::Delete(TaskId::new(1)));
    ctrl.handle(Intent::ToggleStatus(TaskId::new(2)));

    ctrl.step().await;
    assert!(ctrl.busy().contains(TaskId::new(1)));
    assert!(!ctrl.busy().contains(TaskId::new(2)));

    ctrl.settle().await;
    assert!(ctrl.busy().is_empty());
}

#[tokio::test]
async fn busy_is_empty_after_every_resolution() {
    let (mut ctrl, store) = loaded(vec![
        task(1, "a", false),
        task(2, "b", true),
        task(3, "c", false),
    ])
    .await;
    store.fail(Operation::Delete);

    ctrl.handle(Intent::ToggleStatus(TaskId::new(1)));
    ctrl.handle(Intent::Delete(TaskId::new(2)));
    ctrl.handle(Intent::StartEdit(TaskId::new(3)));
    ctrl.handle(Intent::EditDraft("c2".to_string()));
    ctrl.handle(Intent::CommitEdit);

    while ctrl.in_flight() > 0 {
        ctrl.step().await;
        if ctrl.in_flight() == 0 {
            assert!(ctrl.busy().is_empty());
        }
    }
}

// ---------------------------------------------------------------------------
// Create, toggle all, clear completed
// ---------------------------------------------------------------------------

#[tokio::test]
async fn created_task_appended_after_existing() {
    let (mut ctrl, store) = loaded(vec![task(5, "a", false)]).await;
    ctrl.handle(Intent::SetNewTitle("b".to_string()));
    ctrl.handle(Intent::SubmitNew);
    ctrl.settle().await;

    let ids: Vec<u64> = ctrl.tasks().tasks().iter().map(|t| t.id.get()).collect();
    assert_eq!(ids, vec![5, 6]);
    assert_eq!(store.tasks().len(), 2);
}

#[tokio::test]
async fn clear_completed_failure_reports_once_per_row() {
    let (mut ctrl, store) = loaded(vec![task(1, "a", true), task(2, "b", true)]).await;
    store.fail(Operation::Delete);
    ctrl.handle(Intent::ClearCompleted);
    ctrl.settle().await;

    assert_eq!(ctrl.tasks().len(), 2);
    assert_eq!(ctrl.error(), Some("Unable to delete a todo"));
    assert_eq!(store.call_count(Operation::Delete), 2);
}

#[tokio::test]
async fn toggle_all_on_empty_list_does_nothing() {
    let (mut ctrl, store) = loaded(vec![]).await;
    ctrl.handle(Intent::ToggleAll);
    assert_eq!(ctrl.in_flight(), 0);
    assert_eq!(store.call_count(Operation::UpdateStatus), 0);
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

#[tokio::test]
async fn active_filter_shows_only_active_tasks() {
    let (mut ctrl, _store) = loaded(vec![task(1, "a", false), task(2, "b", true)]).await;
    ctrl.handle(Intent::SetFilter(Filter::Active));
    assert_eq!(ctrl.visible(), vec![task(1, "a", false)]);

    let view = ctrl.view();
    assert_eq!(view.rows.len(), 1);
    assert_eq!(view.active_count, 1);
    assert_eq!(view.completed_count, 1);
}

#[tokio::test]
async fn initial_filter_comes_from_config() {
    let mut cfg = config();
    cfg.initial_filter = Filter::Completed;
    let (mut ctrl, _store) = loaded_with(vec![task(1, "a", false), task(2, "b", true)], cfg).await;
    assert_eq!(ctrl.filter(), Filter::Completed);
    assert_eq!(ctrl.visible(), vec![task(2, "b", true)]);
}

#[tokio::test]
async fn visible_list_follows_toggle() {
    let (mut ctrl, _store) = loaded(vec![task(1, "a", false)]).await;
    ctrl.handle(Intent::SetFilter(Filter::Completed));
    assert!(ctrl.visible().is_empty());
    ctrl.handle(Intent::ToggleStatus(TaskId::new(1)));
    ctrl.settle().await;
    assert_eq!(ctrl.visible().len(), 1);
}

// ---------------------------------------------------------------------------
// Error banner timing (paused clock)
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn load_failure_shows_banner_for_three_seconds() {
    let store = Arc::new(InMemoryStore::new());
    store.fail(Operation::FetchAll);
    let mut ctrl = Controller::new(store, config());
    ctrl.start();
    ctrl.settle().await;

    let raised_at = tokio::time::Instant::now();
    assert!(ctrl.tasks().is_empty());
    assert_eq!(ctrl.error(), Some("Unable to load todos"));

    tokio::time::advance(DISMISS_AFTER - Duration::from_millis(1)).await;
    yield_many().await;
    ctrl.drain();
    assert_eq!(ctrl.error(), Some("Unable to load todos"));

    tokio::time::advance(Duration::from_millis(1)).await;
    ctrl.step().await;
    assert_eq!(ctrl.error(), None);
    assert!(raised_at.elapsed() >= DISMISS_AFTER);
}

#[tokio::test(start_paused = true)]
async fn newer_error_restarts_the_timer() {
    let (mut ctrl, store) = loaded(vec![task(1, "a", false)]).await;
    store.fail(Operation::UpdateStatus);
    store.fail(Operation::Delete);

    ctrl.handle(Intent::ToggleStatus(TaskId::new(1)));
    ctrl.settle().await;
    assert_eq!(ctrl.error(), Some("Unable to update a todo"));

    tokio::time::advance(Duration::from_millis(2000)).await;
    ctrl.handle(Intent::Delete(TaskId::new(1)));
    ctrl.settle().await;
    assert_eq!(ctrl.error(), Some("Unable to delete a todo"));

    // The first timer would have fired here.
    tokio::time::advance(Duration::from_millis(1500)).await;
    yield_many().await;
    ctrl.drain();
    assert_eq!(ctrl.error(), Some("Unable to delete a todo"));

    tokio::time::advance(Duration::from_millis(1500)).await;
    ctrl.step().await;
    assert_eq!(ctrl.error(), None);
}

#[tokio::test(start_paused = true)]
async fn dismissed_error_stays_dismissed() {
    let store = Arc::new(InMemoryStore::new());
    store.fail(Operation::FetchAll);
    let mut ctrl = Controller::new(store, config());
    ctrl.start();
    ctrl.settle().await;

    ctrl.handle(Intent::DismissError);
    assert_eq!(ctrl.error(), None);

    tokio::time::advance(DISMISS_AFTER * 2).await;
    yield_many().await;
    assert_eq!(ctrl.drain(), 0);
    assert_eq!(ctrl.error(), None);
}
