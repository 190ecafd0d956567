//! Integration tests for inline title editing.
//!
//! Covers the edit session lifecycle end to end through the controller:
//! optimistic rename without rollback, blank drafts turning into deletes,
//! no-op commits, and completions that arrive after the session moved on.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use todos::controller::{Controller, ControllerConfig, Intent};
use todos::state::{EditState, SessionPolicy};
use todos::store::Operation;
use todos::store::memory::{Call, InMemoryStore};
use todos_proto::task::{OwnerId, Task, TaskId};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn task(id: u64, title: &str) -> Task {
    Task {
        id: TaskId::new(id),
        user_id: OwnerId::new(1),
        title: title.to_string(),
        completed: false,
    }
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
    loaded_with(tasks, ControllerConfig::new(OwnerId::new(1))).await
}

fn edit(ctrl: &mut Controller<InMemoryStore>, id: u64, draft: &str) {
    ctrl.handle(Intent::StartEdit(TaskId::new(id)));
    ctrl.handle(Intent::EditDraft(draft.to_string()));
    ctrl.handle(Intent::CommitEdit);
}

fn title_of(ctrl: &Controller<InMemoryStore>, id: u64) -> String {
    ctrl.tasks().get(TaskId::new(id)).unwrap().title.clone()
}

// ---------------------------------------------------------------------------
// Rename
// ---------------------------------------------------------------------------

#[tokio::test]
async fn failed_rename_keeps_optimistic_title() {
    let (mut ctrl, store) = loaded(vec![task(2, "Old")]).await;
    store.fail(Operation::UpdateTitle);

    edit(&mut ctrl, 2, "New");
    assert_eq!(title_of(&ctrl, 2), "New");
    assert!(ctrl.busy().contains(TaskId::new(2)));

    ctrl.settle().await;
    assert_eq!(ctrl.error(), Some("Unable to update a todo"));
    assert_eq!(title_of(&ctrl, 2), "New");
    assert_eq!(*ctrl.edit().state(), EditState::Idle);
    assert!(ctrl.busy().is_empty());
}

#[tokio::test]
async fn rename_sends_trimmed_title() {
    let (mut ctrl, store) = loaded(vec![task(2, "Old")]).await;
    edit(&mut ctrl, 2, "  Fresh  ");
    ctrl.settle().await;

    assert_eq!(title_of(&ctrl, 2), "Fresh");
    assert_eq!(store.tasks()[0].title, "Fresh");
    assert!(store.calls().contains(&Call::UpdateTitle {
        id: TaskId::new(2),
        title: "Fresh".to_string()
    }));
    assert_eq!(ctrl.error(), None);
}

#[tokio::test]
async fn unchanged_draft_issues_no_call() {
    let (mut ctrl, store) = loaded(vec![task(1, "Same")]).await;
    edit(&mut ctrl, 1, "  Same ");

    assert_eq!(*ctrl.edit().state(), EditState::Idle);
    assert_eq!(ctrl.in_flight(), 0);
    assert_eq!(store.call_count(Operation::UpdateTitle), 0);
    assert_eq!(store.call_count(Operation::Delete), 0);
}

#[tokio::test]
async fn enter_then_blur_submits_once() {
    let (mut ctrl, store) = loaded(vec![task(1, "a")]).await;
    edit(&mut ctrl, 1, "b");
    ctrl.handle(Intent::CommitEdit);
    ctrl.settle().await;
    assert_eq!(store.call_count(Operation::UpdateTitle), 1);
}

// ---------------------------------------------------------------------------
// Blank drafts
// ---------------------------------------------------------------------------

#[tokio::test]
async fn blank_draft_deletes_task() {
    let (mut ctrl, store) = loaded(vec![task(3, "X"), task(4, "Y")]).await;
    edit(&mut ctrl, 3, "   ");
    assert!(matches!(ctrl.edit().state(), EditState::Saving(_)));

    ctrl.settle().await;
    assert!(ctrl.tasks().get(TaskId::new(3)).is_none());
    assert_eq!(ctrl.tasks().len(), 1);
    assert_eq!(
        store
            .calls()
            .iter()
            .filter(|c| **c == Call::Delete(TaskId::new(3)))
            .count(),
        1
    );
    assert!(!ctrl.edit().is_active());
}

#[tokio::test]
async fn failed_blank_draft_delete_closes_session() {
    let (mut ctrl, store) = loaded(vec![task(3, "X")]).await;
    store.fail(Operation::Delete);
    edit(&mut ctrl, 3, "");
    ctrl.settle().await;

    assert_eq!(ctrl.error(), Some("Unable to delete a todo"));
    assert_eq!(title_of(&ctrl, 3), "X");
    assert_eq!(*ctrl.edit().state(), EditState::Idle);
    assert!(ctrl.busy().is_empty());
}

// ---------------------------------------------------------------------------
// Session lifecycle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn cancel_discards_draft() {
    let (mut ctrl, store) = loaded(vec![task(1, "Keep")]).await;
    ctrl.handle(Intent::StartEdit(TaskId::new(1)));
    ctrl.handle(Intent::EditDraft("Changed".to_string()));
    ctrl.handle(Intent::CancelEdit);

    assert!(!ctrl.edit().is_active());
    assert_eq!(title_of(&ctrl, 1), "Keep");
    assert_eq!(store.calls().len(), 1);
}

#[tokio::test]
async fn stale_completion_does_not_close_newer_session() {
    let (mut ctrl, store) = loaded(vec![task(1, "a"), task(2, "b")]).await;
    store.delay(Operation::UpdateTitle, Duration::from_millis(50));

    edit(&mut ctrl, 1, "a2");
    ctrl.handle(Intent::StartEdit(TaskId::new(2)));
    assert_eq!(ctrl.edit().editing_id(), Some(TaskId::new(2)));

    ctrl.settle().await;
    assert!(ctrl.edit().is_editing());
    assert_eq!(ctrl.edit().editing_id(), Some(TaskId::new(2)));
    assert_eq!(title_of(&ctrl, 1), "a2");
}

#[tokio::test]
async fn reject_policy_keeps_first_session() {
    let mut config = ControllerConfig::new(OwnerId::new(1));
    config.session_policy = SessionPolicy::Reject;
    let (mut ctrl, _store) = loaded_with(vec![task(1, "a"), task(2, "b")], config).await;

    ctrl.handle(Intent::StartEdit(TaskId::new(1)));
    ctrl.handle(Intent::StartEdit(TaskId::new(2)));
    assert_eq!(ctrl.edit().editing_id(), Some(TaskId::new(1)));
}

#[tokio::test]
async fn cancel_while_saving_then_completion_is_harmless() {
    let (mut ctrl, store) = loaded(vec![task(1, "a")]).await;
    store.delay(Operation::UpdateTitle, Duration::from_millis(20));

    edit(&mut ctrl, 1, "b");
    ctrl.handle(Intent::CancelEdit);
    assert!(!ctrl.edit().is_active());

    ctrl.settle().await;
    assert!(!ctrl.edit().is_active());
    assert_eq!(title_of(&ctrl, 1), "b");
    assert!(ctrl.busy().is_empty());
}

#[tokio::test]
async fn draft_is_ignored_while_saving() {
    let (mut ctrl, store) = loaded(vec![task(1, "a")]).await;
    store.delay(Operation::UpdateTitle, Duration::from_millis(20));

    edit(&mut ctrl, 1, "b");
    ctrl.handle(Intent::EditDraft("c".to_string()));
    assert_eq!(ctrl.edit().session().unwrap().draft(), "b");
    ctrl.settle().await;
}
