//! Property-based tests for task identity in the client list.
//!
//! Uses proptest to verify that after any sequence of creates, deletes,
//! and toggles (some of them failing), ids in the list stay pairwise
//! distinct, no pending placeholder lingers, and no row stays busy.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::collections::HashSet;
use std::sync::Arc;

use proptest::prelude::*;
use todos::controller::{Controller, ControllerConfig, Intent};
use todos::store::Operation;
use todos::store::memory::InMemoryStore;
use todos_proto::task::{OwnerId, TaskId};

#[derive(Debug, Clone)]
enum Step {
    Create(String),
    Delete(usize),
    Toggle(usize),
    BreakCreates(bool),
    BreakDeletes(bool),
}

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        4 => "[a-z]{1,12}".prop_map(Step::Create),
        3 => any::<usize>().prop_map(Step::Delete),
        2 => any::<usize>().prop_map(Step::Toggle),
        1 => any::<bool>().prop_map(Step::BreakCreates),
        1 => any::<bool>().prop_map(Step::BreakDeletes),
    ]
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to build runtime")
}

fn pick(ctrl: &Controller<InMemoryStore>, index: usize) -> Option<TaskId> {
    let tasks = ctrl.tasks().tasks();
    if tasks.is_empty() {
        None
    } else {
        Some(tasks[index % tasks.len()].id)
    }
}

fn toggle(store: &InMemoryStore, op: Operation, broken: bool) {
    if broken {
        store.fail(op);
    } else {
        store.heal(op);
    }
}

proptest! {
    #[test]
    fn ids_stay_unique(steps in prop::collection::vec(arb_step(), 1..40)) {
        runtime().block_on(async {
            let store = Arc::new(InMemoryStore::new());
            let mut ctrl =
                Controller::new(Arc::clone(&store), ControllerConfig::new(OwnerId::new(1)));
            ctrl.start();
            ctrl.settle().await;

            for step in steps {
                match step {
                    Step::Create(title) => {
                        ctrl.handle(Intent::SetNewTitle(title));
                        ctrl.handle(Intent::SubmitNew);
                    }
                    Step::Delete(i) => {
                        if let Some(id) = pick(&ctrl, i) {
                            ctrl.handle(Intent::Delete(id));
                        }
                    }
                    Step::Toggle(i) => {
                        if let Some(id) = pick(&ctrl, i) {
                            ctrl.handle(Intent::ToggleStatus(id));
                        }
                    }
                    Step::BreakCreates(broken) => toggle(&store, Operation::Create, broken),
                    Step::BreakDeletes(broken) => toggle(&store, Operation::Delete, broken),
                }
                ctrl.settle().await;

                let ids: Vec<TaskId> = ctrl.tasks().tasks().iter().map(|t| t.id).collect();
                let distinct: HashSet<TaskId> = ids.iter().copied().collect();
                assert_eq!(ids.len(), distinct.len(), "duplicate ids in {ids:?}");
                assert!(ids.iter().all(|id| !id.is_pending()));
                assert!(ctrl.tasks().pending().is_none());
                assert!(ctrl.busy().is_empty());
            }
        });
    }
}
