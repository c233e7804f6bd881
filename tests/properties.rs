//! Property-based tests for store invariants.
//!
//! Random operation sequences are replayed against a seeded store to check:
//! 1. No list or task ever outlives its parent.
//! 2. Sibling display order is always ascending by position.
//! 3. The chat history never exceeds its bound.

mod support;

use std::collections::HashSet;

use proptest::prelude::*;
use trellolite::chat::CHAT_HISTORY_LIMIT;
use trellolite::model::ChatMessage;
use trellolite::Store;

use support::seeded_store;

#[derive(Debug, Clone)]
enum Op {
    AddBoard,
    AddList(usize),
    AddTask(usize),
    DeleteBoard(usize),
    DeleteList(usize),
    DeleteTask(usize),
    MoveTask(usize, usize),
    MoveTaskTo(usize, usize, u32),
    Chat(usize),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::AddBoard),
        any::<usize>().prop_map(Op::AddList),
        any::<usize>().prop_map(Op::AddTask),
        any::<usize>().prop_map(Op::DeleteBoard),
        any::<usize>().prop_map(Op::DeleteList),
        any::<usize>().prop_map(Op::DeleteTask),
        (any::<usize>(), any::<usize>()).prop_map(|(t, l)| Op::MoveTask(t, l)),
        (any::<usize>(), any::<usize>(), 0u32..8).prop_map(|(t, l, p)| Op::MoveTaskTo(t, l, p)),
        (1usize..30).prop_map(Op::Chat),
    ]
}

/// Pick the id at `index` (modulo length), if the collection is non-empty.
fn pick<'a>(ids: impl Iterator<Item = &'a str>, index: usize) -> Option<String> {
    let ids: Vec<&str> = ids.collect();
    if ids.is_empty() {
        None
    } else {
        Some(ids[index % ids.len()].to_string())
    }
}

fn apply(store: &mut Store, op: &Op) {
    let state = store.snapshot();
    let board = |i| pick(state.boards.iter().map(|b| b.id.as_str()), i);
    let list = |i| pick(state.lists.iter().map(|l| l.id.as_str()), i);
    let task = |i| pick(state.tasks.iter().map(|t| t.id.as_str()), i);

    match *op {
        Op::AddBoard => {
            store.add_board("Generated", "");
        }
        Op::AddList(i) => {
            if let Some(id) = board(i) {
                store.add_list(&id, "Generated").expect("existing board");
            }
        }
        Op::AddTask(i) => {
            if let Some(id) = list(i) {
                store.add_task(&id, "Generated", "").expect("existing list");
            }
        }
        Op::DeleteBoard(i) => {
            if let Some(id) = board(i) {
                assert!(store.delete_board(&id));
            }
        }
        Op::DeleteList(i) => {
            if let Some(id) = list(i) {
                assert!(store.delete_list(&id));
            }
        }
        Op::DeleteTask(i) => {
            if let Some(id) = task(i) {
                assert!(store.delete_task(&id));
            }
        }
        Op::MoveTask(t, l) => {
            if let (Some(task_id), Some(list_id)) = (task(t), list(l)) {
                assert!(store.move_task(&task_id, &list_id).expect("existing list"));
            }
        }
        Op::MoveTaskTo(t, l, position) => {
            if let (Some(task_id), Some(list_id)) = (task(t), list(l)) {
                assert!(store
                    .move_task_to(&task_id, &list_id, position)
                    .expect("existing list"));
            }
        }
        Op::Chat(count) => {
            for n in 0..count {
                store.add_chat_message(ChatMessage::user(format!("message {n}")));
            }
        }
    }
}

proptest! {
    #[test]
    fn no_orphans_after_any_sequence(ops in prop::collection::vec(arb_op(), 0..40)) {
        let (mut store, _) = seeded_store();
        for op in &ops {
            apply(&mut store, op);
        }

        let state = store.state();
        let boards: HashSet<&str> = state.boards.iter().map(|b| b.id.as_str()).collect();
        let lists: HashSet<&str> = state.lists.iter().map(|l| l.id.as_str()).collect();
        for list in &state.lists {
            prop_assert!(boards.contains(list.board_id.as_str()), "orphan list {}", list.id);
        }
        for task in &state.tasks {
            prop_assert!(lists.contains(task.list_id.as_str()), "orphan task {}", task.id);
        }
    }

    #[test]
    fn display_order_is_ascending(ops in prop::collection::vec(arb_op(), 0..40)) {
        let (mut store, _) = seeded_store();
        for op in &ops {
            apply(&mut store, op);
        }

        let state = store.snapshot();
        for board in &state.boards {
            let positions: Vec<u32> =
                store.lists_for_board(&board.id).iter().map(|l| l.position).collect();
            prop_assert!(positions.windows(2).all(|w| w[0] <= w[1]));
        }
        for list in &state.lists {
            let positions: Vec<u32> =
                store.tasks_for_list(&list.id).iter().map(|t| t.position).collect();
            prop_assert!(positions.windows(2).all(|w| w[0] <= w[1]));
        }
    }

    #[test]
    fn chat_history_stays_bounded(ops in prop::collection::vec(arb_op(), 0..40)) {
        let (mut store, _) = seeded_store();
        for op in &ops {
            apply(&mut store, op);
            prop_assert!(store.state().chat_history.len() <= CHAT_HISTORY_LIMIT);
        }
    }

    #[test]
    fn delete_board_removes_every_descendant(extra_lists in 0usize..5, tasks_per_list in 0usize..5) {
        let (mut store, _) = seeded_store();
        let board_id = store.add_board("Doomed", "");
        for _ in 0..extra_lists {
            store.add_list(&board_id, "Extra").expect("board exists");
        }
        let list_ids: Vec<String> =
            store.lists_for_board(&board_id).iter().map(|l| l.id.clone()).collect();
        for list_id in &list_ids {
            for _ in 0..tasks_per_list {
                store.add_task(list_id, "Doomed task", "").expect("list exists");
            }
        }

        prop_assert!(store.delete_board(&board_id));

        let state = store.state();
        prop_assert!(state.lists.iter().all(|l| l.board_id != board_id));
        prop_assert!(state.tasks.iter().all(|t| !list_ids.contains(&t.list_id)));
        // The seed board is untouched.
        prop_assert_eq!(state.lists.len(), 3);
        prop_assert_eq!(state.tasks.len(), 2);
    }
}
