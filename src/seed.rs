//! Fixed starter dataset used when no usable state is persisted.

use chrono::Utc;

use crate::chat::ChatLog;
use crate::model::{AppState, Board, List, Task, View};

pub const SEED_BOARD_ID: &str = "board-1";
pub const SEED_TODO_LIST_ID: &str = "list-todo";
pub const SEED_DOING_LIST_ID: &str = "list-doing";
pub const SEED_DONE_LIST_ID: &str = "list-done";

/// One sample board with three lists, two tasks in "To Do", and the greeting.
pub fn seed_state() -> AppState {
    let now = Utc::now();
    let list = |id: &str, title: &str, position: u32| List {
        id: id.to_string(),
        board_id: SEED_BOARD_ID.to_string(),
        title: title.to_string(),
        position,
    };
    let task = |id: &str, title: &str, description: &str, position: u32| Task {
        id: id.to_string(),
        list_id: SEED_TODO_LIST_ID.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        position,
        created_at: now,
    };

    AppState {
        boards: vec![Board {
            id: SEED_BOARD_ID.to_string(),
            title: "Get Started".to_string(),
            description: "Start managing your tasks here!".to_string(),
            created_at: now,
        }],
        lists: vec![
            list(SEED_TODO_LIST_ID, "To Do", 0),
            list(SEED_DOING_LIST_ID, "Doing", 1),
            list(SEED_DONE_LIST_ID, "Done", 2),
        ],
        tasks: vec![
            task("task-1", "Explore the board", "Open a board to see its lists.", 0),
            task("task-2", "Move a task", "Move me to another list when you're done.", 1),
        ],
        active_board_id: None,
        view: View::Boards,
        chat_history: ChatLog::greeting(),
    }
}
