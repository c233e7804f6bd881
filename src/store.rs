//! The state store: sole owner of [`AppState`] and its mutation protocol.
//!
//! Every mutation builds the next snapshot from the current one, swaps it in,
//! and writes the whole state through the backend. Persist failures are
//! logged and swallowed; the in-memory state is authoritative. Operations on
//! unknown ids are no-ops and neither replace the snapshot nor persist.

use std::collections::HashSet;

use chrono::Utc;
use tracing::{debug, warn};

use crate::chat::ChatLog;
use crate::error::{Error, Result};
use crate::model::{
    new_id, AppState, Board, BoardUpdate, ChatMessage, List, Task, TaskUpdate, View,
};
use crate::ordering::{self, Placement};
use crate::seed::seed_state;
use crate::storage::StateBackend;

/// Lists every new board starts with, in position order
pub const DEFAULT_LIST_TITLES: [&str; 3] = ["To Do", "In Progress", "Done"];

pub struct Store {
    state: AppState,
    backend: Box<dyn StateBackend>,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").field("state", &self.state).finish()
    }
}

impl Store {
    /// Hydrate from `backend`, falling back to the seed dataset when nothing
    /// is stored or the stored document cannot be decoded.
    pub fn open(backend: impl StateBackend + 'static) -> Self {
        let state = match backend.load() {
            Ok(Some(state)) => state,
            Ok(None) => {
                debug!("no persisted state; starting from seed data");
                seed_state()
            }
            Err(err) => {
                warn!(error = %err, "persisted state unreadable; starting from seed data");
                seed_state()
            }
        };
        Self {
            state,
            backend: Box::new(backend),
        }
    }

    /// Start from an explicit state without reading the backend
    pub fn with_state(backend: impl StateBackend + 'static, state: AppState) -> Self {
        Self {
            state,
            backend: Box::new(backend),
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn snapshot(&self) -> AppState {
        self.state.clone()
    }

    pub fn board(&self, id: &str) -> Option<&Board> {
        self.state.board(id)
    }

    pub fn list(&self, id: &str) -> Option<&List> {
        self.state.list(id)
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.state.task(id)
    }

    pub fn active_board(&self) -> Option<&Board> {
        self.state.active_board()
    }

    /// Lists of a board in display order
    pub fn lists_for_board(&self, board_id: &str) -> Vec<&List> {
        ordering::sorted_children(&self.state.lists, board_id)
    }

    /// Tasks of a list in display order
    pub fn tasks_for_list(&self, list_id: &str) -> Vec<&Task> {
        ordering::sorted_children(&self.state.tasks, list_id)
    }

    /// The `limit` most recently inserted tasks
    pub fn recent_tasks(&self, limit: usize) -> &[Task] {
        let tasks = &self.state.tasks;
        &tasks[tasks.len().saturating_sub(limit)..]
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Replace the whole state (e.g. from an exported snapshot)
    pub fn restore(&mut self, state: AppState) {
        self.commit(state);
    }

    pub fn set_view(&mut self, view: View, board_id: Option<String>) {
        let mut next = self.state.clone();
        next.view = view;
        next.active_board_id = board_id;
        self.commit(next);
    }

    /// Create a board with its three default lists; returns the board id
    pub fn add_board(&mut self, title: &str, description: &str) -> String {
        let board = Board {
            id: new_id(),
            title: title.to_string(),
            description: description.to_string(),
            created_at: Utc::now(),
        };
        let board_id = board.id.clone();

        let mut next = self.state.clone();
        next.boards.insert(0, board);
        for (position, title) in DEFAULT_LIST_TITLES.iter().enumerate() {
            next.lists.push(List {
                id: new_id(),
                board_id: board_id.clone(),
                title: (*title).to_string(),
                position: position as u32,
            });
        }
        debug!(board_id = %board_id, "board added");
        self.commit(next);
        board_id
    }

    pub fn update_board(&mut self, id: &str, update: &BoardUpdate) -> bool {
        let mut next = self.state.clone();
        let Some(board) = next.boards.iter_mut().find(|board| board.id == id) else {
            return false;
        };
        update.apply(board);
        self.commit(next);
        true
    }

    /// Remove a board, its lists, and every task in those lists
    pub fn delete_board(&mut self, id: &str) -> bool {
        if self.state.board(id).is_none() {
            return false;
        }

        let doomed_lists: HashSet<&str> = self
            .state
            .lists
            .iter()
            .filter(|list| list.board_id == id)
            .map(|list| list.id.as_str())
            .collect();

        let mut next = self.state.clone();
        next.boards.retain(|board| board.id != id);
        next.lists.retain(|list| list.board_id != id);
        next.tasks
            .retain(|task| !doomed_lists.contains(task.list_id.as_str()));
        if next.active_board_id.as_deref() == Some(id) {
            next.active_board_id = None;
            next.view = View::Boards;
        }
        debug!(
            board_id = id,
            lists = doomed_lists.len(),
            tasks = self.state.tasks.len() - next.tasks.len(),
            "board deleted"
        );
        self.commit(next);
        true
    }

    /// Append a list to a board
    pub fn add_list(&mut self, board_id: &str, title: &str) -> Result<List> {
        if self.state.board(board_id).is_none() {
            return Err(Error::UnknownParent {
                kind: "board",
                id: board_id.to_string(),
            });
        }

        let list = List {
            id: new_id(),
            board_id: board_id.to_string(),
            title: title.to_string(),
            position: ordering::next_position(&self.state.lists, board_id),
        };
        let mut next = self.state.clone();
        next.lists.push(list.clone());
        debug!(list_id = %list.id, board_id, position = list.position, "list added");
        self.commit(next);
        Ok(list)
    }

    /// Remove a list and its tasks
    pub fn delete_list(&mut self, id: &str) -> bool {
        if self.state.list(id).is_none() {
            return false;
        }
        let mut next = self.state.clone();
        next.lists.retain(|list| list.id != id);
        next.tasks.retain(|task| task.list_id != id);
        debug!(list_id = id, "list deleted");
        self.commit(next);
        true
    }

    /// Append a task to a list
    pub fn add_task(&mut self, list_id: &str, title: &str, description: &str) -> Result<Task> {
        if self.state.list(list_id).is_none() {
            return Err(Error::UnknownParent {
                kind: "list",
                id: list_id.to_string(),
            });
        }

        let task = Task {
            id: new_id(),
            list_id: list_id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            position: ordering::next_position(&self.state.tasks, list_id),
            created_at: Utc::now(),
        };
        let mut next = self.state.clone();
        next.tasks.push(task.clone());
        debug!(task_id = %task.id, list_id, position = task.position, "task added");
        self.commit(next);
        Ok(task)
    }

    pub fn update_task(&mut self, id: &str, update: &TaskUpdate) -> bool {
        let mut next = self.state.clone();
        let Some(task) = next.tasks.iter_mut().find(|task| task.id == id) else {
            return false;
        };
        update.apply(task);
        self.commit(next);
        true
    }

    pub fn delete_task(&mut self, id: &str) -> bool {
        if self.state.task(id).is_none() {
            return false;
        }
        let mut next = self.state.clone();
        next.tasks.retain(|task| task.id != id);
        self.commit(next);
        true
    }

    /// Move a task to another list, keeping its current position value.
    ///
    /// Returns `Ok(false)` when the task does not exist.
    pub fn move_task(&mut self, task_id: &str, target_list_id: &str) -> Result<bool> {
        self.relocate_task(task_id, target_list_id, Placement::KeepPosition)
    }

    /// Move a task to another list at an explicit position. Siblings keep
    /// their positions, so the value may tie with an existing task.
    pub fn move_task_to(
        &mut self,
        task_id: &str,
        target_list_id: &str,
        position: u32,
    ) -> Result<bool> {
        self.relocate_task(task_id, target_list_id, Placement::At(position))
    }

    fn relocate_task(
        &mut self,
        task_id: &str,
        target_list_id: &str,
        placement: Placement,
    ) -> Result<bool> {
        if self.state.task(task_id).is_none() {
            return Ok(false);
        }
        if self.state.list(target_list_id).is_none() {
            return Err(Error::UnknownParent {
                kind: "list",
                id: target_list_id.to_string(),
            });
        }

        let mut next = self.state.clone();
        if let Some(task) = next.tasks.iter_mut().find(|task| task.id == task_id) {
            ordering::relocate(task, target_list_id, placement);
        }
        debug!(task_id, target_list_id, ?placement, "task moved");
        self.commit(next);
        Ok(true)
    }

    pub fn add_chat_message(&mut self, message: ChatMessage) {
        let mut next = self.state.clone();
        next.chat_history.push(message);
        self.commit(next);
    }

    /// Reset the transcript to the greeting
    pub fn clear_chat(&mut self) {
        let mut next = self.state.clone();
        next.chat_history = ChatLog::greeting();
        self.commit(next);
    }

    fn commit(&mut self, next: AppState) {
        self.state = next;
        if let Err(err) = self.backend.save(&self.state) {
            warn!(error = %err, "failed to persist state");
        }
    }
}
