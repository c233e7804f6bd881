//! Position assignment and sibling ordering for lists and tasks.
//!
//! Positions grow by appending: a new sibling gets the current sibling count.
//! Deletes never renumber, so positions can have gaps and the only observable
//! contract is a stable ascending sort on `position`, ties kept in array order.

use crate::model::{List, Task};

/// Anything ranked among siblings sharing a parent key.
pub trait Positioned {
    fn parent_id(&self) -> &str;
    fn position(&self) -> u32;
}

impl Positioned for List {
    fn parent_id(&self) -> &str {
        &self.board_id
    }

    fn position(&self) -> u32 {
        self.position
    }
}

impl Positioned for Task {
    fn parent_id(&self) -> &str {
        &self.list_id
    }

    fn position(&self) -> u32 {
        self.position
    }
}

/// Position for a new entity appended under `parent_id`.
pub fn next_position<T: Positioned>(items: &[T], parent_id: &str) -> u32 {
    let count = items
        .iter()
        .filter(|item| item.parent_id() == parent_id)
        .count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// Children of `parent_id` in display order.
pub fn sorted_children<'a, T: Positioned>(items: &'a [T], parent_id: &str) -> Vec<&'a T> {
    let mut children: Vec<&T> = items
        .iter()
        .filter(|item| item.parent_id() == parent_id)
        .collect();
    // sort_by_key is stable
    children.sort_by_key(|item| item.position());
    children
}

/// Where a moved task lands in its target list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Keep the task's current numeric position and let it sort among the
    /// target list's tasks by that value.
    KeepPosition,
    /// Take this exact position; siblings are not renumbered.
    At(u32),
}

/// Reassign `task` to `target_list_id`; only `list_id` (and `position` for
/// [`Placement::At`]) change.
pub fn relocate(task: &mut Task, target_list_id: &str, placement: Placement) {
    task.list_id = target_list_id.to_string();
    if let Placement::At(position) = placement {
        task.position = position;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn task(id: &str, list_id: &str, position: u32) -> Task {
        Task {
            id: id.to_string(),
            list_id: list_id.to_string(),
            title: id.to_string(),
            description: String::new(),
            position,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn next_position_counts_only_siblings() {
        let tasks = vec![task("a", "l1", 0), task("b", "l1", 1), task("c", "l2", 0)];
        assert_eq!(next_position(&tasks, "l1"), 2);
        assert_eq!(next_position(&tasks, "l2"), 1);
        assert_eq!(next_position(&tasks, "l3"), 0);
    }

    #[test]
    fn next_position_ignores_gaps() {
        let tasks = vec![task("a", "l1", 0), task("c", "l1", 2)];
        // count-based, so it can collide with an existing stale position
        assert_eq!(next_position(&tasks, "l1"), 2);
    }

    #[test]
    fn sorted_children_is_stable_on_ties() {
        let tasks = vec![
            task("late", "l1", 1),
            task("first-tie", "l1", 0),
            task("other", "l2", 0),
            task("second-tie", "l1", 0),
        ];
        let ids: Vec<&str> = sorted_children(&tasks, "l1")
            .into_iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, vec!["first-tie", "second-tie", "late"]);
    }

    #[test]
    fn relocate_keeps_stale_position() {
        let mut moved = task("a", "l1", 4);
        relocate(&mut moved, "l2", Placement::KeepPosition);
        assert_eq!(moved.list_id, "l2");
        assert_eq!(moved.position, 4);
    }

    #[test]
    fn relocate_at_sets_position() {
        let mut moved = task("a", "l1", 4);
        relocate(&mut moved, "l2", Placement::At(0));
        assert_eq!(moved.list_id, "l2");
        assert_eq!(moved.position, 0);
    }
}
