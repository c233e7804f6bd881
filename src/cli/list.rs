//! trellolite list command implementations.

use serde::Serialize;

use crate::cli::{GlobalOptions, Session};
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput};

pub struct NewOptions {
    pub board: String,
    pub title: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ListRemovedReport<'a> {
    id: &'a str,
    tasks_removed: usize,
}

pub fn run_new(global: &GlobalOptions, options: NewOptions) -> Result<()> {
    let title = options.title.trim();
    if title.is_empty() {
        return Err(Error::InvalidArgument("list title cannot be empty".to_string()));
    }

    let mut session = Session::open(global)?;
    let list = session.store.add_list(&options.board, title)?;

    let mut human = HumanOutput::new(format!("trellolite list new: {}", list.title));
    human.push_summary("id", list.id.clone());
    human.push_summary("board", list.board_id.clone());
    human.push_summary("position", list.position.to_string());
    human.push_next_step(format!("trellolite task new {} <title>", list.id));

    emit_success(global.output, "list new", &list, Some(&human))
}

pub fn run_rm(global: &GlobalOptions, id: String) -> Result<()> {
    let mut session = Session::open(global)?;
    let title = session
        .store
        .list(&id)
        .map(|list| list.title.clone())
        .ok_or_else(|| Error::NotFound {
            kind: "list",
            id: id.clone(),
        })?;
    let tasks_removed = session.store.tasks_for_list(&id).len();
    session.store.delete_list(&id);

    let mut human = HumanOutput::new(format!("trellolite list rm: {title}"));
    human.push_summary("tasks removed", tasks_removed.to_string());
    emit_success(
        global.output,
        "list rm",
        &ListRemovedReport {
            id: &id,
            tasks_removed,
        },
        Some(&human),
    )
}
