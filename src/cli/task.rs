//! trellolite task command implementations.

use serde::Serialize;

use crate::cli::{GlobalOptions, Session};
use crate::error::{Error, Result};
use crate::model::TaskUpdate;
use crate::output::{emit_success, HumanOutput};

pub struct NewOptions {
    pub list: String,
    pub title: String,
    pub description: String,
}

pub struct EditOptions {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
}

pub struct MoveOptions {
    pub id: String,
    pub list: String,
    pub position: Option<u32>,
}

#[derive(Serialize)]
struct TaskDeletedReport<'a> {
    id: &'a str,
    deleted: bool,
}

pub fn run_new(global: &GlobalOptions, options: NewOptions) -> Result<()> {
    let title = options.title.trim();
    if title.is_empty() {
        return Err(Error::InvalidArgument("task title cannot be empty".to_string()));
    }

    let mut session = Session::open(global)?;
    let task = session
        .store
        .add_task(&options.list, title, options.description.trim())?;

    let mut human = HumanOutput::new(format!("trellolite task new: {}", task.title));
    human.push_summary("id", task.id.clone());
    human.push_summary("list", task.list_id.clone());
    human.push_summary("position", task.position.to_string());

    emit_success(global.output, "task new", &task, Some(&human))
}

pub fn run_edit(global: &GlobalOptions, options: EditOptions) -> Result<()> {
    let update = TaskUpdate {
        title: options.title,
        description: options.description,
    };
    if update.is_empty() {
        return Err(Error::InvalidArgument(
            "nothing to change; pass --title or --description".to_string(),
        ));
    }

    let mut session = Session::open(global)?;
    if !session.store.update_task(&options.id, &update) {
        return Err(not_found(&options.id));
    }
    let task = session
        .store
        .task(&options.id)
        .ok_or_else(|| not_found(&options.id))?;

    let mut human = HumanOutput::new(format!("trellolite task edit: {}", task.title));
    human.push_summary("id", task.id.clone());
    emit_success(global.output, "task edit", task, Some(&human))
}

pub fn run_mv(global: &GlobalOptions, options: MoveOptions) -> Result<()> {
    let mut session = Session::open(global)?;
    let moved = match options.position {
        Some(position) => session
            .store
            .move_task_to(&options.id, &options.list, position)?,
        None => session.store.move_task(&options.id, &options.list)?,
    };
    if !moved {
        return Err(not_found(&options.id));
    }

    let store = &session.store;
    let task = store.task(&options.id).ok_or_else(|| not_found(&options.id))?;
    let list_title = store
        .list(&task.list_id)
        .map(|list| list.title.as_str())
        .unwrap_or_default();

    let mut human = HumanOutput::new(format!("trellolite task mv: {} -> {list_title}", task.title));
    human.push_summary("list", task.list_id.clone());
    human.push_summary("position", task.position.to_string());
    emit_success(global.output, "task mv", task, Some(&human))
}

pub fn run_rm(global: &GlobalOptions, id: String) -> Result<()> {
    let mut session = Session::open(global)?;
    if !session.store.delete_task(&id) {
        return Err(not_found(&id));
    }

    let human = HumanOutput::new(format!("trellolite task rm: {id}"));
    emit_success(
        global.output,
        "task rm",
        &TaskDeletedReport {
            id: &id,
            deleted: true,
        },
        Some(&human),
    )
}

fn not_found(id: &str) -> Error {
    Error::NotFound {
        kind: "task",
        id: id.to_string(),
    }
}
