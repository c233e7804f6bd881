//! trellolite board command implementations.

use serde::Serialize;

use crate::cli::{GlobalOptions, Session};
use crate::error::{Error, Result};
use crate::model::{Board, BoardUpdate, List, Task, View};
use crate::output::{emit_success, HumanOutput};

pub struct NewOptions {
    pub title: String,
    pub description: String,
}

pub struct EditOptions {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Serialize)]
struct BoardCreatedReport<'a> {
    board: &'a Board,
    lists: Vec<&'a List>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BoardListReport<'a> {
    active_board_id: Option<&'a str>,
    boards: &'a [Board],
}

#[derive(Serialize)]
struct ColumnReport<'a> {
    #[serde(flatten)]
    list: &'a List,
    tasks: Vec<&'a Task>,
}

#[derive(Serialize)]
struct BoardDetailReport<'a> {
    board: &'a Board,
    lists: Vec<ColumnReport<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ViewReport<'a> {
    view: View,
    active_board_id: Option<&'a str>,
}

#[derive(Serialize)]
struct DeletedReport<'a> {
    id: &'a str,
    deleted: bool,
}

pub fn run_new(global: &GlobalOptions, options: NewOptions) -> Result<()> {
    let title = options.title.trim();
    if title.is_empty() {
        return Err(Error::InvalidArgument("board title cannot be empty".to_string()));
    }

    let mut session = Session::open(global)?;
    let board_id = session.store.add_board(title, options.description.trim());

    let store = &session.store;
    let board = store.board(&board_id).ok_or_else(|| not_found(&board_id))?;
    let lists = store.lists_for_board(&board_id);

    let mut human = HumanOutput::new(format!("trellolite board new: {}", board.title));
    human.push_summary("id", board.id.clone());
    for list in &lists {
        human.push_detail(format!("{} ({})", list.title, list.id));
    }
    human.push_next_step(format!("trellolite board open {}", board.id));

    emit_success(
        global.output,
        "board new",
        &BoardCreatedReport { board, lists },
        Some(&human),
    )
}

pub fn run_ls(global: &GlobalOptions) -> Result<()> {
    let session = Session::open(global)?;
    let state = session.store.state();

    let mut human = HumanOutput::new(format!("trellolite boards ({})", state.boards.len()));
    for board in &state.boards {
        let marker = if state.active_board_id.as_deref() == Some(board.id.as_str()) {
            "* "
        } else {
            ""
        };
        let lists = session.store.lists_for_board(&board.id).len();
        human.push_detail(format!("{marker}{} ({}) - {lists} lists", board.title, board.id));
    }
    if state.boards.is_empty() {
        human.push_next_step("trellolite board new <title>");
    }

    emit_success(
        global.output,
        "board ls",
        &BoardListReport {
            active_board_id: state.active_board_id.as_deref(),
            boards: &state.boards,
        },
        Some(&human),
    )
}

pub fn run_show(global: &GlobalOptions, id: Option<String>) -> Result<()> {
    let session = Session::open(global)?;
    let store = &session.store;

    let board = match id.as_deref() {
        Some(id) => store.board(id).ok_or_else(|| not_found(id))?,
        None => store.active_board().ok_or_else(|| {
            Error::InvalidArgument("no active board; pass a board id".to_string())
        })?,
    };

    let lists: Vec<ColumnReport> = store
        .lists_for_board(&board.id)
        .into_iter()
        .map(|list| ColumnReport {
            list,
            tasks: store.tasks_for_list(&list.id),
        })
        .collect();

    let mut human = HumanOutput::new(format!("trellolite board: {}", board.title));
    if !board.description.is_empty() {
        human.push_summary("description", board.description.clone());
    }
    human.push_summary("id", board.id.clone());
    for column in &lists {
        human.push_detail(format!(
            "{} ({}) - {} tasks",
            column.list.title,
            column.list.id,
            column.tasks.len()
        ));
        for task in &column.tasks {
            human.push_detail(format!("  {} ({})", task.title, task.id));
        }
    }

    emit_success(
        global.output,
        "board show",
        &BoardDetailReport { board, lists },
        Some(&human),
    )
}

pub fn run_open(global: &GlobalOptions, id: String) -> Result<()> {
    let mut session = Session::open(global)?;
    let title = session
        .store
        .board(&id)
        .map(|board| board.title.clone())
        .ok_or_else(|| not_found(&id))?;

    session.store.set_view(View::BoardDetail, Some(id.clone()));

    let mut human = HumanOutput::new(format!("trellolite board open: {title}"));
    human.push_next_step("trellolite board show");
    emit_success(
        global.output,
        "board open",
        &ViewReport {
            view: View::BoardDetail,
            active_board_id: Some(&id),
        },
        Some(&human),
    )
}

pub fn run_home(global: &GlobalOptions) -> Result<()> {
    let mut session = Session::open(global)?;
    session.store.set_view(View::Boards, None);

    let human = HumanOutput::new("trellolite: back to boards");
    emit_success(
        global.output,
        "home",
        &ViewReport {
            view: View::Boards,
            active_board_id: None,
        },
        Some(&human),
    )
}

pub fn run_edit(global: &GlobalOptions, options: EditOptions) -> Result<()> {
    let update = BoardUpdate {
        title: options.title,
        description: options.description,
    };
    if update.is_empty() {
        return Err(Error::InvalidArgument(
            "nothing to change; pass --title or --description".to_string(),
        ));
    }

    let mut session = Session::open(global)?;
    if !session.store.update_board(&options.id, &update) {
        return Err(not_found(&options.id));
    }
    let board = session
        .store
        .board(&options.id)
        .ok_or_else(|| not_found(&options.id))?;

    let mut human = HumanOutput::new(format!("trellolite board edit: {}", board.title));
    human.push_summary("id", board.id.clone());
    emit_success(global.output, "board edit", board, Some(&human))
}

pub fn run_rm(global: &GlobalOptions, id: String) -> Result<()> {
    let mut session = Session::open(global)?;
    let title = session
        .store
        .board(&id)
        .map(|board| board.title.clone())
        .ok_or_else(|| not_found(&id))?;
    let deleted = session.store.delete_board(&id);

    let human = HumanOutput::new(format!("trellolite board rm: {title}"));
    emit_success(
        global.output,
        "board rm",
        &DeletedReport { id: &id, deleted },
        Some(&human),
    )
}

fn not_found(id: &str) -> Error {
    Error::NotFound {
        kind: "board",
        id: id.to_string(),
    }
}
