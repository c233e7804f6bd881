//! trellolite chat command implementations.

use serde::Serialize;

use crate::assistant::{AssistantBridge, TurnOutcome};
use crate::chat::ChatLog;
use crate::cli::{GlobalOptions, Session};
use crate::error::{Error, Result};
use crate::integrations::CommandAssistant;
use crate::model::{ChatRole, Task};
use crate::output::{emit_success, HumanOutput};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChatTurnReport<'a> {
    reply: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    created_task: Option<&'a Task>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct ChatLogReport<'a> {
    messages: &'a ChatLog,
}

pub fn run_send(global: &GlobalOptions, message: String) -> Result<()> {
    if message.trim().is_empty() {
        return Err(Error::InvalidArgument("message cannot be empty".to_string()));
    }

    let mut session = Session::open(global)?;
    let assistant = CommandAssistant::new(session.config.assistant.command.clone());
    let configured = assistant.is_configured();
    let bridge = AssistantBridge::from_config(assistant, &session.config.assistant)?;

    let runtime = tokio::runtime::Runtime::new()?;
    let outcome = runtime.block_on(bridge.send(&mut session.store, &message));

    let reply = outcome.reply().unwrap_or_default();
    let mut human = HumanOutput::new(format!("assistant: {reply}"));
    let (created_task, error) = match &outcome {
        TurnOutcome::TaskCreated { task, .. } => {
            human.push_summary("task", format!("{} ({})", task.title, task.id));
            (Some(task), None)
        }
        TurnOutcome::Failed { error, .. } => {
            human.push_warning(error.to_string());
            if !configured {
                human.push_next_step("set [assistant].command in trellolite.toml");
            }
            (None, Some(error.to_string()))
        }
        TurnOutcome::Ignored | TurnOutcome::Replied(_) => (None, None),
    };

    emit_success(
        global.output,
        "chat send",
        &ChatTurnReport {
            reply: outcome.reply(),
            created_task,
            error,
        },
        Some(&human),
    )
}

pub fn run_log(global: &GlobalOptions) -> Result<()> {
    let session = Session::open(global)?;
    let history = &session.store.state().chat_history;

    let mut human = HumanOutput::new(format!("trellolite chat ({} messages)", history.len()));
    for message in history.iter() {
        let speaker = match message.role {
            ChatRole::User => "you",
            ChatRole::Model => "assistant",
        };
        human.push_detail(format!("{speaker}: {}", message.content));
    }

    emit_success(
        global.output,
        "chat log",
        &ChatLogReport { messages: history },
        Some(&human),
    )
}

pub fn run_clear(global: &GlobalOptions) -> Result<()> {
    let mut session = Session::open(global)?;
    session.store.clear_chat();

    let human = HumanOutput::new("trellolite chat cleared");
    emit_success(
        global.output,
        "chat clear",
        &ChatLogReport {
            messages: &session.store.state().chat_history,
        },
        Some(&human),
    )
}
