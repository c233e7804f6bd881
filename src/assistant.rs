//! Assistant bridge: turns store state into a request for an external
//! text-generation service and its reply back into store mutations.
//!
//! The service itself is behind the [`Assistant`] trait. Each turn appends
//! the user's message, makes one request (bounded by a timeout), performs at
//! most one `add_task`, and appends exactly one model message. Failures of
//! any kind become a chat message; they never reach the caller as errors.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::AssistantConfig;
use crate::error::{Error, Result};
use crate::model::{ChatMessage, Task};
use crate::store::Store;

pub const CREATE_TASK: &str = "create_task";

pub const SYSTEM_INSTRUCTION: &str = "You are TrelloLite Assistant, a highly efficient project \
manager. Help users organize tasks, suggest workflows, and summarize project progress. You can \
create tasks using the tools provided if the user requests it. If they ask to create a task but \
no board/list is active, ask them which one to use. Keep responses concise and professional.";

pub const FAILURE_REPLY: &str =
    "I'm sorry, I encountered an error. Please check your API key or try again later.";

pub const EMPTY_REPLY: &str = "I don't have anything to add to that.";

/// One callable action offered to the service
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDeclaration {
    pub name: String,
    pub description: String,
    /// JSON-schema object describing the arguments
    pub parameters: serde_json::Value,
}

impl ToolDeclaration {
    pub fn create_task() -> Self {
        Self {
            name: CREATE_TASK.to_string(),
            description: "Create a new task in a specific list on the current board.".to_string(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "listId": { "type": "string", "description": "The ID of the list to add the task to." },
                    "title": { "type": "string", "description": "The title of the task." },
                    "description": { "type": "string", "description": "Detailed description of the task." }
                },
                "required": ["listId", "title"]
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantRequest {
    pub system_instruction: String,
    pub context: String,
    pub user_message: String,
    pub tools: Vec<ToolDeclaration>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    #[serde(default)]
    pub args: serde_json::Value,
}

/// What the service answered: free text or one action invocation.
///
/// Serialized as `{"text": "..."}` or `{"functionCall": {"name", "args"}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AssistantReply {
    Text(String),
    FunctionCall(FunctionCall),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateTaskArgs {
    list_id: String,
    title: String,
    #[serde(default)]
    description: Option<String>,
}

/// The external text-generation service.
#[allow(async_fn_in_trait)]
pub trait Assistant {
    async fn complete(&self, request: &AssistantRequest) -> Result<AssistantReply>;
}

/// Result of one chat turn
#[derive(Debug)]
pub enum TurnOutcome {
    /// Blank input; nothing was sent or recorded
    Ignored,
    /// The service answered with text (or declined an action)
    Replied(String),
    /// A task was created from the service's action call
    TaskCreated { task: Task, reply: String },
    /// The call failed; the apology was recorded
    Failed { error: Error, reply: String },
}

impl TurnOutcome {
    /// The model message appended for this turn, if any
    pub fn reply(&self) -> Option<&str> {
        match self {
            TurnOutcome::Ignored => None,
            TurnOutcome::Replied(reply)
            | TurnOutcome::TaskCreated { reply, .. }
            | TurnOutcome::Failed { reply, .. } => Some(reply),
        }
    }
}

pub struct AssistantBridge<A> {
    assistant: A,
    timeout: Duration,
    recent_tasks: usize,
}

impl<A: Assistant> AssistantBridge<A> {
    pub fn new(assistant: A, timeout: Duration, recent_tasks: usize) -> Self {
        Self {
            assistant,
            timeout,
            recent_tasks,
        }
    }

    pub fn from_config(assistant: A, config: &AssistantConfig) -> Result<Self> {
        Ok(Self::new(assistant, config.timeout()?, config.recent_tasks))
    }

    pub fn assistant(&self) -> &A {
        &self.assistant
    }

    /// Run one user turn against `store`.
    ///
    /// The exclusive borrow of the store for the whole turn is what keeps a
    /// second request from being issued while one is pending.
    pub async fn send(&self, store: &mut Store, message: &str) -> TurnOutcome {
        let message = message.trim();
        if message.is_empty() {
            return TurnOutcome::Ignored;
        }

        store.add_chat_message(ChatMessage::user(message));
        let request = build_request(store, message, self.recent_tasks);

        let reply = match tokio::time::timeout(self.timeout, self.assistant.complete(&request))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(Error::AssistantTimeout(self.timeout)),
        };

        let outcome = match reply {
            Ok(reply) => apply_reply(store, reply),
            Err(err) => Err(err),
        };

        match outcome {
            Ok(outcome) => outcome,
            Err(error) => {
                warn!(error = %error, "assistant turn failed");
                store.add_chat_message(ChatMessage::model(FAILURE_REPLY));
                TurnOutcome::Failed {
                    error,
                    reply: FAILURE_REPLY.to_string(),
                }
            }
        }
    }
}

/// Everything sent to the service for one turn
pub fn build_request(store: &Store, message: &str, recent_tasks: usize) -> AssistantRequest {
    AssistantRequest {
        system_instruction: SYSTEM_INSTRUCTION.to_string(),
        context: build_context(store, recent_tasks),
        user_message: message.to_string(),
        tools: vec![ToolDeclaration::create_task()],
    }
}

/// Plain-text summary of the board state the service can act on
pub fn build_context(store: &Store, recent_tasks: usize) -> String {
    let state = store.state();
    let mut lines = Vec::new();

    lines.push(format!("Current View: {}", state.view.as_str()));
    let active = store.active_board();
    lines.push(format!(
        "Active Board: {}",
        active.map(|board| board.title.as_str()).unwrap_or("None selected")
    ));
    lines.push(format!(
        "Available Boards: {}",
        state
            .boards
            .iter()
            .map(|board| format!("{} (ID: {})", board.title, board.id))
            .collect::<Vec<_>>()
            .join(", ")
    ));
    if let Some(board) = active {
        lines.push(format!(
            "Active Lists on this board: {}",
            store
                .lists_for_board(&board.id)
                .iter()
                .map(|list| format!("{} (ID: {})", list.title, list.id))
                .collect::<Vec<_>>()
                .join(", ")
        ));
    }
    lines.push(format!("Total Tasks Count: {}", state.tasks.len()));
    lines.push(format!(
        "Recent Tasks: {}",
        store
            .recent_tasks(recent_tasks)
            .iter()
            .map(|task| task.title.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    ));

    lines.join("\n")
}

fn apply_reply(store: &mut Store, reply: AssistantReply) -> Result<TurnOutcome> {
    match reply {
        AssistantReply::Text(text) => {
            let text = if text.trim().is_empty() {
                EMPTY_REPLY.to_string()
            } else {
                text
            };
            store.add_chat_message(ChatMessage::model(text.clone()));
            Ok(TurnOutcome::Replied(text))
        }
        AssistantReply::FunctionCall(call) if call.name == CREATE_TASK => {
            let args: CreateTaskArgs = serde_json::from_value(call.args)?;
            let description = args.description.unwrap_or_default();
            match store.add_task(&args.list_id, &args.title, &description) {
                Ok(task) => {
                    debug!(task_id = %task.id, list_id = %task.list_id, "assistant created task");
                    let reply = format!("✅ I've created the task \"{}\" for you!", task.title);
                    store.add_chat_message(ChatMessage::model(reply.clone()));
                    Ok(TurnOutcome::TaskCreated { task, reply })
                }
                Err(Error::UnknownParent { id, .. }) => {
                    let reply = format!(
                        "I couldn't find a list with ID \"{id}\", so no task was created. \
                         Which list should I use?"
                    );
                    store.add_chat_message(ChatMessage::model(reply.clone()));
                    Ok(TurnOutcome::Replied(reply))
                }
                Err(err) => Err(err),
            }
        }
        AssistantReply::FunctionCall(call) => Err(Error::Assistant(format!(
            "unsupported action '{}'",
            call.name
        ))),
    }
}
