mod support;

use std::time::Duration;

use serde_json::json;
use trellolite::assistant::{
    AssistantBridge, TurnOutcome, CREATE_TASK, EMPTY_REPLY, FAILURE_REPLY, SYSTEM_INSTRUCTION,
};
use trellolite::error::Error;
use trellolite::model::{ChatRole, View};

use support::{seeded_store, Script, ScriptedAssistant};

fn bridge(scripts: impl IntoIterator<Item = Script>) -> AssistantBridge<ScriptedAssistant> {
    AssistantBridge::new(ScriptedAssistant::new(scripts), Duration::from_secs(5), 20)
}

fn transcript(store: &trellolite::Store) -> Vec<(ChatRole, String)> {
    store
        .state()
        .chat_history
        .iter()
        .map(|m| (m.role, m.content.clone()))
        .collect()
}

#[tokio::test]
async fn text_reply_appends_user_and_model_messages() {
    let (mut store, _) = seeded_store();
    let bridge = bridge([Script::text("Try splitting the work into smaller tasks.")]);

    let outcome = bridge.send(&mut store, "  any tips?  ").await;

    assert!(matches!(outcome, TurnOutcome::Replied(_)));
    let messages = transcript(&store);
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[1], (ChatRole::User, "any tips?".to_string()));
    assert_eq!(
        messages[2],
        (
            ChatRole::Model,
            "Try splitting the work into smaller tasks.".to_string()
        )
    );
}

#[tokio::test]
async fn create_task_call_adds_task_and_confirms() {
    let (mut store, _) = seeded_store();
    store.set_view(View::BoardDetail, Some("board-1".to_string()));
    let bridge = bridge([Script::call(
        CREATE_TASK,
        json!({ "listId": "list-doing", "title": "Write docs", "description": "README first" }),
    )]);

    let outcome = bridge.send(&mut store, "add a docs task to Doing").await;

    let TurnOutcome::TaskCreated { task, reply } = outcome else {
        panic!("expected a created task");
    };
    assert_eq!(task.list_id, "list-doing");
    assert_eq!(task.title, "Write docs");
    assert_eq!(task.description, "README first");
    assert_eq!(task.position, 0);
    assert_eq!(reply, "✅ I've created the task \"Write docs\" for you!");

    let stored = store.task(&task.id).expect("task stored");
    assert_eq!(stored.title, "Write docs");
    assert_eq!(
        store.state().chat_history.last().map(|m| m.content.as_str()),
        Some(reply.as_str())
    );
}

#[tokio::test]
async fn create_task_without_description_defaults_to_empty() {
    let (mut store, _) = seeded_store();
    let bridge = bridge([Script::call(
        CREATE_TASK,
        json!({ "listId": "list-todo", "title": "Plan sprint" }),
    )]);

    let outcome = bridge.send(&mut store, "plan the sprint").await;

    let TurnOutcome::TaskCreated { task, .. } = outcome else {
        panic!("expected a created task");
    };
    assert_eq!(task.description, "");
    assert_eq!(task.position, 2);
}

#[tokio::test]
async fn create_task_with_unknown_list_asks_back() {
    let (mut store, _) = seeded_store();
    let bridge = bridge([Script::call(
        CREATE_TASK,
        json!({ "listId": "list-ghost", "title": "Lost" }),
    )]);

    let outcome = bridge.send(&mut store, "add a task").await;

    let TurnOutcome::Replied(reply) = outcome else {
        panic!("expected a reply");
    };
    assert!(reply.contains("list-ghost"));
    assert_eq!(store.state().tasks.len(), 2);
    assert_eq!(transcript(&store).len(), 3);
}

#[tokio::test]
async fn service_failure_records_apology() {
    let (mut store, _) = seeded_store();
    let bridge = bridge([Script::Fail("quota exceeded".to_string())]);

    let outcome = bridge.send(&mut store, "hello").await;

    let TurnOutcome::Failed { error, reply } = outcome else {
        panic!("expected a failure");
    };
    assert!(matches!(error, Error::Assistant(ref msg) if msg == "quota exceeded"));
    assert_eq!(reply, FAILURE_REPLY);
    let messages = transcript(&store);
    assert_eq!(messages[1], (ChatRole::User, "hello".to_string()));
    assert_eq!(messages[2], (ChatRole::Model, FAILURE_REPLY.to_string()));
}

#[tokio::test]
async fn slow_service_times_out() {
    let (mut store, _) = seeded_store();
    let bridge = AssistantBridge::new(
        ScriptedAssistant::new([Script::Stall(Duration::from_secs(30))]),
        Duration::from_millis(20),
        20,
    );

    let outcome = bridge.send(&mut store, "are you there?").await;

    let TurnOutcome::Failed { error, .. } = outcome else {
        panic!("expected a timeout");
    };
    assert!(matches!(error, Error::AssistantTimeout(_)));
    assert_eq!(
        store.state().chat_history.last().map(|m| m.content.as_str()),
        Some(FAILURE_REPLY)
    );
}

#[tokio::test]
async fn unknown_action_is_a_failure() {
    let (mut store, _) = seeded_store();
    let bridge = bridge([Script::call("delete_everything", json!({}))]);

    let outcome = bridge.send(&mut store, "clean up").await;

    assert!(matches!(outcome, TurnOutcome::Failed { .. }));
    assert_eq!(store.state().boards.len(), 1);
    assert_eq!(store.state().tasks.len(), 2);
}

#[tokio::test]
async fn malformed_action_args_are_a_failure() {
    let (mut store, _) = seeded_store();
    let bridge = bridge([Script::call(CREATE_TASK, json!({ "title": 7 }))]);

    let outcome = bridge.send(&mut store, "make a task").await;

    let TurnOutcome::Failed { error, .. } = outcome else {
        panic!("expected a failure");
    };
    assert!(matches!(error, Error::Json(_)));
    assert_eq!(store.state().tasks.len(), 2);
}

#[tokio::test]
async fn blank_reply_still_appends_one_model_message() {
    let (mut store, _) = seeded_store();
    let bridge = bridge([Script::text("   ")]);

    bridge.send(&mut store, "hi").await;

    let messages = transcript(&store);
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[2], (ChatRole::Model, EMPTY_REPLY.to_string()));
}

#[tokio::test]
async fn blank_input_is_ignored() {
    let (mut store, memory) = seeded_store();
    let bridge = bridge([Script::text("unused")]);

    let outcome = bridge.send(&mut store, "   \n").await;

    assert!(matches!(outcome, TurnOutcome::Ignored));
    assert!(outcome.reply().is_none());
    assert!(bridge.assistant().requests().is_empty());
    assert_eq!(store.state().chat_history.len(), 1);
    assert!(memory.raw().is_none());
}

#[tokio::test]
async fn request_carries_context_and_tool() {
    let (mut store, _) = seeded_store();
    store.set_view(View::BoardDetail, Some("board-1".to_string()));
    let bridge = bridge([Script::text("ok")]);

    bridge.send(&mut store, "what's on my board?").await;

    let requests = bridge.assistant().requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.system_instruction, SYSTEM_INSTRUCTION);
    assert_eq!(request.user_message, "what's on my board?");
    assert_eq!(request.tools.len(), 1);
    assert_eq!(request.tools[0].name, CREATE_TASK);
    assert!(request.context.contains("Current View: board-detail"));
    assert!(request.context.contains("Active Board: Get Started"));
    assert!(request.context.contains("Doing (ID: list-doing)"));
    assert!(request.context.contains("Total Tasks Count: 2"));
}

#[tokio::test]
async fn each_turn_persists() {
    let (mut store, memory) = seeded_store();
    let bridge = bridge([Script::text("first"), Script::text("second")]);

    bridge.send(&mut store, "one").await;
    bridge.send(&mut store, "two").await;

    let raw = memory.raw().expect("persisted");
    let saved: serde_json::Value = serde_json::from_str(&raw).expect("json");
    let history = saved["chatHistory"].as_array().expect("array");
    assert_eq!(history.len(), 5);
    assert_eq!(history[4]["content"], "second");
}
