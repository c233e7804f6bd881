#![allow(dead_code)]

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use assert_cmd::Command;
use tempfile::TempDir;
use trellolite::assistant::{Assistant, AssistantReply, AssistantRequest, FunctionCall};
use trellolite::error::{Error, Result};
use trellolite::model::AppState;
use trellolite::storage::{MemoryStorage, STATE_FILE};
use trellolite::Store;

/// A throwaway data directory for CLI runs
pub struct TestDataDir {
    dir: TempDir,
}

impl TestDataDir {
    pub fn new() -> std::io::Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn state_file(&self) -> PathBuf {
        self.dir.path().join(STATE_FILE)
    }

    pub fn write_config(&self, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.dir.path().join("trellolite.toml");
        fs::write(&path, contents)?;
        Ok(path)
    }

    pub fn write_state(&self, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.state_file();
        fs::write(&path, contents)?;
        Ok(path)
    }

    pub fn read_state(&self) -> Result<AppState> {
        let raw = fs::read_to_string(self.state_file())?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// The binary, pointed at this directory and with the env override cleared
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("trellolite").expect("binary");
        cmd.env_remove("TRELLOLITE_DATA_DIR")
            .env_remove("RUST_LOG")
            .arg("--data-dir")
            .arg(self.path());
        cmd
    }
}

/// Store over a fresh in-memory backend, hydrated from the seed
pub fn seeded_store() -> (Store, MemoryStorage) {
    let memory = MemoryStorage::new();
    let store = Store::open(memory.clone());
    (store, memory)
}

/// One canned behaviour of [`ScriptedAssistant`]
#[derive(Debug, Clone)]
pub enum Script {
    Reply(AssistantReply),
    Fail(String),
    Stall(Duration),
}

impl Script {
    pub fn text(text: &str) -> Self {
        Script::Reply(AssistantReply::Text(text.to_string()))
    }

    pub fn call(name: &str, args: serde_json::Value) -> Self {
        Script::Reply(AssistantReply::FunctionCall(FunctionCall {
            name: name.to_string(),
            args,
        }))
    }
}

/// Fake service that plays back scripted answers in order and records every
/// request it receives
#[derive(Debug, Default)]
pub struct ScriptedAssistant {
    scripts: Mutex<VecDeque<Script>>,
    requests: Mutex<Vec<AssistantRequest>>,
}

impl ScriptedAssistant {
    pub fn new(scripts: impl IntoIterator<Item = Script>) -> Self {
        Self {
            scripts: Mutex::new(scripts.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<AssistantRequest> {
        self.requests.lock().expect("requests lock").clone()
    }
}

impl Assistant for ScriptedAssistant {
    async fn complete(&self, request: &AssistantRequest) -> Result<AssistantReply> {
        self.requests
            .lock()
            .expect("requests lock")
            .push(request.clone());
        let next = self.scripts.lock().expect("scripts lock").pop_front();
        match next {
            Some(Script::Reply(reply)) => Ok(reply),
            Some(Script::Fail(message)) => Err(Error::Assistant(message)),
            Some(Script::Stall(delay)) => {
                tokio::time::sleep(delay).await;
                Ok(AssistantReply::Text("too late".to_string()))
            }
            None => Err(Error::Assistant("script exhausted".to_string())),
        }
    }
}
