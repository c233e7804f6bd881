//! Assistant backed by an external program.
//!
//! The configured shell command receives the request as one JSON document on
//! stdin and must print one reply document on stdout:
//!
//! ```text
//! {"text": "Sure, here are some ideas..."}
//! {"functionCall": {"name": "create_task", "args": {"listId": "...", "title": "..."}}}
//! ```
//!
//! The child is killed if the bridge's timeout drops the pending call.

use std::io::ErrorKind;
use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::assistant::{Assistant, AssistantReply, AssistantRequest};
use crate::error::{Error, Result};

const MAX_ERROR_LEN: usize = 400;

#[derive(Debug, Clone, Default)]
pub struct CommandAssistant {
    command: Option<String>,
}

impl CommandAssistant {
    /// `None` yields an assistant whose every call fails as unconfigured
    pub fn new(command: Option<String>) -> Self {
        Self { command }
    }

    pub fn is_configured(&self) -> bool {
        self.command.is_some()
    }
}

impl Assistant for CommandAssistant {
    async fn complete(&self, request: &AssistantRequest) -> Result<AssistantReply> {
        let cmd = self.command.as_deref().ok_or_else(|| {
            Error::Assistant("no assistant command configured".to_string())
        })?;

        let payload = serde_json::to_vec(request)?;
        let mut child = build_shell_command(cmd)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        // Feed stdin while draining stdout so neither pipe can fill up and stall.
        let stdin = child.stdin.take();
        let feed = async move {
            if let Some(mut stdin) = stdin {
                stdin.write_all(&payload).await?;
                stdin.shutdown().await?;
            }
            Ok::<(), std::io::Error>(())
        };
        let (fed, output) = tokio::join!(feed, child.wait_with_output());
        let output = output?;
        match fed {
            Ok(()) => {}
            // The command answered without reading the whole request.
            Err(err) if err.kind() == ErrorKind::BrokenPipe => {
                debug!("assistant command closed stdin early");
            }
            Err(err) => return Err(err.into()),
        }
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            let message =
                first_non_empty(stderr.trim(), stdout.trim()).unwrap_or("unknown error");
            return Err(Error::Assistant(format!(
                "exit={} msg={}",
                output.status.code().unwrap_or(-1),
                truncate(message, MAX_ERROR_LEN)
            )));
        }

        Ok(serde_json::from_slice(&output.stdout)?)
    }
}

fn build_shell_command(cmd: &str) -> Command {
    if cfg!(windows) {
        let mut command = Command::new("cmd");
        command.args(["/C", cmd]);
        command
    } else {
        let mut command = Command::new("sh");
        command.args(["-c", cmd]);
        command
    }
}

fn first_non_empty<'a>(a: &'a str, b: &'a str) -> Option<&'a str> {
    [a, b].into_iter().find(|value| !value.is_empty())
}

fn truncate(value: &str, max_len: usize) -> String {
    value.chars().take(max_len).collect()
}
