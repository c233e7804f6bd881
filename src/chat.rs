//! Bounded chat history.
//!
//! The assistant transcript is append-only and keeps only the most recent
//! [`CHAT_HISTORY_LIMIT`] messages. It serializes as a plain JSON array so the
//! persisted layout stays a list of `{role, content}` objects.

use std::collections::VecDeque;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::model::{ChatMessage, ChatRole};

/// Maximum number of messages retained in the history
pub const CHAT_HISTORY_LIMIT: usize = 50;

/// Greeting the assistant opens (and re-opens after a clear) the transcript with
pub const GREETING: &str =
    "Hi! I'm your TrelloLite assistant. Ask me to suggest tasks or create them on your board.";

/// Fixed-capacity message log; pushing past capacity evicts the oldest entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatLog {
    messages: VecDeque<ChatMessage>,
}

impl ChatLog {
    pub fn new() -> Self {
        Self {
            messages: VecDeque::with_capacity(CHAT_HISTORY_LIMIT),
        }
    }

    /// History containing only the assistant greeting
    pub fn greeting() -> Self {
        let mut log = Self::new();
        log.push(ChatMessage::new(ChatRole::Model, GREETING));
        log
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push_back(message);
        while self.messages.len() > CHAT_HISTORY_LIMIT {
            self.messages.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.back()
    }
}

impl Default for ChatLog {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<ChatMessage> for ChatLog {
    fn from_iter<I: IntoIterator<Item = ChatMessage>>(iter: I) -> Self {
        let mut log = Self::new();
        for message in iter {
            log.push(message);
        }
        log
    }
}

impl Serialize for ChatLog {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.messages.iter())
    }
}

impl<'de> Deserialize<'de> for ChatLog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let messages = Vec::<ChatMessage>::deserialize(deserializer)?;
        Ok(messages.into_iter().collect())
    }
}
