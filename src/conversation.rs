//! Per-user conversation state: message history and system-prompt override.
//!
//! Retention contract: process lifetime only. Entries are created lazily on
//! first use, never evicted, and never persisted; a restart discards all state.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::info;

use crate::texts::DEFAULT_SYSTEM_PROMPT;

/// Role of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One conversation turn: role plus text content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Per-user state: ordered turns plus the system-prompt override.
///
/// `system_prompt` is `None` while unset (reads resolve to the default) and
/// `Some("")` after an explicit clear; the two states are distinct.
#[derive(Debug, Clone, Default)]
struct UserState {
    turns: Vec<Turn>,
    system_prompt: Option<String>,
}

/// In-memory store of per-user conversations and system prompts, keyed by the
/// platform user id. Invariant: index 0 of a non-empty conversation is the
/// system turn, overwritten in place on every new user turn so prompt edits
/// apply retroactively to the next completion call.
#[derive(Clone, Default)]
pub struct ConversationStore {
    users: Arc<RwLock<HashMap<i64, UserState>>>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Returns a snapshot of the user's conversation; empty when the user has
    /// no entry yet (lazy init makes the two indistinguishable).
    pub async fn history(&self, user_id: i64) -> Vec<Turn> {
        let users = self.users.read().await;
        users.get(&user_id).map(|s| s.turns.clone()).unwrap_or_default()
    }

    /// Appends a user turn. On an empty conversation a system turn with
    /// `system_prompt` is inserted at index 0; otherwise index 0's content is
    /// overwritten with `system_prompt` (even if unchanged). Returns a
    /// snapshot of the turns for the completion request.
    pub async fn append_user_turn(
        &self,
        user_id: i64,
        text: &str,
        system_prompt: &str,
    ) -> Vec<Turn> {
        let mut users = self.users.write().await;
        let state = users.entry(user_id).or_default();

        if state.turns.is_empty() {
            state.turns.push(Turn::system(system_prompt));
        } else {
            state.turns[0] = Turn::system(system_prompt);
        }
        state.turns.push(Turn::user(text));

        info!(
            user_id,
            turn_count = state.turns.len(),
            "step: user turn appended"
        );
        state.turns.clone()
    }

    /// Appends an assistant turn. Append only; never overwrites.
    pub async fn append_assistant_turn(&self, user_id: i64, text: &str) {
        let mut users = self.users.write().await;
        let state = users.entry(user_id).or_default();
        state.turns.push(Turn::assistant(text));
        info!(
            user_id,
            turn_count = state.turns.len(),
            "step: assistant turn appended"
        );
    }

    /// Clears the conversation and sets the system prompt to the explicitly
    /// empty state, as one logical operation under a single write lock.
    pub async fn clear(&self, user_id: i64) {
        let mut users = self.users.write().await;
        let state = users.entry(user_id).or_default();
        state.turns.clear();
        state.system_prompt = Some(String::new());
        info!(user_id, "step: conversation and system prompt cleared");
    }

    /// Returns the user's system prompt: the built-in default while unset,
    /// otherwise the stored value (which may be the empty string after an
    /// explicit clear).
    pub async fn system_prompt(&self, user_id: i64) -> String {
        let users = self.users.read().await;
        users
            .get(&user_id)
            .and_then(|s| s.system_prompt.clone())
            .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string())
    }

    /// Sets the user's system prompt. At most one active prompt per user.
    pub async fn set_system_prompt(&self, user_id: i64, value: impl Into<String>) {
        let mut users = self.users.write().await;
        let state = users.entry(user_id).or_default();
        state.system_prompt = Some(value.into());
        info!(user_id, "step: system prompt set");
    }

    /// Number of users with an entry. Exposed for the retention-contract test.
    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }
}
