//! Message type for the core model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{chat::Chat, user::User};

/// A single inbound message with user, chat, and text content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub user: User,
    pub chat: Chat,
    pub content: String,
    /// Whether the author is the bot itself; such messages are dropped at the
    /// transport boundary to prevent feedback loops.
    pub from_bot: bool,
    pub created_at: DateTime<Utc>,
}
