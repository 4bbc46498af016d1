//! Bot abstraction for sending messages.
//!
//! [`Bot`] is transport-agnostic; production code uses the teloxide-backed
//! adapter in [`crate::telegram`], tests substitute a recording mock.

use crate::core::types::Chat;
use async_trait::async_trait;

/// Abstraction for outbound platform operations. Implementations map to a
/// transport (e.g. Telegram).
#[async_trait]
pub trait Bot: Send + Sync {
    /// Sends a text message to the given chat.
    async fn send_message(&self, chat: &Chat, text: &str) -> crate::core::error::Result<()>;

    /// Shows a "typing…" indicator on the chat. Best-effort UX signal while a
    /// slow completion call is outstanding; implementations may no-op.
    async fn indicate_typing(&self, _chat: &Chat) -> crate::core::error::Result<()> {
        Ok(())
    }
}
