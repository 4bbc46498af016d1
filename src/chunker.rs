//! Splitting oversized outbound text into ordered transport-safe fragments.

use crate::core::{Bot, Chat, Result};

/// Platform message size limit, in characters.
pub const MAX_MESSAGE_LEN: usize = 2000;

/// Splits `text` into contiguous fragments of exactly `max_len` characters
/// (the final fragment may be shorter). Fragments never split a character, and
/// concatenating them restores the input. No awareness of word or sentence
/// boundaries.
pub fn split_chunks(text: &str, max_len: usize) -> Vec<String> {
    assert!(max_len > 0, "max_len must be positive");
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(max_len)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

/// Sends `text` to `chat`: one message when it fits in `max_len`, otherwise
/// each fragment as a separate ordered message. A failed send propagates to
/// the caller; fragments are not retried.
pub async fn send_chunked(
    bot: &dyn Bot,
    chat: &Chat,
    text: &str,
    max_len: usize,
) -> Result<()> {
    if text.chars().count() <= max_len {
        return bot.send_message(chat, text).await;
    }
    for chunk in split_chunks(text, max_len) {
        bot.send_message(chat, &chunk).await?;
    }
    Ok(())
}
