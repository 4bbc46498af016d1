//! Mock implementation of [`relay_bot::Bot`] for integration tests.
//!
//! Records every `send_message` call so tests can assert on outbound text and
//! ordering without hitting a real transport.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

use relay_bot::{Bot, Chat, RelayError, Result};

/// One recorded call to `send_message(chat, text)`.
#[derive(Debug, Clone)]
pub struct SentRecord {
    pub chat_id: i64,
    pub text: String,
}

/// Mock Bot that records sends and counts typing indications.
/// With `fail_sends` set, every send errors, for failure-propagation tests.
#[derive(Default)]
pub struct MockBot {
    sent: Mutex<Vec<SentRecord>>,
    typing_count: AtomicUsize,
    fail_sends: AtomicBool,
}

impl MockBot {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        let bot = Self::default();
        bot.fail_sends.store(true, Ordering::Relaxed);
        Arc::new(bot)
    }

    /// Snapshot of all recorded sends, in order.
    pub async fn sent(&self) -> Vec<SentRecord> {
        self.sent.lock().await.clone()
    }

    /// Texts of all recorded sends, in order.
    pub async fn sent_texts(&self) -> Vec<String> {
        self.sent.lock().await.iter().map(|r| r.text.clone()).collect()
    }

    pub fn typing_count(&self) -> usize {
        self.typing_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Bot for MockBot {
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()> {
        if self.fail_sends.load(Ordering::Relaxed) {
            return Err(RelayError::Bot("mock send failure".to_string()));
        }
        self.sent.lock().await.push(SentRecord {
            chat_id: chat.id,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn indicate_typing(&self, _chat: &Chat) -> Result<()> {
        self.typing_count.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
