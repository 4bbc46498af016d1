//! Scripted [`relay_bot::CompletionClient`] for integration tests.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

use relay_bot::llm::{CompletionClient, CompletionError};
use relay_bot::Turn;

/// Completion client returning a fixed reply (or a fixed failure) and
/// recording the turn sequences it was called with.
pub struct MockCompletionClient {
    reply: std::result::Result<String, String>,
    requests: Mutex<Vec<Vec<Turn>>>,
}

impl MockCompletionClient {
    /// Always replies with `text`.
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_string()),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Always fails with a generic upstream error.
    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: Err("upstream unavailable".to_string()),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Turn sequences submitted so far, in call order.
    pub async fn requests(&self) -> Vec<Vec<Turn>> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl CompletionClient for MockCompletionClient {
    async fn complete(&self, turns: &[Turn]) -> std::result::Result<String, CompletionError> {
        self.requests.lock().await.push(turns.to_vec());
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(e) => Err(CompletionError(e.clone())),
        }
    }
}
