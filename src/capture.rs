//! Pending prompt captures, scoped per (user, chat).
//!
//! When `!set_custom_sys` starts a capture dialog, the command handler
//! registers a continuation here and awaits it with a timeout. The capture
//! handler offers every inbound non-command message to the registry; a
//! non-empty message from the requesting user in the requesting chat is
//! delivered to the waiting continuation and consumed. Messages from other
//! users (or other chats) never match, so concurrent captures cannot be
//! cross-wired.
//!
//! Timeout and match are mutually exclusive: [`claim`](PromptCaptureRegistry::claim)
//! removes the entry and completes the continuation while holding the
//! registry lock, and the timeout path only reports a timeout when it removed
//! the entry itself.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{oneshot, Mutex};
use tracing::info;

type CaptureKey = (i64, i64);

/// Outcome of one capture wait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// A matching message arrived; carries its text content.
    Captured(String),
    /// The timeout elapsed with no matching message.
    TimedOut,
    /// A newer capture for the same (user, chat) replaced this one.
    Superseded,
}

/// Registry of in-flight prompt captures keyed by (user_id, chat_id).
#[derive(Clone, Default)]
pub struct PromptCaptureRegistry {
    pending: Arc<Mutex<HashMap<CaptureKey, oneshot::Sender<String>>>>,
}

impl PromptCaptureRegistry {
    pub fn new() -> Self {
        Self {
            pending: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Registers a capture for (user, chat) and returns its continuation.
    /// Any prior capture for the same key is superseded (its waiter resolves
    /// to [`CaptureOutcome::Superseded`]).
    async fn begin(&self, user_id: i64, chat_id: i64) -> oneshot::Receiver<String> {
        let (tx, rx) = oneshot::channel();
        let mut pending = self.pending.lock().await;
        if pending.insert((user_id, chat_id), tx).is_some() {
            info!(user_id, chat_id, "step: capture superseded an earlier capture");
        }
        rx
    }

    /// Offers a message to the registry. Returns true when (user, chat) has a
    /// pending capture and `content` is non-empty; the content is delivered to
    /// the waiting continuation and the message is considered consumed. Empty
    /// content never satisfies a capture.
    pub async fn claim(&self, user_id: i64, chat_id: i64, content: &str) -> bool {
        if content.is_empty() {
            return false;
        }
        let mut pending = self.pending.lock().await;
        match pending.remove(&(user_id, chat_id)) {
            Some(tx) => {
                // Send while holding the lock so a concurrent timeout that
                // observes the entry gone can always drain the value.
                let _ = tx.send(content.to_string());
                info!(user_id, chat_id, "step: capture claimed");
                true
            }
            None => false,
        }
    }

    /// Removes a pending capture. Returns true when an entry was removed,
    /// i.e. the wait genuinely timed out before any claim.
    async fn cancel(&self, user_id: i64, chat_id: i64) -> bool {
        self.pending.lock().await.remove(&(user_id, chat_id)).is_some()
    }

    /// Whether a capture is pending for (user, chat). Exposed for tests.
    pub async fn has_pending(&self, user_id: i64, chat_id: i64) -> bool {
        self.pending.lock().await.contains_key(&(user_id, chat_id))
    }

    /// Runs one capture wait: registers the continuation, then waits up to
    /// `timeout` for a matching message. The timeout fires exactly once and
    /// only when no claim happened first.
    pub async fn wait(&self, user_id: i64, chat_id: i64, timeout: Duration) -> CaptureOutcome {
        let mut rx = self.begin(user_id, chat_id).await;
        match tokio::time::timeout(timeout, &mut rx).await {
            Ok(Ok(text)) => CaptureOutcome::Captured(text),
            Ok(Err(_)) => CaptureOutcome::Superseded,
            Err(_elapsed) => {
                if self.cancel(user_id, chat_id).await {
                    CaptureOutcome::TimedOut
                } else {
                    // A claim raced the timeout and already completed the
                    // continuation; the captured value wins.
                    match rx.try_recv() {
                        Ok(text) => CaptureOutcome::Captured(text),
                        Err(_) => CaptureOutcome::Superseded,
                    }
                }
            }
        }
    }
}
