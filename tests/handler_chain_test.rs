//! End-to-end tests: drive the full handler chain (commands → captures →
//! conversation turns) with a recording MockBot and a scripted completion
//! client, and assert on outbound sends and store state.

use std::sync::Arc;
use std::time::Duration;

use relay_bot::texts::{
    DEFAULT_SYSTEM_PROMPT, INSTRUCTIONS, MSG_COMPLETION_FAILED, MSG_CONV_CLEARED,
    MSG_INVALID_COMMAND, MSG_LARGE_RESPONSE, MSG_NO_CONVERSATION, MSG_NO_PROMPT_SET,
    MSG_NO_SYSTEM_PROMPT, MSG_PROMPT_REQUEST,
};
use relay_bot::{
    build_handler_chain, Bot, Chat, CompletionClient, ConversationStore, HandlerChain, Message,
    PromptCaptureRegistry, Role, User,
};

mod common;
use common::mock_bot::MockBot;
use common::mock_completion::MockCompletionClient;

const CAPTURE_TIMEOUT: Duration = Duration::from_secs(5);

struct Fixture {
    bot: Arc<MockBot>,
    store: ConversationStore,
    captures: PromptCaptureRegistry,
    completions: Arc<MockCompletionClient>,
    chain: HandlerChain,
}

fn fixture(completions: Arc<MockCompletionClient>) -> Fixture {
    fixture_with_timeout(completions, CAPTURE_TIMEOUT)
}

fn fixture_with_timeout(completions: Arc<MockCompletionClient>, timeout: Duration) -> Fixture {
    let bot = MockBot::new();
    let store = ConversationStore::new();
    let captures = PromptCaptureRegistry::new();
    let chain = build_handler_chain(
        bot.clone() as Arc<dyn Bot>,
        store.clone(),
        captures.clone(),
        completions.clone() as Arc<dyn CompletionClient>,
        timeout,
    );
    Fixture {
        bot,
        store,
        captures,
        completions,
        chain,
    }
}

fn message(user_id: i64, chat_id: i64, content: &str) -> Message {
    Message {
        id: format!("m-{}-{}", user_id, chat_id),
        user: User {
            id: user_id,
            username: Some(format!("user{}", user_id)),
            first_name: None,
            last_name: None,
        },
        chat: Chat {
            id: chat_id,
            chat_type: "private".to_string(),
        },
        content: content.to_string(),
        from_bot: false,
        created_at: chrono::Utc::now(),
    }
}

async fn wait_for_pending(captures: &PromptCaptureRegistry, user_id: i64, chat_id: i64) {
    for _ in 0..200 {
        if captures.has_pending(user_id, chat_id).await {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("capture never became pending");
}

/// **Test: `!help` sends exactly one message (the instructions) and leaves
/// conversation state untouched.**
#[tokio::test]
async fn help_sends_instructions_only() {
    let f = fixture(MockCompletionClient::replying("unused"));

    f.chain.handle(&message(1, 10, "!help")).await.unwrap();

    let sent = f.bot.sent().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].chat_id, 10);
    assert_eq!(sent[0].text, INSTRUCTIONS);
    assert!(f.store.history(1).await.is_empty());
    assert!(f.completions.requests().await.is_empty());
}

/// **Test: a failed outbound send is not retried; the error propagates out of
/// the chain.**
#[tokio::test]
async fn send_failure_propagates() {
    let bot = MockBot::failing();
    let store = ConversationStore::new();
    let captures = PromptCaptureRegistry::new();
    let chain = build_handler_chain(
        bot.clone() as Arc<dyn Bot>,
        store.clone(),
        captures,
        MockCompletionClient::replying("hi there") as Arc<dyn CompletionClient>,
        CAPTURE_TIMEOUT,
    );

    let result = chain.handle(&message(1, 10, "hello")).await;
    assert!(result.is_err());

    // The turn and the assistant reply were recorded before the send failed.
    assert_eq!(store.history(1).await.len(), 3);
}

/// **Test: a first plain message yields [system(default), user, assistant]
/// and one outbound send with the completion text.**
#[tokio::test]
async fn conversation_turn_relays_completion() {
    let f = fixture(MockCompletionClient::replying("hi there"));

    f.chain.handle(&message(1, 10, "hello")).await.unwrap();

    let turns = f.store.history(1).await;
    assert_eq!(turns.len(), 3);
    assert_eq!(turns[0].role, Role::System);
    assert_eq!(turns[0].content, DEFAULT_SYSTEM_PROMPT);
    assert_eq!(turns[1].role, Role::User);
    assert_eq!(turns[1].content, "hello");
    assert_eq!(turns[2].role, Role::Assistant);
    assert_eq!(turns[2].content, "hi there");

    assert_eq!(f.bot.sent_texts().await, vec!["hi there".to_string()]);
    assert_eq!(f.bot.typing_count(), 1);

    // The completion request carried the pre-reply history.
    let requests = f.completions.requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].len(), 2);
}

/// **Test: completion failure sends the fixed error message and appends no
/// assistant turn; the pending user turn stays in history.**
#[tokio::test]
async fn completion_failure_keeps_user_turn() {
    let f = fixture(MockCompletionClient::failing());

    f.chain.handle(&message(1, 10, "hello")).await.unwrap();

    let turns = f.store.history(1).await;
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[0].role, Role::System);
    assert_eq!(turns[1].content, "hello");

    assert_eq!(f.bot.sent_texts().await, vec![MSG_COMPLETION_FAILED.to_string()]);
}

/// **Test: a reply over 2000 characters is relayed as a notice followed by
/// ordered 2000-character fragments that concatenate to the reply.**
#[tokio::test]
async fn oversized_reply_is_chunked_with_notice() {
    let reply = "x".repeat(4500);
    let f = fixture(MockCompletionClient::replying(&reply));

    f.chain.handle(&message(1, 10, "hello")).await.unwrap();

    let sent = f.bot.sent_texts().await;
    assert_eq!(sent.len(), 4);
    assert_eq!(sent[0], MSG_LARGE_RESPONSE);
    assert_eq!(
        sent[1..].iter().map(|s| s.chars().count()).collect::<Vec<_>>(),
        vec![2000, 2000, 500]
    );
    assert_eq!(sent[1..].concat(), reply);
}

/// **Test: empty inbound text is ignored — no turn recorded, no completion
/// call, nothing sent.**
#[tokio::test]
async fn empty_message_is_ignored() {
    let f = fixture(MockCompletionClient::replying("unused"));

    f.chain.handle(&message(1, 10, "")).await.unwrap();

    assert!(f.store.history(1).await.is_empty());
    assert!(f.completions.requests().await.is_empty());
    assert!(f.bot.sent_texts().await.is_empty());
}

/// **Test: `!set_bogus_sys` parses to Unknown — rejection notice, no state
/// mutation, no confirmation.**
#[tokio::test]
async fn bogus_set_command_is_rejected_cleanly() {
    let f = fixture(MockCompletionClient::replying("unused"));

    f.chain.handle(&message(1, 10, "!set_bogus_sys")).await.unwrap();

    assert_eq!(f.bot.sent_texts().await, vec![MSG_INVALID_COMMAND.to_string()]);
    assert_eq!(f.store.system_prompt(1).await, DEFAULT_SYSTEM_PROMPT);
    assert!(f.store.history(1).await.is_empty());
}

/// **Test: `!clear_conv` empties the conversation and pins the prompt to the
/// empty string; the next turn uses the empty system prompt.**
#[tokio::test]
async fn clear_conv_resets_state() {
    let f = fixture(MockCompletionClient::replying("ok"));

    f.chain.handle(&message(1, 10, "hello")).await.unwrap();
    f.chain.handle(&message(1, 10, "!clear_conv")).await.unwrap();

    assert!(f.store.history(1).await.is_empty());
    assert_eq!(f.store.system_prompt(1).await, "");
    assert!(f.bot.sent_texts().await.contains(&MSG_CONV_CLEARED.to_string()));
}

/// **Test: `!curr_conv` sends "No conversation currently." when empty, and
/// one `role: content` line per turn otherwise, rendering an empty system
/// prompt as "No system prompt set".**
#[tokio::test]
async fn curr_conv_lists_turns() {
    let f = fixture(MockCompletionClient::replying("the reply"));

    f.chain.handle(&message(1, 10, "!curr_conv")).await.unwrap();
    assert_eq!(f.bot.sent_texts().await, vec![MSG_NO_CONVERSATION.to_string()]);

    f.store.set_system_prompt(1, "").await;
    f.chain.handle(&message(1, 10, "the question")).await.unwrap();
    f.chain.handle(&message(1, 10, "!curr_conv")).await.unwrap();

    let sent = f.bot.sent_texts().await;
    let listing: Vec<&String> = sent.iter().skip(2).collect();
    assert_eq!(
        listing,
        vec![
            &format!("system: {}", MSG_NO_SYSTEM_PROMPT),
            &"user: the question".to_string(),
            &"assistant: the reply".to_string(),
        ]
    );
}

/// **Test: `!system` reports the resolved prompt — the default while unset,
/// the stored value after a set.**
#[tokio::test]
async fn system_command_reports_resolved_prompt() {
    let f = fixture(MockCompletionClient::replying("unused"));

    f.chain.handle(&message(1, 10, "!system")).await.unwrap();
    let sent = f.bot.sent_texts().await;
    assert!(sent[0].starts_with("This is your current system prompt:"));
    assert!(sent.concat().contains("BIDARA"));

    f.store.set_system_prompt(1, "short prompt").await;
    f.chain.handle(&message(1, 10, "!system")).await.unwrap();
    let sent = f.bot.sent_texts().await;
    assert!(sent.last().unwrap().contains("short prompt"));
}

/// **Test: `!set_default_sys` stores the built-in default and sends the
/// confirmation followed by the change/clear hint.**
#[tokio::test]
async fn set_default_sys_confirms_with_hint() {
    let f = fixture(MockCompletionClient::replying("unused"));
    f.store.set_system_prompt(1, "something else").await;

    f.chain.handle(&message(1, 10, "!set_default_sys")).await.unwrap();

    assert_eq!(f.store.system_prompt(1).await, DEFAULT_SYSTEM_PROMPT);
    let sent = f.bot.sent_texts().await;
    assert!(sent[0].starts_with("Your system prompt is set to:"));
    assert!(sent.last().unwrap().contains("`!set_custom_sys` or `!clear_sys`"));
}

/// **Test: `!clear_sys` pins the prompt to the empty string and confirms;
/// the conversation itself is untouched.**
#[tokio::test]
async fn clear_sys_clears_prompt_only() {
    let f = fixture(MockCompletionClient::replying("ok"));
    f.chain.handle(&message(1, 10, "hello")).await.unwrap();

    f.chain.handle(&message(1, 10, "!clear_sys")).await.unwrap();

    assert_eq!(f.store.system_prompt(1).await, "");
    assert_eq!(f.store.history(1).await.len(), 3);
}

/// **Test: the full `!set_custom_sys` dialog — prompt request, capture of the
/// next message from the same (user, chat), confirmation, and the captured
/// message never becoming a conversation turn.**
#[tokio::test]
async fn custom_sys_dialog_captures_next_message() {
    let f = fixture(MockCompletionClient::replying("unused"));

    let chain = f.chain.clone();
    let dialog =
        tokio::spawn(async move { chain.handle(&message(1, 10, "!set_custom_sys")).await });

    wait_for_pending(&f.captures, 1, 10).await;
    f.chain.handle(&message(1, 10, "answer like a pirate")).await.unwrap();
    dialog.await.unwrap().unwrap();

    assert_eq!(f.store.system_prompt(1).await, "answer like a pirate");
    assert!(f.store.history(1).await.is_empty());
    assert!(f.completions.requests().await.is_empty());

    let sent = f.bot.sent_texts().await;
    assert_eq!(sent[0], MSG_PROMPT_REQUEST);
    assert!(sent[1].contains("answer like a pirate"));
}

/// **Test: capture timeout sends exactly one "No system prompt was set." and
/// leaves the prompt unchanged.**
#[tokio::test]
async fn custom_sys_timeout_leaves_prompt_unchanged() {
    let f = fixture_with_timeout(
        MockCompletionClient::replying("unused"),
        Duration::from_millis(30),
    );

    f.chain.handle(&message(1, 10, "!set_custom_sys")).await.unwrap();

    let sent = f.bot.sent_texts().await;
    assert_eq!(sent, vec![MSG_PROMPT_REQUEST.to_string(), MSG_NO_PROMPT_SET.to_string()]);
    assert_eq!(f.store.system_prompt(1).await, DEFAULT_SYSTEM_PROMPT);
}

/// **Test: another user's message during a capture window is processed as a
/// normal conversation turn, not swallowed, and the requester's capture still
/// completes afterwards.**
#[tokio::test]
async fn capture_window_does_not_swallow_other_users() {
    let f = fixture(MockCompletionClient::replying("hi there"));

    let chain = f.chain.clone();
    let dialog =
        tokio::spawn(async move { chain.handle(&message(1, 10, "!set_custom_sys")).await });
    wait_for_pending(&f.captures, 1, 10).await;

    // Second user's message in the same chat goes through the normal path.
    f.chain.handle(&message(2, 10, "hello from user two")).await.unwrap();
    let other_turns = f.store.history(2).await;
    assert_eq!(other_turns.len(), 3);
    assert_eq!(other_turns[1].content, "hello from user two");

    // The requester's next message still resolves the capture.
    f.chain.handle(&message(1, 10, "the actual prompt")).await.unwrap();
    dialog.await.unwrap().unwrap();
    assert_eq!(f.store.system_prompt(1).await, "the actual prompt");
}

/// **Test: a command message during a capture window is dispatched as a
/// command, not captured (commands run first in the chain).**
#[tokio::test]
async fn command_during_capture_is_dispatched_not_captured() {
    let f = fixture(MockCompletionClient::replying("unused"));

    let chain = f.chain.clone();
    let dialog =
        tokio::spawn(async move { chain.handle(&message(1, 10, "!set_custom_sys")).await });
    wait_for_pending(&f.captures, 1, 10).await;

    f.chain.handle(&message(1, 10, "!help")).await.unwrap();
    assert!(f.captures.has_pending(1, 10).await);
    assert!(f.bot.sent_texts().await.contains(&INSTRUCTIONS.to_string()));

    f.chain.handle(&message(1, 10, "now the prompt")).await.unwrap();
    dialog.await.unwrap().unwrap();
    assert_eq!(f.store.system_prompt(1).await, "now the prompt");
}
