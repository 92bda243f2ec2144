//! Console channel driven from an in-memory input.

use bot_adapter::BotAdapter;
use bot_core::CancellationToken;
use bot_state::MemoryStorage;
use handson_bot::messages::{greeting, NAME_PROMPT_TEXT, WELCOME_TEXT};
use handson_bot::{build_bot_components, build_sample_bot, run_console, ConsoleBot, ConsoleSession};
use std::sync::Arc;

async fn run_lines(input: &str) -> String {
    let components = build_bot_components(Arc::new(MemoryStorage::new()));
    let handler = build_sample_bot(&components);
    let bot = Arc::new(ConsoleBot::new(Vec::<u8>::new()));
    let adapter = BotAdapter::new(bot.clone());
    let session = ConsoleSession::new("tester");

    run_console(
        input.as_bytes(),
        &adapter,
        &handler,
        &session,
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    drop(adapter);
    let out = Arc::try_unwrap(bot).ok().unwrap().into_inner();
    String::from_utf8(out).unwrap()
}

/// **Test: join welcome, prompt, name, greeting; blank lines skipped; exit stops reading.**
#[tokio::test]
async fn test_console_session() {
    let out = run_lines("hi\n\nalice\nhello\nexit\nignored\n").await;

    let expected = [
        format!("Bot: {}", WELCOME_TEXT),
        format!("Bot: {}", NAME_PROMPT_TEXT),
        format!("Bot: {}", greeting("ALICE")),
    ];
    assert_eq!(out.lines().collect::<Vec<_>>(), expected);
}

#[tokio::test]
async fn test_console_stops_at_eof() {
    let out = run_lines("").await;

    assert_eq!(out, format!("Bot: {}\n", WELCOME_TEXT));
}

#[tokio::test]
async fn test_console_stops_when_cancelled() {
    let components = build_bot_components(Arc::new(MemoryStorage::new()));
    let handler = build_sample_bot(&components);
    let adapter = BotAdapter::new(Arc::new(ConsoleBot::new(tokio::io::sink())));
    let session = ConsoleSession::new("tester");
    let cancel = CancellationToken::new();
    cancel.cancel();

    // Input never ends; cancellation must end the session.
    let (_writer, reader) = tokio::io::duplex(64);
    run_console(
        tokio::io::BufReader::new(reader),
        &adapter,
        &handler,
        &session,
        &cancel,
    )
    .await
    .unwrap();
}
