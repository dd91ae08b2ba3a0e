//! Terminal chat front end.
//!
//! Reads lines with reedline and drives a [`ChatClient`] against a running
//! relay. Enter submits; Ctrl-D exits.

use std::time::Duration;

use reedline::{DefaultPrompt, DefaultPromptSegment, Reedline, Signal};
use reqwest::Client;

use crate::client::{ChatClient, Conversation, HttpRelayClient, RelayTransport, Row, Who};

/// How long a request may run before the typing row is shown.
const TYPING_DELAY: Duration = Duration::from_millis(150);

pub async fn run(relay_url: &str) -> anyhow::Result<()> {
    let client = ChatClient::new(HttpRelayClient::new(Client::new(), relay_url));
    let mut line_editor = Reedline::create();
    let prompt = DefaultPrompt::new(
        DefaultPromptSegment::Basic("you".to_string()),
        DefaultPromptSegment::Empty,
    );

    println!("Chatting via {relay_url}/chat. Ctrl-D to quit.");
    let mut shown = 0;

    loop {
        match line_editor.read_line(&prompt) {
            Ok(Signal::Success(line)) => {
                submit_and_wait(&client, &line).await;
                shown = print_new_replies(&client.snapshot(), shown);
            }
            Ok(Signal::CtrlC) => continue,
            Ok(Signal::CtrlD) => break,
            Ok(_) => break,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}

async fn submit_and_wait<T: RelayTransport>(client: &ChatClient<T>, line: &str) {
    let submit = client.submit(line);
    tokio::pin!(submit);

    if tokio::time::timeout(TYPING_DELAY, &mut submit).await.is_err() {
        if let Some(Row::Typing) = client.snapshot().render().last() {
            println!("assistant: …");
        }
        submit.await;
    }
}

/// Print assistant rows past `shown`; user rows are already on screen.
fn print_new_replies(conversation: &Conversation, shown: usize) -> usize {
    for row in conversation.render().skip(shown) {
        if let Row::Entry(entry) = row
            && entry.who() == Who::Assistant
        {
            println!("assistant: {}", entry.text());
        }
    }
    conversation.len()
}
