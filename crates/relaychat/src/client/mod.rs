//! Chat client: conversation state plus the transport that reaches the relay.
//!
//! The [`ChatClient`] owns an append-only conversation log and a pending flag
//! that allows one in-flight relay request at a time. Front ends (the terminal
//! chat, tests) drive it through [`ChatClient::submit`] and display it through
//! [`Conversation::render`].

mod chat;
mod conversation;
mod transport;

pub use chat::{ChatClient, EMPTY_REPLY, Submission};
pub use conversation::{Conversation, MessageEntry, Render, Row, Who};
pub use transport::{ClientError, HttpRelayClient, RelayTransport};
