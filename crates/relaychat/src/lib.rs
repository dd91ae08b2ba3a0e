//! relaychat - a minimal chat relay for OpenAI-compatible completion APIs.
//!
//! The server side is a stateless [`relay::Relay`] behind `POST /chat`; the
//! client side is [`client::ChatClient`], used by the terminal chat and
//! mirrored by the browser page served at `/`.

pub mod client;
pub mod config;
pub mod handlers;
pub mod llm;
pub mod relay;
pub mod repl;
pub mod server;

#[cfg(test)]
mod testing;
