//! HTTP request handlers.

mod chat;
mod health;
mod page;
mod version;

pub use chat::{chat_alive, send_message};
pub use health::{livez, readyz};
pub use page::index;
pub use version::version;
