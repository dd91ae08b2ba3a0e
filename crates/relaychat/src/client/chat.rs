use std::sync::{Mutex, MutexGuard, PoisonError};

use relaychat_types::RelayRequest;
use tracing::{debug, warn};

use super::conversation::Conversation;
use super::transport::RelayTransport;

/// Text logged when the relay succeeds with an empty or missing reply.
pub const EMPTY_REPLY: &str = "(empty reply)";

/// Outcome of [`ChatClient::submit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// Blank text or a request already in flight; nothing was logged.
    Ignored,
    /// The turn ran to completion and an assistant entry was appended.
    Completed,
}

/// Drives one relay request per user turn.
///
/// The conversation lock is only held for synchronous state transitions,
/// never across the transport await, so rendering stays available while a
/// request is in flight.
pub struct ChatClient<T> {
    transport: T,
    conversation: Mutex<Conversation>,
}

impl<T: RelayTransport> ChatClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            conversation: Mutex::new(Conversation::new()),
        }
    }

    /// Submit `text` as the next user turn.
    ///
    /// Blank text, or any submit while a request is pending, is a silent
    /// no-op. Otherwise exactly one user entry and then exactly one assistant
    /// entry (reply, [`EMPTY_REPLY`], or `"Error: ..."`) are appended.
    pub async fn submit(&self, text: &str) -> Submission {
        let Some(message) = self.lock().begin_turn(text) else {
            debug!("submit ignored: blank input or request pending");
            return Submission::Ignored;
        };

        let pending = PendingGuard::new(&self.conversation);

        let reply = match self.transport.send(RelayRequest::new(message)).await {
            Ok(reply) if reply.is_empty() => EMPTY_REPLY.to_string(),
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "relay request failed");
                format!("Error: {e}")
            }
        };

        pending.finish(reply);
        Submission::Completed
    }

    /// Submit the current composer draft.
    pub async fn submit_draft(&self) -> Submission {
        let draft = self.lock().draft().to_string();
        self.submit(&draft).await
    }

    pub fn set_draft(&self, draft: impl Into<String>) {
        self.lock().set_draft(draft);
    }

    pub fn is_pending(&self) -> bool {
        self.lock().is_pending()
    }

    /// A copy of the current state, for rendering.
    pub fn snapshot(&self) -> Conversation {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Conversation> {
        self.conversation
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Clears the pending flag when the turn ends, including when the submit
/// future is dropped before the transport resolves.
struct PendingGuard<'a> {
    conversation: &'a Mutex<Conversation>,
    finished: bool,
}

impl<'a> PendingGuard<'a> {
    fn new(conversation: &'a Mutex<Conversation>) -> Self {
        Self {
            conversation,
            finished: false,
        }
    }

    fn lock(&self) -> MutexGuard<'a, Conversation> {
        self.conversation
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn finish(mut self, reply: String) {
        self.lock().finish_turn(reply);
        self.finished = true;
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.lock().clear_pending();
        }
    }
}
