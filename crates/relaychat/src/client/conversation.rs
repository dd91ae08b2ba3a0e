//! Conversation log, pending flag, and the render projection.

use std::slice;

use chrono::Utc;
use serde::Serialize;

/// Author of a message entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Who {
    User,
    Assistant,
}

/// One displayed message. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageEntry {
    who: Who,
    text: String,
    /// Milliseconds since the Unix epoch.
    timestamp: i64,
}

impl MessageEntry {
    fn now(who: Who, text: String) -> Self {
        Self {
            who,
            text,
            timestamp: Utc::now().timestamp_millis(),
        }
    }

    pub fn who(&self) -> Who {
        self.who
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }
}

/// Client-side chat state for one session.
///
/// Entries are only ever appended, and only once their full text is known.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    entries: Vec<MessageEntry>,
    pending: bool,
    draft: String,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[MessageEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Current composer contents.
    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.draft = draft.into();
    }

    /// Whether a submit of the current draft would be accepted.
    pub fn can_send(&self) -> bool {
        !self.pending && !self.draft.trim().is_empty()
    }

    /// Display rows, oldest first, with a typing row while a request is pending.
    pub fn render(&self) -> Render<'_> {
        Render {
            entries: self.entries.iter(),
            typing: self.pending,
        }
    }

    /// Start a turn: append the user entry, clear the draft, mark pending.
    ///
    /// Returns the message to relay, or `None` when the text is blank or a
    /// request is already pending. Rejection leaves the state untouched.
    pub(crate) fn begin_turn(&mut self, text: &str) -> Option<String> {
        let message = text.trim();
        if message.is_empty() || self.pending {
            return None;
        }

        self.entries
            .push(MessageEntry::now(Who::User, message.to_string()));
        self.draft.clear();
        self.pending = true;
        Some(message.to_string())
    }

    /// Finish a turn with the assistant's text and clear the pending flag.
    pub(crate) fn finish_turn(&mut self, text: String) {
        self.entries.push(MessageEntry::now(Who::Assistant, text));
        self.pending = false;
    }

    pub(crate) fn clear_pending(&mut self) {
        self.pending = false;
    }
}

/// A display row produced by [`Conversation::render`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Row<'a> {
    Entry(&'a MessageEntry),
    /// Transient placeholder shown while the assistant reply is outstanding.
    Typing,
}

/// Lazy projection of a conversation into display rows.
///
/// Cloning restarts from the same position.
#[derive(Debug, Clone)]
pub struct Render<'a> {
    entries: slice::Iter<'a, MessageEntry>,
    typing: bool,
}

impl<'a> Iterator for Render<'a> {
    type Item = Row<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(entry) = self.entries.next() {
            return Some(Row::Entry(entry));
        }
        if std::mem::take(&mut self.typing) {
            return Some(Row::Typing);
        }
        None
    }
}
