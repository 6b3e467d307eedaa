//! Thread model: the conversation aggregate rebuilt on every refresh

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ThreadMessage;

/// Identifier of a reconstructed thread.
///
/// The three variants are disjoint namespaces, so a subject-derived
/// virtual thread can never collide with a real conversation id, and a
/// subject-less singleton can never collide with either.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum ThreadId {
    /// Conversation id assigned by the originating system
    Conversation(String),
    /// Virtual thread keyed by a normalized subject
    Subject(String),
    /// Singleton thread keyed by the record's own id
    Message(String),
}

impl ThreadId {
    /// String form for logs and map keys. Subject-derived ids keep the
    /// historical `sub-` prefix so they stay recognizable.
    pub fn as_key(&self) -> String {
        match self {
            Self::Conversation(id) => id.clone(),
            Self::Subject(subject) => format!("sub-{subject}"),
            Self::Message(id) => format!("msg-{id}"),
        }
    }
}

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_key())
    }
}

/// A thread is a conversation containing one or more messages, ordered
/// ascending by effective timestamp. Threads are rebuilt from scratch
/// on every refresh; instances are disposable between builds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thread {
    pub id: ThreadId,
    /// Member messages, never empty
    pub messages: Vec<ThreadMessage>,
}

impl Thread {
    /// The most recent message in the thread
    pub fn latest(&self) -> &ThreadMessage {
        // Builder invariant: a thread always has at least one message.
        self.messages
            .last()
            .expect("thread contains at least one message")
    }

    /// Timestamp of the most recent message
    pub fn last_message_at(&self) -> DateTime<Utc> {
        self.latest().effective_at
    }

    /// Number of messages in the thread
    pub fn count(&self) -> usize {
        self.messages.len()
    }

    /// Whether any member message is unread
    pub fn is_unread(&self) -> bool {
        self.messages.iter().any(|m| !m.record.is_read)
    }
}
