//! Thread projections for the presentation layer

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Thread, ThreadId};

/// Summary information for displaying a thread in the sidebar list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadSummary {
    /// Thread ID
    pub id: ThreadId,
    /// Display subject, taken un-normalized from the latest message
    pub subject: String,
    /// Preview snippet of the latest message
    pub snippet: String,
    /// Timestamp of the most recent message
    pub last_message_at: DateTime<Utc>,
    /// Number of messages in the thread
    pub message_count: usize,
    /// Display name of the latest sender
    pub sender_name: Option<String>,
    /// Email address of the latest sender
    pub sender_email: String,
    /// Whether the thread has unread messages
    pub is_unread: bool,
}

impl From<&Thread> for ThreadSummary {
    fn from(thread: &Thread) -> Self {
        let latest = thread.latest();
        Self {
            id: thread.id.clone(),
            subject: latest.record.subject.clone().unwrap_or_default(),
            snippet: latest.record.body_preview.clone(),
            last_message_at: latest.effective_at,
            message_count: thread.count(),
            sender_name: latest.record.from.name.clone(),
            sender_email: latest.record.from.email.clone(),
            is_unread: thread.is_unread(),
        }
    }
}

/// Project built threads into sidebar summaries.
///
/// The builder already orders threads by last activity descending, and
/// that order is preserved here.
pub fn summarize(threads: &[Thread]) -> Vec<ThreadSummary> {
    threads.iter().map(ThreadSummary::from).collect()
}
