//! Mailthread - conversation threading for the mail panel
//!
//! This crate reconstructs conversation threads from the unordered
//! received and sent message collections, whose records carry
//! inconsistent, partial, or missing linkage metadata. It provides:
//! - Domain models (MailRecord, ThreadMessage, Thread)
//! - Subject normalization for weak thread linking
//! - The two-pass thread builder (rebuilt in full on every refresh)
//! - Query projections for the sidebar UI
//! - Cached collections with optimistic mutation and stale-marking
//! - Action handlers for read-state, archive, and trash
//! - Compose prefill for reply and forward
//!
//! Protocol handling, MIME parsing, and persistence live in external
//! collaborators behind the [`actions::MailGateway`] trait and the
//! fetch side of [`cache::MailCache`].

pub mod actions;
pub mod cache;
pub mod compose;
pub mod config;
pub mod models;
pub mod query;
pub mod subject;
pub mod threading;

pub use actions::{ActionHandler, GatewayError, MailGateway};
pub use cache::MailCache;
pub use compose::{ComposePrefill, forward_prefill, reply_prefill};
pub use config::PanelConfig;
pub use models::{
    Direction, EmailAddress, MailRecord, MessageId, Thread, ThreadId, ThreadMessage,
};
pub use query::{ThreadSummary, summarize};
pub use subject::{normalize_subject, normalize_subject_with};
pub use threading::{build_threads, tag_and_merge, thread_mailbox};
