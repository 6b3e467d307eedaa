//! Domain models for the mail panel

mod message;
mod thread;

pub use message::{Direction, EmailAddress, MailRecord, MailRecordBuilder, MessageId, ThreadMessage};
pub use thread::{Thread, ThreadId};
