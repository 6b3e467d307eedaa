//! Compose prefill for reply and forward
//!
//! Display-facing subject prefixing. Unlike the normalizer this keeps
//! the subject's original casing and only guards against double
//! prefixing.

use crate::models::{EmailAddress, ThreadMessage};

/// Prefilled fields handed to the compose collaborator
#[derive(Debug, Clone, PartialEq)]
pub struct ComposePrefill {
    pub to: Vec<EmailAddress>,
    pub subject: String,
    pub body: String,
}

/// Prefill a reply to the given message
pub fn reply_prefill(message: &ThreadMessage) -> ComposePrefill {
    ComposePrefill {
        to: vec![message.record.from.clone()],
        subject: prefixed_subject("Re:", message.record.subject.as_deref()),
        body: quoted_body(message),
    }
}

/// Prefill a forward of the given message; the recipient is left empty
pub fn forward_prefill(message: &ThreadMessage) -> ComposePrefill {
    ComposePrefill {
        to: Vec::new(),
        subject: prefixed_subject("Fwd:", message.record.subject.as_deref()),
        body: quoted_body(message),
    }
}

/// Prepend `prefix` unless the subject already starts with it
/// (case-insensitively), so "Re: Re: ..." chains don't grow.
fn prefixed_subject(prefix: &str, subject: Option<&str>) -> String {
    let subject = subject.unwrap_or("").trim();
    let already = subject
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix));
    if already {
        subject.to_string()
    } else if subject.is_empty() {
        prefix.to_string()
    } else {
        format!("{prefix} {subject}")
    }
}

fn quoted_body(message: &ThreadMessage) -> String {
    let header = format!(
        "On {}, {} wrote:",
        message.effective_at.format("%Y-%m-%d %H:%M"),
        message.record.from.display()
    );
    let quoted: String = message
        .record
        .body_preview
        .lines()
        .map(|line| format!("> {line}\n"))
        .collect();
    format!("\n\n{header}\n{quoted}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Direction, MailRecord, MessageId};
    use chrono::{TimeZone, Utc};

    fn make_message(subject: Option<&str>) -> ThreadMessage {
        let mut builder = MailRecord::builder(MessageId::new("m1"))
            .from(EmailAddress::with_name("Ada Rossi", "ada@example.com"))
            .body_preview("First line\nSecond line")
            .received_at(Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap())
            .created_at(Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap());
        if let Some(subject) = subject {
            builder = builder.subject(subject);
        }
        ThreadMessage::tag(builder.build(), Direction::Inbound)
    }

    #[test]
    fn test_reply_prefixes_subject_once() {
        let prefill = reply_prefill(&make_message(Some("Quote request")));
        assert_eq!(prefill.subject, "Re: Quote request");

        let prefill = reply_prefill(&make_message(Some("Re: Quote request")));
        assert_eq!(prefill.subject, "Re: Quote request");

        let prefill = reply_prefill(&make_message(Some("RE: Quote request")));
        assert_eq!(prefill.subject, "RE: Quote request");
    }

    #[test]
    fn test_reply_targets_sender() {
        let prefill = reply_prefill(&make_message(Some("Quote")));
        assert_eq!(prefill.to.len(), 1);
        assert_eq!(prefill.to[0].email, "ada@example.com");
    }

    #[test]
    fn test_forward_prefix_and_empty_recipient() {
        let prefill = forward_prefill(&make_message(Some("Quote request")));
        assert_eq!(prefill.subject, "Fwd: Quote request");
        assert!(prefill.to.is_empty());
    }

    #[test]
    fn test_missing_subject() {
        let prefill = reply_prefill(&make_message(None));
        assert_eq!(prefill.subject, "Re:");
    }

    #[test]
    fn test_quoted_body() {
        let prefill = reply_prefill(&make_message(Some("Quote")));
        assert!(prefill.body.contains("Ada Rossi <ada@example.com> wrote:"));
        assert!(prefill.body.contains("> First line\n> Second line\n"));
    }
}
