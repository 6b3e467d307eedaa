//! Message models: raw records from the mail-fetch collaborator and
//! the direction-tagged form the thread builder consumes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a stored message record
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

impl MessageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for MessageId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for MessageId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Whether a record came from the received or the sent collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Inbound,
    Outbound,
}

/// An email address with optional display name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailAddress {
    /// Display name (e.g., "Ada Rossi")
    pub name: Option<String>,
    /// Email address (e.g., "ada@example.com")
    pub email: String,
}

impl EmailAddress {
    /// Create a new email address with just the email
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            name: None,
            email: email.into(),
        }
    }

    /// Create a new email address with a display name
    pub fn with_name(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            email: email.into(),
        }
    }

    /// Parse an email address from a string like "Ada Rossi <ada@example.com>"
    pub fn parse(s: &str) -> Self {
        let s = s.trim();

        if let Some(open) = s.rfind('<')
            && let Some(close) = s.rfind('>')
            && open < close
        {
            let name = s[..open].trim();
            let email = s[open + 1..close].trim();
            return Self {
                name: (!name.is_empty()).then(|| name.to_string()),
                email: email.to_string(),
            };
        }

        Self {
            name: None,
            email: s.to_string(),
        }
    }

    /// Format the email address for display
    pub fn display(&self) -> String {
        match &self.name {
            Some(name) => format!("{} <{}>", name, self.email),
            None => self.email.clone(),
        }
    }
}

/// A raw message record as supplied by the mail-fetch collaborator.
///
/// Linkage fields are all optional: a record may carry none, one, or
/// several of `conversation_id`, `wire_message_id`, `in_reply_to`, and
/// `subject`. Fields the threading core does not understand survive in
/// `extra` and round-trip unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MailRecord {
    /// Store-level record id
    pub id: MessageId,
    /// Conversation id assigned by the originating system, when known
    pub conversation_id: Option<String>,
    /// Protocol-level Message-ID of this record
    pub wire_message_id: Option<String>,
    /// Message-ID of the record this one replies to
    pub in_reply_to: Option<String>,
    /// Subject line as stored
    pub subject: Option<String>,
    /// Server receipt time (inbound records)
    pub received_at: Option<DateTime<Utc>>,
    /// Actual send time (outbound records)
    pub sent_at: Option<DateTime<Utc>>,
    /// Record creation time; the timestamp of last resort
    pub created_at: DateTime<Utc>,
    /// Read flag as last known from the store
    #[serde(default)]
    pub is_read: bool,
    /// Sender address
    pub from: EmailAddress,
    /// Recipients (To field)
    #[serde(default)]
    pub to: Vec<EmailAddress>,
    /// Plain text preview of the body
    #[serde(default)]
    pub body_preview: String,
    /// Collaborator fields opaque to the threading core
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl MailRecord {
    /// Create a new record builder
    pub fn builder(id: MessageId) -> MailRecordBuilder {
        MailRecordBuilder::new(id)
    }
}

/// Builder for creating MailRecord instances
pub struct MailRecordBuilder {
    id: MessageId,
    conversation_id: Option<String>,
    wire_message_id: Option<String>,
    in_reply_to: Option<String>,
    subject: Option<String>,
    received_at: Option<DateTime<Utc>>,
    sent_at: Option<DateTime<Utc>>,
    created_at: Option<DateTime<Utc>>,
    is_read: bool,
    from: Option<EmailAddress>,
    to: Vec<EmailAddress>,
    body_preview: String,
    extra: serde_json::Map<String, serde_json::Value>,
}

impl MailRecordBuilder {
    fn new(id: MessageId) -> Self {
        Self {
            id,
            conversation_id: None,
            wire_message_id: None,
            in_reply_to: None,
            subject: None,
            received_at: None,
            sent_at: None,
            created_at: None,
            is_read: false,
            from: None,
            to: Vec::new(),
            body_preview: String::new(),
            extra: serde_json::Map::new(),
        }
    }

    pub fn conversation_id(mut self, id: impl Into<String>) -> Self {
        self.conversation_id = Some(id.into());
        self
    }

    pub fn wire_message_id(mut self, id: impl Into<String>) -> Self {
        self.wire_message_id = Some(id.into());
        self
    }

    pub fn in_reply_to(mut self, id: impl Into<String>) -> Self {
        self.in_reply_to = Some(id.into());
        self
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn received_at(mut self, at: DateTime<Utc>) -> Self {
        self.received_at = Some(at);
        self
    }

    pub fn sent_at(mut self, at: DateTime<Utc>) -> Self {
        self.sent_at = Some(at);
        self
    }

    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(at);
        self
    }

    pub fn is_read(mut self, is_read: bool) -> Self {
        self.is_read = is_read;
        self
    }

    pub fn from(mut self, from: EmailAddress) -> Self {
        self.from = Some(from);
        self
    }

    pub fn to(mut self, to: Vec<EmailAddress>) -> Self {
        self.to = to;
        self
    }

    pub fn body_preview(mut self, body_preview: impl Into<String>) -> Self {
        self.body_preview = body_preview.into();
        self
    }

    pub fn extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    pub fn build(self) -> MailRecord {
        MailRecord {
            id: self.id,
            conversation_id: self.conversation_id,
            wire_message_id: self.wire_message_id,
            in_reply_to: self.in_reply_to,
            subject: self.subject,
            received_at: self.received_at,
            sent_at: self.sent_at,
            created_at: self.created_at.unwrap_or_else(Utc::now),
            is_read: self.is_read,
            from: self
                .from
                .unwrap_or_else(|| EmailAddress::new("unknown@unknown.invalid")),
            to: self.to,
            body_preview: self.body_preview,
            extra: self.extra,
        }
    }
}

/// A record tagged with its direction and the effective timestamp used
/// for all ordering decisions.
///
/// The fallback chain differs by direction: inbound prefers the server
/// receipt time, outbound the actual send time, and both fall back to
/// the record creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadMessage {
    pub direction: Direction,
    /// Ordering timestamp resolved at tagging time
    pub effective_at: DateTime<Utc>,
    #[serde(flatten)]
    pub record: MailRecord,
}

impl ThreadMessage {
    /// Tag a raw record with its direction, resolving the effective timestamp
    pub fn tag(record: MailRecord, direction: Direction) -> Self {
        let effective_at = match direction {
            Direction::Inbound => record.received_at.unwrap_or(record.created_at),
            Direction::Outbound => record.sent_at.unwrap_or(record.created_at),
        };
        Self {
            direction,
            effective_at,
            record,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_parse_email_with_name() {
        let addr = EmailAddress::parse("Ada Rossi <ada@example.com>");
        assert_eq!(addr.name, Some("Ada Rossi".to_string()));
        assert_eq!(addr.email, "ada@example.com");
    }

    #[test]
    fn test_parse_email_without_name() {
        let addr = EmailAddress::parse("ada@example.com");
        assert_eq!(addr.name, None);
        assert_eq!(addr.email, "ada@example.com");
    }

    #[test]
    fn test_parse_email_with_angle_brackets_no_name() {
        let addr = EmailAddress::parse("<ada@example.com>");
        assert_eq!(addr.name, None);
        assert_eq!(addr.email, "ada@example.com");
    }

    #[test]
    fn test_display_with_name() {
        let addr = EmailAddress::with_name("Ada Rossi", "ada@example.com");
        assert_eq!(addr.display(), "Ada Rossi <ada@example.com>");
    }

    #[test]
    fn test_inbound_prefers_receipt_time() {
        let record = MailRecord::builder(MessageId::new("r1"))
            .received_at(at(10))
            .sent_at(at(11))
            .created_at(at(12))
            .build();
        let tagged = ThreadMessage::tag(record, Direction::Inbound);
        assert_eq!(tagged.effective_at, at(10));
    }

    #[test]
    fn test_outbound_prefers_send_time() {
        let record = MailRecord::builder(MessageId::new("s1"))
            .received_at(at(10))
            .sent_at(at(11))
            .created_at(at(12))
            .build();
        let tagged = ThreadMessage::tag(record, Direction::Outbound);
        assert_eq!(tagged.effective_at, at(11));
    }

    #[test]
    fn test_tagging_falls_back_to_creation_time() {
        let record = MailRecord::builder(MessageId::new("r1"))
            .created_at(at(9))
            .build();
        let inbound = ThreadMessage::tag(record.clone(), Direction::Inbound);
        let outbound = ThreadMessage::tag(record, Direction::Outbound);
        assert_eq!(inbound.effective_at, at(9));
        assert_eq!(outbound.effective_at, at(9));
    }

    #[test]
    fn test_extra_fields_round_trip() {
        let record = MailRecord::builder(MessageId::new("r1"))
            .created_at(at(9))
            .extra("rental_id", serde_json::json!(42))
            .build();

        let json = serde_json::to_string(&record).unwrap();
        let back: MailRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.extra.get("rental_id"), Some(&serde_json::json!(42)));
    }
}
