//! External message-store collaborator

use thiserror::Error;

use crate::models::MessageId;

/// Errors surfaced by the external store.
///
/// Either way the optimistic local mutation must be rolled back by
/// refetching the affected collection.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The store could not be reached
    #[error("message store unavailable: {0}")]
    Unavailable(String),
    /// The store refused the mutation
    #[error("message store rejected the request: {0}")]
    Rejected(String),
}

/// Mutation interface of the external message store.
///
/// Implementations own the actual persistence (IMAP flags, database
/// rows); this crate only coordinates the calls with its cached view.
pub trait MailGateway: Send + Sync {
    /// Set the read flag on the given records, single or batch
    fn set_read(&self, ids: &[MessageId], is_read: bool) -> Result<(), GatewayError>;

    /// Archive the given records
    fn archive(&self, ids: &[MessageId]) -> Result<(), GatewayError>;

    /// Move the given records to trash (soft delete)
    fn trash(&self, ids: &[MessageId]) -> Result<(), GatewayError>;
}
