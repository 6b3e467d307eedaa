//! Mail panel actions
//!
//! High-level handlers for read-state and lifecycle mutations
//! (mark read/unread, archive, trash) against the external store,
//! applied optimistically to the local cache.

mod gateway;
mod handler;

pub use gateway::{GatewayError, MailGateway};
pub use handler::ActionHandler;
