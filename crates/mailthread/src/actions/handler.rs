//! Action handler for mail panel operations
//!
//! Coordinates between the external message store and the local cache.

use anyhow::{Context, Result};
use log::{info, warn};
use std::sync::Arc;

use super::MailGateway;
use crate::cache::MailCache;
use crate::models::{MessageId, Thread};

/// Handler for read-state and lifecycle actions.
///
/// Actions are performed optimistically:
/// 1. Mutate the local cache so the UI updates immediately.
/// 2. Fire the mutation at the external store.
/// 3. On failure, mark the touched collections stale; the fetch
///    collaborator refetches them and the next threading build shows
///    the corrected state.
///
/// Concurrent actions race at the store, not here; last write wins.
pub struct ActionHandler {
    gateway: Arc<dyn MailGateway>,
    cache: Arc<MailCache>,
}

impl ActionHandler {
    /// Create a new action handler
    pub fn new(gateway: Arc<dyn MailGateway>, cache: Arc<MailCache>) -> Self {
        Self { gateway, cache }
    }

    /// Set the read flag on individual messages
    pub fn set_read(&self, ids: &[MessageId], is_read: bool) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }

        info!(
            "Marking {} message(s) as {}",
            ids.len(),
            if is_read { "read" } else { "unread" }
        );

        let touched = self.cache.set_read(ids, is_read);
        if let Err(err) = self.gateway.set_read(ids, is_read) {
            for direction in touched {
                self.cache.invalidate(direction);
            }
            warn!("Read-state update failed, collections marked stale: {err}");
            return Err(err).context("failed to update read state");
        }
        Ok(())
    }

    /// Mark every message in a thread as read or unread
    pub fn mark_thread_read(&self, thread: &Thread, is_read: bool) -> Result<()> {
        self.set_read(&Self::message_ids(thread), is_read)
    }

    /// Toggle the read state of a thread.
    ///
    /// A thread with any unread message becomes read; a fully read
    /// thread becomes unread. Returns the new state.
    pub fn toggle_thread_read(&self, thread: &Thread) -> Result<bool> {
        let new_is_read = thread.is_unread();
        self.mark_thread_read(thread, new_is_read)?;
        Ok(new_is_read)
    }

    /// Archive a thread (remove it from the panel)
    pub fn archive_thread(&self, thread: &Thread) -> Result<()> {
        let ids = Self::message_ids(thread);
        info!("Archiving thread {} ({} messages)", thread.id, ids.len());

        let touched = self.cache.remove(&ids);
        if let Err(err) = self.gateway.archive(&ids) {
            for direction in touched {
                self.cache.invalidate(direction);
            }
            warn!("Archive failed for thread {}, collections marked stale", thread.id);
            return Err(err).context("failed to archive thread");
        }
        Ok(())
    }

    /// Move a thread to trash
    pub fn trash_thread(&self, thread: &Thread) -> Result<()> {
        let ids = Self::message_ids(thread);
        info!("Trashing thread {} ({} messages)", thread.id, ids.len());

        let touched = self.cache.remove(&ids);
        if let Err(err) = self.gateway.trash(&ids) {
            for direction in touched {
                self.cache.invalidate(direction);
            }
            warn!("Trash failed for thread {}, collections marked stale", thread.id);
            return Err(err).context("failed to trash thread");
        }
        Ok(())
    }

    fn message_ids(thread: &Thread) -> Vec<MessageId> {
        thread.messages.iter().map(|m| m.record.id.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::GatewayError;
    use crate::models::{Direction, MailRecord};
    use crate::threading::thread_mailbox;
    use chrono::{TimeZone, Utc};
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Gateway stub that can be switched into a failing mode
    struct StubGateway {
        fail: AtomicBool,
    }

    impl StubGateway {
        fn new() -> Self {
            Self {
                fail: AtomicBool::new(false),
            }
        }

        fn result(&self) -> Result<(), GatewayError> {
            if self.fail.load(Ordering::SeqCst) {
                Err(GatewayError::Unavailable("stub offline".to_string()))
            } else {
                Ok(())
            }
        }
    }

    impl MailGateway for StubGateway {
        fn set_read(&self, _ids: &[MessageId], _is_read: bool) -> Result<(), GatewayError> {
            self.result()
        }

        fn archive(&self, _ids: &[MessageId]) -> Result<(), GatewayError> {
            self.result()
        }

        fn trash(&self, _ids: &[MessageId]) -> Result<(), GatewayError> {
            self.result()
        }
    }

    fn make_record(id: &str, hour: u32) -> MailRecord {
        MailRecord::builder(MessageId::new(id))
            .conversation_id("c1")
            .received_at(Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap())
            .created_at(Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap())
            .build()
    }

    fn setup() -> (Arc<StubGateway>, Arc<MailCache>, ActionHandler, Thread) {
        let gateway = Arc::new(StubGateway::new());
        let cache = Arc::new(MailCache::new());
        cache.replace(
            Direction::Inbound,
            vec![make_record("r1", 10), make_record("r2", 11)],
        );

        let (inbound, outbound) = cache.snapshot();
        let thread = thread_mailbox(&inbound, &outbound).remove(0);

        let handler = ActionHandler::new(gateway.clone(), cache.clone());
        (gateway, cache, handler, thread)
    }

    #[test]
    fn test_mark_thread_read_updates_cache() {
        let (_gateway, cache, handler, thread) = setup();

        handler.mark_thread_read(&thread, true).unwrap();

        let (inbound, _) = cache.snapshot();
        assert!(inbound.iter().all(|r| r.is_read));
        assert!(cache.stale_directions().is_empty());
    }

    #[test]
    fn test_failed_mutation_marks_cache_stale() {
        let (gateway, cache, handler, thread) = setup();
        gateway.fail.store(true, Ordering::SeqCst);

        let result = handler.mark_thread_read(&thread, true);
        assert!(result.is_err());

        // Optimistic mutation already happened; the stale flag forces
        // the refetch that rolls it back.
        assert_eq!(cache.stale_directions(), vec![Direction::Inbound]);
    }

    #[test]
    fn test_archive_removes_thread_from_cache() {
        let (_gateway, cache, handler, thread) = setup();

        handler.archive_thread(&thread).unwrap();

        let (inbound, _) = cache.snapshot();
        assert!(inbound.is_empty());
    }

    #[test]
    fn test_failed_archive_invalidates() {
        let (gateway, cache, handler, thread) = setup();
        gateway.fail.store(true, Ordering::SeqCst);

        assert!(handler.archive_thread(&thread).is_err());
        assert_eq!(cache.stale_directions(), vec![Direction::Inbound]);
    }

    #[test]
    fn test_toggle_thread_read() {
        let (_gateway, cache, handler, thread) = setup();

        // Thread starts unread, so the toggle marks it read.
        assert!(handler.toggle_thread_read(&thread).unwrap());

        let (inbound, outbound) = cache.snapshot();
        let thread = thread_mailbox(&inbound, &outbound).remove(0);
        assert!(!thread.is_unread());

        // And back.
        assert!(!handler.toggle_thread_read(&thread).unwrap());
    }
}
