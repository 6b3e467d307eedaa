//! Cached snapshot of the received and sent collections
//!
//! The threading build is re-run against this cache on every refresh.
//! User actions mutate the cache optimistically; when the external
//! store rejects a mutation, the affected collection is marked stale so
//! the fetch collaborator refetches it and the next build corrects the
//! view.

use std::collections::HashSet;
use std::sync::RwLock;

use crate::models::{Direction, MailRecord, MessageId};

/// Thread-safe cache of the two message collections.
///
/// Uses `RwLock`-protected vectors; lock poisoning aborts the panel.
pub struct MailCache {
    inbound: RwLock<Vec<MailRecord>>,
    outbound: RwLock<Vec<MailRecord>>,
    stale: RwLock<HashSet<Direction>>,
}

impl MailCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self {
            inbound: RwLock::new(Vec::new()),
            outbound: RwLock::new(Vec::new()),
            stale: RwLock::new(HashSet::new()),
        }
    }

    /// Replace a collection with freshly fetched records, clearing its
    /// stale flag.
    pub fn replace(&self, direction: Direction, records: Vec<MailRecord>) {
        match direction {
            Direction::Inbound => *self.inbound.write().unwrap() = records,
            Direction::Outbound => *self.outbound.write().unwrap() = records,
        }
        self.stale.write().unwrap().remove(&direction);
    }

    /// Clone both collections for a threading build
    pub fn snapshot(&self) -> (Vec<MailRecord>, Vec<MailRecord>) {
        (
            self.inbound.read().unwrap().clone(),
            self.outbound.read().unwrap().clone(),
        )
    }

    /// Optimistically set the read flag on the given records.
    ///
    /// Returns the directions that contained at least one of the ids,
    /// so a failed store call can invalidate exactly those.
    pub fn set_read(&self, ids: &[MessageId], is_read: bool) -> Vec<Direction> {
        let mut touched = Vec::new();
        if Self::apply(&mut self.inbound.write().unwrap(), ids, |r| {
            r.is_read = is_read;
        }) {
            touched.push(Direction::Inbound);
        }
        if Self::apply(&mut self.outbound.write().unwrap(), ids, |r| {
            r.is_read = is_read;
        }) {
            touched.push(Direction::Outbound);
        }
        touched
    }

    /// Optimistically remove records from the visible panel (archive
    /// and trash both take the record out of the cached collections).
    pub fn remove(&self, ids: &[MessageId]) -> Vec<Direction> {
        let wanted: HashSet<&str> = ids.iter().map(MessageId::as_str).collect();
        let mut touched = Vec::new();

        let mut inbound = self.inbound.write().unwrap();
        let before = inbound.len();
        inbound.retain(|r| !wanted.contains(r.id.as_str()));
        if inbound.len() != before {
            touched.push(Direction::Inbound);
        }
        drop(inbound);

        let mut outbound = self.outbound.write().unwrap();
        let before = outbound.len();
        outbound.retain(|r| !wanted.contains(r.id.as_str()));
        if outbound.len() != before {
            touched.push(Direction::Outbound);
        }

        touched
    }

    /// Mark a collection stale after a failed store mutation
    pub fn invalidate(&self, direction: Direction) {
        self.stale.write().unwrap().insert(direction);
    }

    /// Directions whose cached collection no longer matches the store.
    /// The fetch collaborator refetches these on the next cycle.
    pub fn stale_directions(&self) -> Vec<Direction> {
        let mut stale: Vec<Direction> = self.stale.read().unwrap().iter().copied().collect();
        stale.sort_by_key(|d| matches!(d, Direction::Outbound));
        stale
    }

    fn apply(records: &mut [MailRecord], ids: &[MessageId], mut f: impl FnMut(&mut MailRecord)) -> bool {
        let wanted: HashSet<&str> = ids.iter().map(MessageId::as_str).collect();
        let mut touched = false;
        for record in records.iter_mut() {
            if wanted.contains(record.id.as_str()) {
                f(record);
                touched = true;
            }
        }
        touched
    }
}

impl Default for MailCache {
    fn default() -> Self {
        Self::new()
    }
}
