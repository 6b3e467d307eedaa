//! Conversation reconstruction from unordered message records
//!
//! Rebuilds the full thread list on every refresh from whatever
//! snapshot of the received/sent collections is currently cached. The
//! build is a pure function of its inputs: no persisted cluster state,
//! no I/O, and a deterministic input set always yields the same
//! partition with the same thread ids.
//!
//! Linkage signals, strongest first:
//! 1. an explicit conversation id shared with other records,
//! 2. an `In-Reply-To` reference to an already-placed record,
//! 3. a matching normalized subject.

use indexmap::IndexMap;
use log::debug;
use std::collections::HashMap;

use crate::models::{Direction, MailRecord, Thread, ThreadId, ThreadMessage};
use crate::subject::normalize_subject_with;

/// Build the thread list for the mail panel.
///
/// Convenience wrapper over [`tag_and_merge`] and [`build_threads`]
/// with no site-local subject markers.
pub fn thread_mailbox(inbound: &[MailRecord], outbound: &[MailRecord]) -> Vec<Thread> {
    build_threads(tag_and_merge(inbound, outbound), &[])
}

/// Tag each record with its direction and effective timestamp, then
/// merge the two collections into one sequence.
///
/// Inbound records come first; the builder re-sorts, so merge order
/// only decides ties. Duplicate ids across the two inputs are kept as
/// two distinct records.
pub fn tag_and_merge(inbound: &[MailRecord], outbound: &[MailRecord]) -> Vec<ThreadMessage> {
    let mut merged = Vec::with_capacity(inbound.len() + outbound.len());
    merged.extend(
        inbound
            .iter()
            .cloned()
            .map(|r| ThreadMessage::tag(r, Direction::Inbound)),
    );
    merged.extend(
        outbound
            .iter()
            .cloned()
            .map(|r| ThreadMessage::tag(r, Direction::Outbound)),
    );
    merged
}

/// Group tagged messages into threads.
///
/// Two passes over the input. Pass 1 places every record that carries a
/// conversation id and indexes its wire message id and normalized
/// subject. Pass 2 streams over the orphans in input order, resolving
/// each against the reply index, then the subject index, and otherwise
/// opening a virtual thread; the indexes are updated after every
/// placement so later orphans chain onto threads opened during the same
/// pass. Assembly sorts each thread chronologically and the final list
/// by latest activity, newest first.
pub fn build_threads(tagged: Vec<ThreadMessage>, extra_markers: &[String]) -> Vec<Thread> {
    let total = tagged.len();

    // All state is scoped to this call. Buckets are insertion-ordered
    // so the final stable sort is reproducible across rebuilds.
    let mut buckets: IndexMap<ThreadId, Vec<ThreadMessage>> = IndexMap::new();
    let mut by_wire_id: HashMap<String, ThreadId> = HashMap::new();
    let mut by_subject: HashMap<String, ThreadId> = HashMap::new();

    // Pass 1: strong links. Subject index is last-write-wins; a later
    // strong record with the same subject legitimately retargets the
    // weak-link fallback.
    let mut orphans = Vec::new();
    for message in tagged {
        let Some(conversation_id) = message
            .record
            .conversation_id
            .as_deref()
            .filter(|id| !id.is_empty())
        else {
            orphans.push(message);
            continue;
        };

        let thread_id = ThreadId::Conversation(conversation_id.to_string());
        index_message(&message, &thread_id, extra_markers, &mut by_wire_id, &mut by_subject);
        buckets.entry(thread_id).or_default().push(message);
    }

    // Pass 2: weak links, streaming in input order. Resolution order
    // matters: a reply reference beats a subject match.
    for message in orphans {
        let subject_key = normalize_subject_with(message.record.subject.as_deref(), extra_markers);

        let thread_id = message
            .record
            .in_reply_to
            .as_deref()
            .and_then(|reply_to| by_wire_id.get(reply_to).cloned())
            .or_else(|| {
                (!subject_key.is_empty())
                    .then(|| by_subject.get(&subject_key).cloned())
                    .flatten()
            })
            .unwrap_or_else(|| {
                if subject_key.is_empty() {
                    ThreadId::Message(message.record.id.0.clone())
                } else {
                    ThreadId::Subject(subject_key.clone())
                }
            });

        index_message(&message, &thread_id, extra_markers, &mut by_wire_id, &mut by_subject);
        buckets.entry(thread_id).or_default().push(message);
    }

    // Assembly: chronological within each thread, newest thread first.
    // Both sorts are stable so equal timestamps keep input order.
    let mut threads: Vec<Thread> = buckets
        .into_iter()
        .map(|(id, mut messages)| {
            messages.sort_by(|a, b| a.effective_at.cmp(&b.effective_at));
            Thread { id, messages }
        })
        .collect();
    threads.sort_by(|a, b| b.last_message_at().cmp(&a.last_message_at()));

    debug!("Built {} threads from {} messages", threads.len(), total);
    threads
}

/// Record a placed message in both lookup indexes.
fn index_message(
    message: &ThreadMessage,
    thread_id: &ThreadId,
    extra_markers: &[String],
    by_wire_id: &mut HashMap<String, ThreadId>,
    by_subject: &mut HashMap<String, ThreadId>,
) {
    if let Some(wire_id) = message.record.wire_message_id.as_deref()
        && !wire_id.is_empty()
    {
        by_wire_id.insert(wire_id.to_string(), thread_id.clone());
    }
    let subject_key = normalize_subject_with(message.record.subject.as_deref(), extra_markers);
    if !subject_key.is_empty() {
        by_subject.insert(subject_key, thread_id.clone());
    }
}
