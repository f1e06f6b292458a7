//! Serializable engine state.
//!
//! A [Snapshot] is the plain structure produced by
//! [crate::store::Store::snapshot] and consumed by
//! [crate::store::Store::restore]: every non-empty bucket plus the allocator
//! state. The engine defines this schema; persistence adapters (like
//! [crate::disk]) define the medium.
//!
//! Maps are ordered so the serialized form is deterministic: snapshotting the
//! same state twice yields byte-identical output.

use crate::{
    address::SEPARATOR,
    allocator::{Id, INITIAL_SEQUENCE},
    index::Record,
    store::Error,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// The allocator's portion of a snapshot.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct AllocatorState {
    /// The next sequence number to issue.
    pub next: u64,
    /// Every text ever allocated, with the identifier it received.
    pub assigned: BTreeMap<String, Id>,
}

/// The full serializable state of a record store.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Snapshot {
    /// Every non-empty bucket, keyed by bucket key.
    pub buckets: BTreeMap<String, Vec<Record>>,
    /// The allocator state, carried so a restored store keeps issuing fresh,
    /// non-colliding identifiers.
    pub allocator: AllocatorState,
}

impl Snapshot {
    /// Check structural integrity.
    ///
    /// Restore refuses a snapshot that fails any of these checks rather than
    /// partially applying it:
    /// - the next sequence number is below the initial value;
    /// - an identifier (in a bucket or the allocator) is at or above the next
    ///   sequence number, so a restored allocator would re-issue it;
    /// - an identifier appears twice (within a bucket, across buckets, or
    ///   against two allocator texts);
    /// - a record's text is empty, or any text or bucket key contains the
    ///   reserved address separator.
    ///
    /// Strategy-specific key checks (empty keys under the trie, overwide keys
    /// under a flat prefix) are left to the index being restored into.
    pub fn validate(&self) -> Result<(), Error> {
        let corrupt = |reason: &str| Error::CorruptSnapshot(reason.to_string());
        if self.allocator.next < INITIAL_SEQUENCE {
            return Err(corrupt("next sequence below initial value"));
        }
        let bound = Id::new(self.allocator.next);

        let mut stored = HashSet::new();
        for (key, records) in &self.buckets {
            if key.contains(SEPARATOR) {
                return Err(corrupt("bucket key contains reserved separator"));
            }
            for record in records {
                if record.text.is_empty() {
                    return Err(corrupt("record text empty"));
                }
                if record.text.contains(SEPARATOR) {
                    return Err(corrupt("record text contains reserved separator"));
                }
                if record.id >= bound {
                    return Err(corrupt("record identifier at or above next sequence"));
                }
                if !stored.insert(record.id) {
                    return Err(corrupt("duplicate record identifier"));
                }
            }
        }

        let mut assigned = HashSet::new();
        for (text, id) in &self.allocator.assigned {
            if text.is_empty() || text.contains(SEPARATOR) {
                return Err(corrupt("allocated text empty or contains reserved separator"));
            }
            if *id >= bound {
                return Err(corrupt("allocated identifier at or above next sequence"));
            }
            if !assigned.insert(*id) {
                return Err(corrupt("identifier assigned to multiple texts"));
            }
        }
        Ok(())
    }
}
