//! The record store engine.
//!
//! [Store] orchestrates one [Index] and one [Allocator] to implement insert,
//! prefix-scoped lookup, in-place update, and deletion, plus the
//! snapshot/restore pair consumed by persistence adapters. Every public
//! operation enters here; the engine owns all mutation and upholds the
//! address-stability contract: a record's address never changes until the
//! record is deleted, no matter how often its text is edited.
//!
//! The engine is single-threaded and non-suspending. Callers sharing a store
//! across threads must serialize access externally; correctness depends on
//! the allocate-locate-append sequence in [Store::insert] running without
//! interleaving.

use crate::{
    address::{Address, SEPARATOR},
    allocator::Allocator,
    index::{Index, Record},
    snapshot::{AllocatorState, Snapshot},
};
use prometheus_client::{
    metrics::{counter::Counter, gauge::Gauge},
    registry::Registry,
};
use thiserror::Error;
use tracing::{debug, trace};

/// Errors surfaced by the engine.
///
/// Absence is not an error: lookups return `Ok(None)` and deletes return
/// `Ok(false)` for well-formed addresses that resolve to nothing.
#[derive(Debug, Error)]
pub enum Error {
    /// Text that cannot be stored: empty, or containing the reserved
    /// address separator.
    #[error("invalid input text")]
    InvalidInput,
    /// A bucket key the chosen strategy could never produce.
    #[error("invalid bucket key: {0:?}")]
    InvalidKey(String),
    /// An address string that does not decode.
    #[error("malformed address: {0:?}")]
    MalformedAddress(String),
    /// A structurally invalid snapshot, refused before any state changed.
    #[error("corrupt snapshot: {0}")]
    CorruptSnapshot(String),
}

/// Reject text the engine cannot store.
fn validate(text: &str) -> Result<(), Error> {
    if text.is_empty() || text.contains(SEPARATOR) {
        return Err(Error::InvalidInput);
    }
    Ok(())
}

/// An in-process record store with stable addresses.
pub struct Store<I: Index> {
    index: I,
    allocator: Allocator,

    keys: Gauge,
    items: Gauge,
    collisions: Counter,
    pruned: Counter,
}

impl<I: Index> Store<I> {
    /// Create a new store over the given index, registering its metrics.
    ///
    /// When multiple stores share a registry, hand each one a
    /// [Registry::sub_registry_with_prefix] to keep metric names distinct.
    pub fn init(registry: &mut Registry, index: I) -> Self {
        let s = Self {
            index,
            allocator: Allocator::default(),
            keys: Gauge::default(),
            items: Gauge::default(),
            collisions: Counter::default(),
            pruned: Counter::default(),
        };
        registry.register(
            "keys",
            "Number of buckets holding at least one record",
            s.keys.clone(),
        );
        registry.register("items", "Number of records stored", s.items.clone());
        registry.register(
            "collisions",
            "Number of records appended to an occupied bucket",
            s.collisions.clone(),
        );
        registry.register("pruned", "Number of records deleted", s.pruned.clone());
        s
    }

    /// Number of records stored.
    pub fn len(&self) -> usize {
        self.items.get() as usize
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Store `text` and return its address.
    ///
    /// Re-inserting text that already has a record is a no-op returning the
    /// existing address. The returned address resolves back to this record
    /// until the record is deleted.
    pub fn insert(&mut self, text: &str) -> Result<Address, Error> {
        validate(text)?;
        let id = self.allocator.allocate(text);
        let key = self.index.transform(text);
        let bucket = self.index.locate(&key)?;
        if bucket.iter().any(|record| record.id == id) {
            return Ok(Address::new(key, id));
        }
        if bucket.is_empty() {
            self.keys.inc();
        } else {
            self.collisions.inc();
        }
        bucket.push(Record {
            id,
            text: text.to_string(),
        });
        self.items.inc();
        trace!(bucket = %key, %id, "inserted record");
        Ok(Address::new(key, id))
    }

    /// Resolve an address to its record's current text.
    ///
    /// Read-only: a failed lookup never creates index structure.
    pub fn get(&self, address: &str) -> Result<Option<&str>, Error> {
        let address: Address = address.parse()?;
        let Some(bucket) = self.index.find(address.bucket()) else {
            return Ok(None);
        };
        Ok(bucket
            .iter()
            .find(|record| record.id == address.id())
            .map(|record| record.text.as_str()))
    }

    /// Replace the text of the record at `address`, in place.
    ///
    /// The identifier and bucket location are preserved, so the returned
    /// address equals the input address: updating never relocates a record,
    /// even when the new text would map to a different bucket. The allocator
    /// memo is untouched (identifiers track original insertion text). Returns
    /// `Ok(None)` when no record exists at the address.
    pub fn update(&mut self, address: &str, text: &str) -> Result<Option<Address>, Error> {
        validate(text)?;
        let address: Address = address.parse()?;
        let bucket = self.index.locate(address.bucket())?;
        let Some(record) = bucket.iter_mut().find(|record| record.id == address.id()) else {
            return Ok(None);
        };
        record.text = text.to_string();
        trace!(bucket = %address.bucket(), id = %address.id(), "updated record");
        Ok(Some(address))
    }

    /// Remove the record at `address`, reporting whether one was removed.
    ///
    /// Sibling records in the same bucket keep their contents and relative
    /// order. Now-empty buckets are not pruned; remaining addresses stay
    /// valid either way.
    pub fn delete(&mut self, address: &str) -> Result<bool, Error> {
        let address: Address = address.parse()?;
        let bucket = self.index.locate(address.bucket())?;
        let Some(position) = bucket
            .iter()
            .position(|record| record.id == address.id())
        else {
            return Ok(false);
        };
        bucket.remove(position);
        if bucket.is_empty() {
            self.keys.dec();
        }
        self.items.dec();
        self.pruned.inc();
        trace!(bucket = %address.bucket(), id = %address.id(), "deleted record");
        Ok(true)
    }

    /// Produce the full serializable state of the store.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            buckets: self.index.buckets(),
            allocator: AllocatorState {
                next: self.allocator.next_sequence(),
                assigned: self
                    .allocator
                    .entries()
                    .map(|(text, id)| (text.to_string(), id))
                    .collect(),
            },
        }
    }

    /// Replace the store state wholesale from a snapshot.
    ///
    /// Structurally invalid input is refused with [Error::CorruptSnapshot]
    /// before any state changes; a failed restore leaves the store exactly as
    /// it was.
    pub fn restore(&mut self, snapshot: Snapshot) -> Result<(), Error> {
        snapshot.validate()?;
        let Snapshot { buckets, allocator } = snapshot;
        let records = buckets.values().map(Vec::len).sum::<usize>();
        self.index
            .restore(buckets)
            .map_err(|err| Error::CorruptSnapshot(err.to_string()))?;
        self.allocator.restore(allocator.next, allocator.assigned);
        self.keys.set(self.index.len() as i64);
        self.items.set(records as i64);
        debug!(records, "restored snapshot");
        Ok(())
    }
}
