//! Bucketed record storage, parameterized by a bucketing strategy.
//!
//! Every word maps to a bucket key via [Index::transform]; the bucket holds the
//! ordered list of [Record]s whose key it is. Two strategies implement the same
//! abstraction:
//!
//! - [Flat]: a fixed-width character prefix, so the index degenerates into a
//!   hash map over short prefixes.
//! - [Trie]: the full word walked character-by-character through nested nodes,
//!   so the index degenerates into a classic trie whose terminal node owns the
//!   record list.
//!
//! # Warning
//!
//! If the strategy maps many words to the same bucket, lookups degrade to a
//! linear scan of that bucket (each conflicting record may contain the desired
//! identifier).

pub mod flat;
pub mod trie;

pub use flat::Flat;
pub use trie::Trie;

use crate::{allocator::Id, store::Error};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single record, owned exclusively by the bucket that contains it.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Record {
    /// Stable identifier, immutable across updates.
    pub id: Id,
    /// Current text value, replaced in place by updates.
    pub text: String,
}

/// A bucketing strategy together with the structure it indexes.
///
/// Implementations own every record list; the engine reaches them only through
/// [Index::locate] and [Index::find].
pub trait Index {
    /// Derive the bucket key under which `word` is stored.
    fn transform(&self, word: &str) -> String;

    /// Mutable access to the bucket for `key`, creating structure as needed.
    ///
    /// Fails with [Error::InvalidKey] when the key is structurally impossible
    /// for the strategy (e.g. an empty key under [Trie]).
    fn locate(&mut self, key: &str) -> Result<&mut Vec<Record>, Error>;

    /// Read-only access to the bucket for `key`, or `None` when absent.
    ///
    /// Never creates structure: failed reads must not pollute the index with
    /// empty nodes.
    fn find(&self, key: &str) -> Option<&[Record]>;

    /// Number of buckets currently holding at least one record.
    fn len(&self) -> usize;

    /// Whether no bucket holds a record.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Serializable view of every non-empty bucket.
    fn buckets(&self) -> BTreeMap<String, Vec<Record>>;

    /// Replace the index contents wholesale from a serialized bucket map.
    ///
    /// Atomic: either every bucket is adopted or the index is left untouched.
    /// Fails with [Error::InvalidKey] on keys the strategy could never have
    /// produced.
    fn restore(&mut self, buckets: BTreeMap<String, Vec<Record>>) -> Result<(), Error>;
}
