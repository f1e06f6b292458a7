//! Flat bucketing: a fixed-width character prefix selects the bucket.
//!
//! Words sharing their first `N` characters share a bucket, so the index is a
//! hash map from short prefixes to record lists. Words shorter than `N` use
//! the whole word as their key. The empty key is valid here: it names the
//! degenerate single global bucket (reachable only through decoded addresses,
//! since no non-empty word transforms to it).

use crate::{
    index::{Index, Record},
    store::Error,
};
use std::collections::{BTreeMap, HashMap};

/// The initial capacity of the internal hashmap. This is a guess at the number
/// of distinct prefixes we will encounter. The hashmap will grow as needed,
/// but this is a good starting point (covering a full single-byte prefix
/// range).
const INITIAL_CAPACITY: usize = 256;

/// Buckets records by the first `N` characters of the word.
#[derive(Debug)]
pub struct Flat<const N: usize> {
    map: HashMap<String, Vec<Record>>,
}

impl<const N: usize> Flat<N> {
    /// Create an empty index.
    pub fn new() -> Self {
        const {
            assert!(N > 0, "prefix width must be nonzero");
        };
        Self {
            map: HashMap::with_capacity(INITIAL_CAPACITY),
        }
    }
}

// Default must route through new() so the width assert runs.
impl<const N: usize> Default for Flat<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Index for Flat<N> {
    fn transform(&self, word: &str) -> String {
        word.chars().take(N).collect()
    }

    fn locate(&mut self, key: &str) -> Result<&mut Vec<Record>, Error> {
        Ok(self.map.entry(key.to_string()).or_default())
    }

    fn find(&self, key: &str) -> Option<&[Record]> {
        self.map.get(key).map(Vec::as_slice)
    }

    fn len(&self) -> usize {
        self.map.values().filter(|bucket| !bucket.is_empty()).count()
    }

    fn buckets(&self) -> BTreeMap<String, Vec<Record>> {
        self.map
            .iter()
            .filter(|(_, bucket)| !bucket.is_empty())
            .map(|(key, bucket)| (key.clone(), bucket.clone()))
            .collect()
    }

    fn restore(&mut self, buckets: BTreeMap<String, Vec<Record>>) -> Result<(), Error> {
        for key in buckets.keys() {
            // A key wider than the prefix width could never have been produced
            // by transform, so later lookups through fresh addresses would
            // miss it.
            if key.chars().count() > N {
                return Err(Error::InvalidKey(key.clone()));
            }
        }
        self.map = buckets.into_iter().collect();
        Ok(())
    }
}
