//! Trie bucketing: the full word is the bucket key.
//!
//! Each character of the key selects a child node; the node reached by the
//! final character owns the record list. Every node holds at most one child
//! per character, so distinct words always reach distinct nodes and a bucket
//! holds more than one record only when forged through restore.
//!
//! The empty key is structurally impossible here (there is no character to
//! traverse), so [Index::locate] rejects it with [Error::InvalidKey].

use crate::{
    index::{Index, Record},
    store::Error,
};
use std::collections::BTreeMap;

#[derive(Default, Debug)]
struct Node {
    children: BTreeMap<char, Node>,
    records: Vec<Record>,
}

impl Node {
    /// Walk `key`, creating one node per character, and return the terminal node.
    fn walk_mut(&mut self, key: &str) -> &mut Node {
        let mut node = self;
        for ch in key.chars() {
            node = node.children.entry(ch).or_default();
        }
        node
    }

    fn walk(&self, key: &str) -> Option<&Node> {
        let mut node = self;
        for ch in key.chars() {
            node = node.children.get(&ch)?;
        }
        Some(node)
    }

    fn occupied(&self) -> usize {
        let here = usize::from(!self.records.is_empty());
        here + self.children.values().map(Node::occupied).sum::<usize>()
    }

    fn collect(&self, path: &mut String, out: &mut BTreeMap<String, Vec<Record>>) {
        if !self.records.is_empty() {
            out.insert(path.clone(), self.records.clone());
        }
        for (ch, child) in &self.children {
            path.push(*ch);
            child.collect(path, out);
            path.pop();
        }
    }
}

/// Buckets records at the node reached by walking the whole word.
#[derive(Default, Debug)]
pub struct Trie {
    root: Node,
}

impl Trie {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Index for Trie {
    fn transform(&self, word: &str) -> String {
        word.to_string()
    }

    fn locate(&mut self, key: &str) -> Result<&mut Vec<Record>, Error> {
        if key.is_empty() {
            return Err(Error::InvalidKey(key.to_string()));
        }
        Ok(&mut self.root.walk_mut(key).records)
    }

    fn find(&self, key: &str) -> Option<&[Record]> {
        if key.is_empty() {
            return None;
        }
        self.root.walk(key).map(|node| node.records.as_slice())
    }

    fn len(&self) -> usize {
        self.root.occupied()
    }

    fn buckets(&self) -> BTreeMap<String, Vec<Record>> {
        let mut out = BTreeMap::new();
        self.root.collect(&mut String::new(), &mut out);
        out
    }

    fn restore(&mut self, buckets: BTreeMap<String, Vec<Record>>) -> Result<(), Error> {
        // Build the replacement tree fully before adopting it, so a rejected
        // key leaves the current contents untouched.
        let mut root = Node::default();
        for (key, records) in buckets {
            if key.is_empty() {
                return Err(Error::InvalidKey(key));
            }
            root.walk_mut(&key).records = records;
        }
        self.root = root;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocator::Id;

    fn record(sequence: u64, text: &str) -> Record {
        Record {
            id: Id::new(sequence),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_transform_is_identity() {
        let index = Trie::new();
        assert_eq!(index.transform("bath"), "bath");
    }

    #[test]
    fn test_empty_key_invalid() {
        let mut index = Trie::new();
        assert!(matches!(index.locate(""), Err(Error::InvalidKey(_))));
        assert!(index.find("").is_none());
    }

    #[test]
    fn test_nested_words_use_distinct_buckets() {
        let mut index = Trie::new();
        index.locate("bat").unwrap().push(record(1, "bat"));
        index.locate("bath").unwrap().push(record(2, "bath"));

        assert_eq!(index.len(), 2);
        assert_eq!(index.find("bat").unwrap(), [record(1, "bat")]);
        assert_eq!(index.find("bath").unwrap(), [record(2, "bath")]);

        // Clearing the parent word's bucket leaves the longer word reachable.
        index.locate("bat").unwrap().clear();
        assert_eq!(index.len(), 1);
        assert_eq!(index.find("bath").unwrap(), [record(2, "bath")]);
    }

    #[test]
    fn test_find_stops_at_missing_node() {
        let mut index = Trie::new();
        index.locate("bat").unwrap().push(record(1, "bat"));
        assert!(index.find("bathe").is_none());
        // Interior nodes exist but hold no records.
        assert!(index.find("ba").unwrap().is_empty());
    }

    #[test]
    fn test_buckets_reconstruct_paths() {
        let mut index = Trie::new();
        index.locate("bat").unwrap().push(record(1, "bat"));
        index.locate("bäter").unwrap().push(record(2, "bäter"));

        let buckets = index.buckets();
        assert_eq!(
            buckets.keys().map(String::as_str).collect::<Vec<_>>(),
            ["bat", "bäter"]
        );
    }

    #[test]
    fn test_restore_rejects_empty_key_atomically() {
        let mut index = Trie::new();
        index.locate("bat").unwrap().push(record(1, "bat"));

        let buckets = BTreeMap::from([
            ("".to_string(), vec![record(2, "dog")]),
            ("cat".to_string(), vec![record(3, "cat")]),
        ]);
        assert!(matches!(
            index.restore(buckets),
            Err(Error::InvalidKey(key)) if key.is_empty()
        ));

        // The failed restore adopted nothing.
        assert_eq!(index.find("bat").unwrap(), [record(1, "bat")]);
        assert!(index.find("cat").is_none());
    }
}
