//! Issue stable identifiers for record text.
//!
//! The [Allocator] hands out monotonically increasing sequence numbers, memoized
//! by text: allocating the same text twice returns the same [Id]. Identifiers are
//! never reused or recycled, even after the record they name is deleted, which is
//! what makes an address a long-lived handle.
//!
//! The memo is keyed by the text a record was *originally* inserted with. Updates
//! replace a record's text without touching the memo, so two distinct original
//! texts can never converge on one identifier through later edits.

use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt};

/// The first sequence number ever issued.
pub(crate) const INITIAL_SEQUENCE: u64 = 1;

/// A stable identifier for a record.
///
/// Unique per distinct text value allocated during the lifetime of an
/// [Allocator]. Displays as its decimal sequence number.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id(u64);

impl Id {
    pub(crate) const fn new(sequence: u64) -> Self {
        Self(sequence)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Issues identifiers for record text.
#[derive(Debug)]
pub struct Allocator {
    next: u64,
    assigned: HashMap<String, Id>,
}

impl Default for Allocator {
    fn default() -> Self {
        Self {
            next: INITIAL_SEQUENCE,
            assigned: HashMap::new(),
        }
    }
}

impl Allocator {
    /// Return the identifier for `text`, issuing a fresh one on first sight.
    ///
    /// Never fails: the sequence is effectively inexhaustible.
    pub fn allocate(&mut self, text: &str) -> Id {
        if let Some(id) = self.assigned.get(text) {
            return *id;
        }
        let id = Id(self.next);
        self.next += 1;
        self.assigned.insert(text.to_string(), id);
        id
    }

    /// Clear the memo and rewind the sequence to its initial value.
    ///
    /// Only snapshot restore should call this; resetting a live allocator would
    /// let fresh identifiers collide with ones already handed out.
    pub fn reset(&mut self) {
        self.next = INITIAL_SEQUENCE;
        self.assigned.clear();
    }

    /// Replace the allocator state wholesale from snapshot parts.
    pub(crate) fn restore(&mut self, next: u64, assigned: impl IntoIterator<Item = (String, Id)>) {
        self.reset();
        self.next = next;
        self.assigned.extend(assigned);
    }

    pub(crate) fn next_sequence(&self) -> u64 {
        self.next
    }

    pub(crate) fn entries(&self) -> impl Iterator<Item = (&str, Id)> {
        self.assigned.iter().map(|(text, id)| (text.as_str(), *id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_monotonic() {
        let mut allocator = Allocator::default();
        let bat = allocator.allocate("bat");
        let bath = allocator.allocate("bath");
        let dog = allocator.allocate("dog");
        assert!(bat < bath);
        assert!(bath < dog);
    }

    #[test]
    fn test_allocate_memoized() {
        let mut allocator = Allocator::default();
        let first = allocator.allocate("bat");
        allocator.allocate("bath");
        let second = allocator.allocate("bat");
        assert_eq!(first, second);
        assert_eq!(allocator.next_sequence(), 3);
    }

    #[test]
    fn test_reset() {
        let mut allocator = Allocator::default();
        let before = allocator.allocate("bat");
        allocator.reset();
        assert_eq!(allocator.next_sequence(), INITIAL_SEQUENCE);
        let after = allocator.allocate("dog");
        // After a reset the sequence starts over, so "dog" takes the first slot.
        assert_eq!(before, after);
    }

    #[test]
    fn test_restore() {
        let mut allocator = Allocator::default();
        allocator.allocate("stale");
        allocator.restore(7, [("bat".to_string(), Id::new(3))]);
        assert_eq!(allocator.allocate("bat"), Id::new(3));
        assert_eq!(allocator.allocate("fresh"), Id::new(7));
        assert_eq!(allocator.allocate("stale"), Id::new(8));
    }

    #[test]
    fn test_id_display() {
        assert_eq!(Id::new(42).to_string(), "42");
    }
}
