//! Store text records under stable, content-independent addresses.
//!
//! A [store::Store] is an in-process dictionary of text values. Each value is
//! addressed by a short handle that stays valid while the value is edited in
//! place: the address is derived from a bucket key plus an identifier issued
//! at first insertion, never from the current text. Callers can hold an
//! [address::Address] for as long as the record lives.
//!
//! Records are bucketed by a pluggable strategy implementing [index::Index]:
//! [index::Flat] buckets by a fixed-width character prefix, [index::Trie]
//! walks the whole word through nested character nodes. Both are
//! parameterizations of the same abstraction (a function from word to index
//! location) and the engine behaves identically over either.
//!
//! The engine is single-threaded and synchronous; there is no I/O inside it.
//! Durability is pushed to the boundary: [store::Store::snapshot] produces a
//! plain serializable structure and [store::Store::restore] consumes one, so
//! any medium can persist a store ([disk::Disk] ships a file-backed adapter).
//!
//! # Example
//!
//! ```rust
//! use prometheus_client::registry::Registry;
//! use wordstore::{index::Flat, store::Store};
//!
//! let mut registry = Registry::default();
//! let mut store = Store::init(&mut registry, Flat::<2>::new());
//!
//! // Insert returns the record's stable address.
//! let bat = store.insert("bat").unwrap();
//! assert_eq!(store.get(&bat.to_string()).unwrap(), Some("bat"));
//!
//! // Updates replace text in place; the address is unchanged.
//! let same = store.update(&bat.to_string(), "batman").unwrap().unwrap();
//! assert_eq!(same, bat);
//! assert_eq!(store.get(&bat.to_string()).unwrap(), Some("batman"));
//!
//! // Deletes invalidate the address for good.
//! assert!(store.delete(&bat.to_string()).unwrap());
//! assert_eq!(store.get(&bat.to_string()).unwrap(), None);
//! ```

pub mod address;
pub mod allocator;
pub mod disk;
pub mod index;
pub mod snapshot;
pub mod store;
