//! Encode and decode record addresses.
//!
//! An [Address] is the stable handle returned to callers: a bucket key plus the
//! record's [Id], joined by a reserved separator. Encoding is [fmt::Display],
//! decoding is [FromStr], and the two are exact inverses for every address the
//! engine hands out.
//!
//! The separator is reserved: record text (and therefore any bucket key derived
//! from it) must never contain it, which the engine enforces on insert and
//! update. Records are matched by exact identifier equality, so identifier `1`
//! can never be confused with identifier `10`.

use crate::{allocator::Id, store::Error};
use std::{fmt, str::FromStr};

/// Separates the bucket key from the identifier in an encoded address.
pub const SEPARATOR: char = ':';

/// A stable handle to a record: its bucket key and identifier.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Address {
    bucket: String,
    id: Id,
}

impl Address {
    pub(crate) fn new(bucket: String, id: Id) -> Self {
        Self { bucket, id }
    }

    /// The bucket key under which the record is stored.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// The record's identifier.
    pub fn id(&self) -> Id {
        self.id
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.bucket, SEPARATOR, self.id)
    }
}

impl FromStr for Address {
    type Err = Error;

    /// Decode an address.
    ///
    /// Fails with [Error::MalformedAddress] when the separator is absent or
    /// appears more than once, or when the identifier part is not a plain
    /// decimal number. An empty bucket part is well-formed (the flat
    /// strategy's degenerate global bucket).
    fn from_str(s: &str) -> Result<Self, Error> {
        let malformed = || Error::MalformedAddress(s.to_string());
        let mut parts = s.split(SEPARATOR);
        let (Some(bucket), Some(sequence), None) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(malformed());
        };
        if sequence.is_empty() || !sequence.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        let sequence = sequence.parse::<u64>().map_err(|_| malformed())?;
        Ok(Self {
            bucket: bucket.to_string(),
            id: Id::new(sequence),
        })
    }
}
