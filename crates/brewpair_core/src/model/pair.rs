//! Pair domain model and key canonicalization.
//!
//! # Responsibility
//! - Own the canonical `"<id1>|<id2>"` pair key format (ids ascending).
//! - Enumerate the required pair universe for an active roster.
//!
//! # Invariants
//! - A `PairKey` always holds two distinct positive ids with the smaller
//!   one first; the persisted string form is derived from that order.
//! - `required_pair_universe` output depends only on the id *set*, not on
//!   input ordering or duplicates.

use crate::model::member::MemberId;
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Validation failure for pair keys and pair construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairValidationError {
    /// Both sides of the pair refer to the same member.
    IdenticalMembers(MemberId),
    /// Member ids are rowid-backed and must be positive.
    NonPositiveId(MemberId),
    /// Persisted key text does not split into exactly two integer ids.
    MalformedKey(String),
    /// Key text parsed but the ids are not in ascending order.
    NonCanonicalKey(String),
}

impl Display for PairValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IdenticalMembers(id) => {
                write!(f, "pair cannot join member {id} with themselves")
            }
            Self::NonPositiveId(id) => write!(f, "member id {id} is not a valid rowid"),
            Self::MalformedKey(text) => write!(f, "malformed pair key `{text}`"),
            Self::NonCanonicalKey(text) => {
                write!(f, "pair key `{text}` is not in canonical ascending order")
            }
        }
    }
}

impl Error for PairValidationError {}

/// Canonical identity of an unordered member combination.
///
/// The string form (`Display`) is the persisted representation and must
/// stay bit-exact for compatibility with historical rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PairKey {
    low: MemberId,
    high: MemberId,
}

impl PairKey {
    /// Builds a canonical key from two member ids in any order.
    pub fn new(a: MemberId, b: MemberId) -> Result<Self, PairValidationError> {
        if a <= 0 {
            return Err(PairValidationError::NonPositiveId(a));
        }
        if b <= 0 {
            return Err(PairValidationError::NonPositiveId(b));
        }
        if a == b {
            return Err(PairValidationError::IdenticalMembers(a));
        }
        let (low, high) = if a < b { (a, b) } else { (b, a) };
        Ok(Self { low, high })
    }

    /// Parses the persisted `"<id1>|<id2>"` form.
    ///
    /// Rejects non-canonical text instead of silently reordering, so a
    /// corrupted row cannot round-trip into a different identity.
    pub fn parse(text: &str) -> Result<Self, PairValidationError> {
        let malformed = || PairValidationError::MalformedKey(text.to_string());

        let (first, second) = text.split_once('|').ok_or_else(malformed)?;
        let a: MemberId = first.parse().map_err(|_| malformed())?;
        let b: MemberId = second.parse().map_err(|_| malformed())?;

        let key = Self::new(a, b)?;
        if key.low != a {
            return Err(PairValidationError::NonCanonicalKey(text.to_string()));
        }
        Ok(key)
    }

    /// Returns both member ids, smaller first.
    pub fn members(&self) -> (MemberId, MemberId) {
        (self.low, self.high)
    }

    /// Whether the given member is one side of this pair.
    pub fn involves(&self, id: MemberId) -> bool {
        self.low == id || self.high == id
    }
}

impl Display for PairKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}|{}", self.low, self.high)
    }
}

impl Serialize for PairKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PairKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(de::Error::custom)
    }
}

/// One unordered member combination with its meeting history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pair {
    /// Canonical identity, also the persisted primary key.
    pub key: PairKey,
    /// Denormalized `"<Name A> | <Name B>"` label, set at creation time.
    pub label: String,
    /// How many rounds this pair has been selected into. Never decreases.
    pub meetings: u32,
    /// True iff both members are currently active.
    pub active: bool,
}

/// Enumerates every unordered combination over the given active ids.
///
/// For n distinct ids this yields exactly n * (n - 1) / 2 keys. Input
/// ordering and duplicates do not affect the result.
pub fn required_pair_universe(
    active_ids: &[MemberId],
) -> Result<BTreeSet<PairKey>, PairValidationError> {
    let distinct: BTreeSet<MemberId> = active_ids.iter().copied().collect();
    let ordered: Vec<MemberId> = distinct.into_iter().collect();

    let mut universe = BTreeSet::new();
    for (index, &low) in ordered.iter().enumerate() {
        for &high in &ordered[index + 1..] {
            universe.insert(PairKey::new(low, high)?);
        }
    }
    Ok(universe)
}

/// Formats the denormalized pair label from member names in key id order.
pub fn pair_label(low_name: &str, high_name: &str) -> String {
    format!("{low_name} | {high_name}")
}
