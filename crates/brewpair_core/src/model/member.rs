//! Member domain model.
//!
//! # Responsibility
//! - Define the roster record that drives the pair universe.
//!
//! # Invariants
//! - `id` is stable and never reused for another member.
//! - `active` is the source of truth for pair-universe membership.
//! - Deactivation never touches historical pair rows or meeting counts.

use serde::{Deserialize, Serialize};

/// Stable identifier for a roster member.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
/// Backed by the SQLite integer primary key, so valid ids are positive.
pub type MemberId = i64;

/// One person in the coffee-meetup roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Stable id referenced by pair keys.
    pub id: MemberId,
    /// Display name, unique across the roster.
    pub full_name: String,
    /// Optional contact address for round announcements.
    pub email: Option<String>,
    /// Whether this member participates in new rounds.
    pub active: bool,
}
