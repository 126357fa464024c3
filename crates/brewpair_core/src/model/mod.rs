//! Domain model for members, pairs and meeting history.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep pair-key canonicalization and validation in one place.
//!
//! # Invariants
//! - Members are identified by a stable `MemberId` and soft-deactivated,
//!   never deleted.
//! - A pair key is the single identity of an unordered member combination.

pub mod member;
pub mod pair;
pub mod record;
