//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs: pair-universe
//!   reconciliation, round selection and full scheduling cycles.
//! - Keep CLI/presentation layers decoupled from storage details.

pub mod notify;
pub mod reconcile;
pub mod rounds;
pub mod schedule;
