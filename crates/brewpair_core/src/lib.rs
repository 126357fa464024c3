//! Core domain logic for BrewPair, a recurring coffee-meetup scheduler.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging};
pub use model::member::{Member, MemberId};
pub use model::pair::{
    pair_label, required_pair_universe, Pair, PairKey, PairValidationError,
};
pub use model::record::{ConfigRef, MeetRecord, RecordId};
pub use repo::config_repo::{ConfigRepository, SqliteConfigRepository};
pub use repo::member_repo::{MemberRepository, MemberScope, SqliteMemberRepository};
pub use repo::pair_repo::{PairRepository, PairScope, SqlitePairRepository};
pub use repo::record_repo::{MeetRecordRepository, SqliteMeetRecordRepository};
pub use repo::{RepoError, RepoResult};
pub use service::notify::{make_email_body, EmailConfig};
pub use service::reconcile::{reconcile_pairs, ReconcileOutcome};
pub use service::schedule::{CycleOutcome, CycleStatus, ScheduleService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
