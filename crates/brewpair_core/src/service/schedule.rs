//! Scheduling cycle orchestration.
//!
//! # Responsibility
//! - Run one full cycle: reconcile the pair universe, walk meeting-count
//!   tiers least-met first, select pairings, commit count increments and
//!   persist one meeting record.
//!
//! # Invariants
//! - Never selects more pairings than `active_member_count / 2`.
//! - A cycle that cannot fill its quota still commits what it found and
//!   reports `CycleStatus::Deficit` rather than failing.
//! - Count increments are per-pair writes; a mid-cycle error can leave
//!   earlier increments in place. This is accepted, not rolled back.

use crate::model::pair::PairKey;
use crate::model::record::RecordId;
use crate::repo::member_repo::MemberRepository;
use crate::repo::pair_repo::PairRepository;
use crate::repo::record_repo::MeetRecordRepository;
use crate::repo::RepoResult;
use crate::service::reconcile::reconcile_pairs;
use crate::service::rounds::select_round;
use log::{info, warn};
use rand::Rng;
use std::collections::HashSet;

/// How a completed cycle relates to its ideal quota.
///
/// `Deficit` is a soft success: meetings were created, just fewer than the
/// roster could ideally support. An odd roster leaving one member unpaired
/// is `Complete`, not a deficit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleStatus {
    Complete,
    Deficit,
}

/// Result of one successful scheduling cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleOutcome {
    pub status: CycleStatus,
    /// Selected pair keys, in selection order.
    pub selected: Vec<PairKey>,
    /// Human-readable `"<Name A> meeting <Name B>"` lines.
    pub pairings: Vec<String>,
    /// Persisted meeting record, absent when nothing was selected.
    pub record_id: Option<RecordId>,
}

impl CycleOutcome {
    fn empty(status: CycleStatus) -> Self {
        Self {
            status,
            selected: Vec::new(),
            pairings: Vec::new(),
            record_id: None,
        }
    }
}

/// Use-case service running scheduling cycles over injected repositories.
pub struct ScheduleService<'a, M, P, R> {
    members: &'a M,
    pairs: &'a P,
    records: &'a R,
}

impl<'a, M, P, R> ScheduleService<'a, M, P, R>
where
    M: MemberRepository,
    P: PairRepository,
    R: MeetRecordRepository,
{
    pub fn new(members: &'a M, pairs: &'a P, records: &'a R) -> Self {
        Self {
            members,
            pairs,
            records,
        }
    }

    /// Runs one full scheduling cycle.
    ///
    /// # Contract
    /// - Reconciles the pair universe first, so roster edits since the
    ///   last cycle are always reflected.
    /// - Quota is `active_member_count / 2`; an odd roster leaves one
    ///   member unpaired by design.
    /// - Errors propagate as typed results; no automatic retry.
    pub fn run_cycle<G: Rng>(&self, rng: &mut G) -> RepoResult<CycleOutcome> {
        info!("event=cycle module=schedule status=start");
        reconcile_pairs(self.members, self.pairs)?;

        let required = self.members.list_active_ids()?.len() / 2;
        if required == 0 {
            info!("event=cycle module=schedule status=ok required=0 selected=0");
            return Ok(CycleOutcome::empty(CycleStatus::Complete));
        }

        let selected = self.select_pairings(required, rng)?;
        let outcome = self.commit(required, selected)?;

        match outcome.status {
            CycleStatus::Complete => info!(
                "event=cycle module=schedule status=ok required={required} selected={}",
                outcome.selected.len()
            ),
            CycleStatus::Deficit => warn!(
                "event=cycle module=schedule status=deficit required={required} selected={}",
                outcome.selected.len()
            ),
        }
        Ok(outcome)
    }

    /// Walks meeting-count tiers least-met first until the quota is filled
    /// or the active pool is exhausted.
    fn select_pairings<G: Rng>(&self, required: usize, rng: &mut G) -> RepoResult<Vec<PairKey>> {
        let (Some(min_tier), Some(max_tier)) = (
            self.pairs.min_active_meetings()?,
            self.pairs.max_active_meetings()?,
        ) else {
            return Ok(Vec::new());
        };

        let mut chosen = Vec::new();
        let mut committed = HashSet::new();
        for tier in min_tier..=max_tier {
            if chosen.len() >= required {
                break;
            }
            let pool: Vec<PairKey> = self
                .pairs
                .pairs_at_tier(tier)?
                .into_iter()
                .map(|pair| pair.key)
                .collect();
            select_round(&pool, required - chosen.len(), &mut chosen, &mut committed, rng);
        }
        Ok(chosen)
    }

    /// Increments counts, formats pairing lines and persists the record.
    fn commit(&self, required: usize, selected: Vec<PairKey>) -> RepoResult<CycleOutcome> {
        let mut pairings = Vec::with_capacity(selected.len());
        for key in &selected {
            let (low, high) = key.members();
            let first = self.members.get_member(low)?;
            let second = self.members.get_member(high)?;
            self.pairs.increment_meetings(key)?;
            pairings.push(format!("{} meeting {}", first.full_name, second.full_name));
        }

        let record_id = if pairings.is_empty() {
            None
        } else {
            Some(self.records.create_record(&pairings.join("\n"))?)
        };

        let status = if selected.len() == required {
            CycleStatus::Complete
        } else {
            CycleStatus::Deficit
        };
        Ok(CycleOutcome {
            status,
            selected,
            pairings,
            record_id,
        })
    }
}
