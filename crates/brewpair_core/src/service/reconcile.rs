//! Pair-universe reconciliation.
//!
//! # Responsibility
//! - Align the persisted pair universe with the current active roster:
//!   reactivate, deactivate or create pair rows as membership changes.
//!
//! # Invariants
//! - Idempotent: a second run with no membership change performs zero
//!   mutations.
//! - Never deletes a pair row and never resets a meetings count, so a
//!   member who leaves and returns gets their history back intact.

use crate::model::member::MemberId;
use crate::model::pair::{pair_label, required_pair_universe};
use crate::repo::member_repo::{MemberRepository, MemberScope};
use crate::repo::pair_repo::{PairRepository, PairScope};
use crate::repo::{RepoError, RepoResult};
use log::info;
use std::collections::HashMap;

/// Mutation counters from one reconciliation run.
///
/// `created` is the number of brand-new pair rows; callers compare it with
/// their own expectations to detect a creation deficit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    pub created: u32,
    pub reactivated: u32,
    pub deactivated: u32,
}

impl ReconcileOutcome {
    /// True when the run found nothing to change.
    pub fn is_noop(&self) -> bool {
        *self == Self::default()
    }
}

/// Recomputes the required pair universe from the active roster and diffs
/// it against the persisted pairs.
///
/// Run on every membership change and at the start of each scheduling
/// cycle; both call sites rely on idempotence.
pub fn reconcile_pairs<M, P>(members: &M, pairs: &P) -> RepoResult<ReconcileOutcome>
where
    M: MemberRepository,
    P: PairRepository,
{
    let roster = members.list_members(MemberScope::Active)?;
    let names: HashMap<MemberId, &str> = roster
        .iter()
        .map(|member| (member.id, member.full_name.as_str()))
        .collect();
    let ids: Vec<MemberId> = roster.iter().map(|member| member.id).collect();

    // Working set: keys still unaccounted for after walking existing rows.
    let mut wanted = required_pair_universe(&ids)?;
    let mut outcome = ReconcileOutcome::default();

    for pair in pairs.list_pairs(PairScope::All)? {
        if wanted.remove(&pair.key) {
            if !pair.active {
                pairs.set_active(&pair.key, true)?;
                outcome.reactivated += 1;
            }
        } else if pair.active {
            pairs.set_active(&pair.key, false)?;
            outcome.deactivated += 1;
            info!(
                "event=pair_deactivated module=reconcile status=ok key={}",
                pair.key
            );
        }
    }

    for key in &wanted {
        let (low, high) = key.members();
        let low_name = names
            .get(&low)
            .copied()
            .ok_or(RepoError::MemberNotFound(low))?;
        let high_name = names
            .get(&high)
            .copied()
            .ok_or(RepoError::MemberNotFound(high))?;
        pairs.upsert_pair(key, &pair_label(low_name, high_name))?;
        outcome.created += 1;
    }

    info!(
        "event=reconcile module=reconcile status=ok created={} reactivated={} deactivated={}",
        outcome.created, outcome.reactivated, outcome.deactivated
    );
    Ok(outcome)
}
