//! Round selection: picking non-conflicting pairings from a tier pool.
//!
//! # Responsibility
//! - Pure set construction over borrowed pair keys; commitment (count
//!   increments, record rows) belongs to the scheduling cycle.
//!
//! # Invariants
//! - No member id appears in more than one chosen pairing.
//! - Inputs are never mutated; shuffling happens on a local copy.
//! - Every path terminates: random draws are capped at a multiple of the
//!   pool size, with the remainder topped up by a fresh disjoint pass.

use crate::model::member::MemberId;
use crate::model::pair::PairKey;
use log::info;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

/// Cap on random draw attempts, as a multiple of the pool size.
const DRAW_ATTEMPT_FACTOR: usize = 4;

/// Member ids committed by a list of chosen pairings.
pub fn individuals(chosen: &[PairKey]) -> HashSet<MemberId> {
    let mut committed = HashSet::with_capacity(chosen.len() * 2);
    for key in chosen {
        let (low, high) = key.members();
        committed.insert(low);
        committed.insert(high);
    }
    committed
}

/// Greedy maximal matching over a shuffled copy of the pool.
///
/// Scans in randomized order and accepts every pair whose members are both
/// free, so small pools still surface whatever disjoint subset exists.
pub fn disjoint_pass<R: Rng>(
    pool: &[PairKey],
    committed: &HashSet<MemberId>,
    rng: &mut R,
) -> Vec<PairKey> {
    let mut shuffled = pool.to_vec();
    shuffled.shuffle(rng);

    let mut taken = committed.clone();
    let mut accepted = Vec::new();
    for key in shuffled {
        let (low, high) = key.members();
        if taken.contains(&low) || taken.contains(&high) {
            continue;
        }
        taken.insert(low);
        taken.insert(high);
        accepted.push(key);
    }
    accepted
}

/// Chooses up to `quota` new pairings from `pool`, appending them to
/// `already_chosen` and their members to `committed`.
///
/// When the disjoint pass yields no more than the quota, all of it is
/// taken (an under-filled quota signals a deficit to the caller). With
/// abundant choice, random draws spread selection across the pool; the
/// draw loop is bounded and any shortfall is topped up by a fresh
/// disjoint pass over what is still compatible.
pub fn select_round<R: Rng>(
    pool: &[PairKey],
    quota: usize,
    already_chosen: &mut Vec<PairKey>,
    committed: &mut HashSet<MemberId>,
    rng: &mut R,
) {
    if quota == 0 || pool.is_empty() {
        return;
    }

    let candidates = disjoint_pass(pool, committed, rng);
    if candidates.len() <= quota {
        info!(
            "event=round_select module=rounds status=ok mode=exhaustive pool={} accepted={}",
            pool.len(),
            candidates.len()
        );
        for key in candidates {
            accept(key, already_chosen, committed);
        }
        return;
    }

    let mut accepted = 0usize;
    let max_attempts = pool.len().saturating_mul(DRAW_ATTEMPT_FACTOR);
    for _ in 0..max_attempts {
        if accepted == quota {
            break;
        }
        let pick = pool[rng.random_range(0..pool.len())];
        let (low, high) = pick.members();
        if committed.contains(&low) || committed.contains(&high) {
            continue;
        }
        accept(pick, already_chosen, committed);
        accepted += 1;
    }

    // Capped draws can leave the quota short. The top-up takes every
    // pair a fresh maximal matching still offers; random-phase
    // fragmentation may leave fewer than the quota, which surfaces as a
    // deficit at this tier.
    if accepted < quota {
        for key in disjoint_pass(pool, committed, rng) {
            if accepted == quota {
                break;
            }
            accept(key, already_chosen, committed);
            accepted += 1;
        }
    }

    info!(
        "event=round_select module=rounds status=ok mode=random pool={} accepted={accepted}",
        pool.len()
    );
}

fn accept(key: PairKey, already_chosen: &mut Vec<PairKey>, committed: &mut HashSet<MemberId>) {
    let (low, high) = key.members();
    committed.insert(low);
    committed.insert(high);
    already_chosen.push(key);
}
