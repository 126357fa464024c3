use brewpair_core::service::rounds::{disjoint_pass, individuals, select_round};
use brewpair_core::{required_pair_universe, MemberId, PairKey};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;

#[test]
fn individuals_collects_both_sides_of_every_pairing() {
    let chosen = vec![key(1, 2), key(3, 4)];
    let committed = individuals(&chosen);
    assert_eq!(committed, HashSet::from([1, 2, 3, 4]));
}

#[test]
fn disjoint_pass_never_double_books_a_member() {
    let pool = universe(8);
    for seed in 0..20 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let accepted = disjoint_pass(&pool, &HashSet::new(), &mut rng);
        assert_no_double_booking(&accepted);
        // 8 members admit a perfect matching, and the greedy scan cannot
        // stop before every member is taken.
        assert_eq!(accepted.len(), 4, "seed {seed}");
    }
}

#[test]
fn disjoint_pass_skips_already_committed_members() {
    let pool = universe(4);
    let committed = HashSet::from([1, 2]);
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    let accepted = disjoint_pass(&pool, &committed, &mut rng);
    assert_eq!(accepted, vec![key(3, 4)]);
}

#[test]
fn disjoint_pass_leaves_the_input_pool_untouched() {
    let pool = universe(6);
    let before = pool.clone();
    let mut rng = ChaCha8Rng::seed_from_u64(11);

    disjoint_pass(&pool, &HashSet::new(), &mut rng);
    assert_eq!(pool, before);
}

#[test]
fn select_round_is_a_noop_for_empty_pool_or_zero_quota() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let pool = universe(4);

    let mut chosen = vec![key(1, 2)];
    let mut committed = individuals(&chosen);
    select_round(&[], 2, &mut chosen, &mut committed, &mut rng);
    assert_eq!(chosen, vec![key(1, 2)]);

    select_round(&pool, 0, &mut chosen, &mut committed, &mut rng);
    assert_eq!(chosen, vec![key(1, 2)]);
}

#[test]
fn small_pool_returns_everything_it_can_even_below_quota() {
    // Three mutually overlapping pairs admit only one disjoint pick; the
    // unfilled quota is the caller-visible deficit signal.
    let pool = vec![key(1, 2), key(1, 3), key(2, 3)];
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let mut chosen = Vec::new();
    let mut committed = HashSet::new();

    select_round(&pool, 5, &mut chosen, &mut committed, &mut rng);

    assert_eq!(chosen.len(), 1);
    assert_no_double_booking(&chosen);
}

#[test]
fn abundant_pool_fills_the_quota_exactly() {
    let pool = universe(12);
    for seed in 0..20 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut chosen = Vec::new();
        let mut committed = HashSet::new();

        select_round(&pool, 3, &mut chosen, &mut committed, &mut rng);

        assert_eq!(chosen.len(), 3, "seed {seed}");
        assert_no_double_booking(&chosen);
        assert_eq!(committed, individuals(&chosen), "seed {seed}");
    }
}

#[test]
fn complete_universe_never_underfills_a_feasible_quota() {
    // Over a complete pair universe with an even member count, every
    // member left free after the random draws still has a compatible
    // partner, so the top-up pass must always close the gap.
    let pool = universe(8);
    for seed in 0..40 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut chosen = Vec::new();
        let mut committed = HashSet::new();

        select_round(&pool, 4, &mut chosen, &mut committed, &mut rng);

        assert_eq!(chosen.len(), 4, "seed {seed}");
        assert_no_double_booking(&chosen);
    }
}

#[test]
fn select_round_respects_previously_committed_pairings() {
    let pool = universe(6);
    for seed in 0..20 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut chosen = vec![key(1, 2)];
        let mut committed = individuals(&chosen);

        select_round(&pool, 2, &mut chosen, &mut committed, &mut rng);

        assert_no_double_booking(&chosen);
        assert!(chosen.len() <= 3, "seed {seed}");
        for extra in &chosen[1..] {
            assert!(!extra.involves(1) && !extra.involves(2), "seed {seed}");
        }
    }
}

#[test]
fn seeded_rng_makes_selection_reproducible() {
    let pool = universe(10);

    let run = |seed: u64| {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut chosen = Vec::new();
        let mut committed = HashSet::new();
        select_round(&pool, 4, &mut chosen, &mut committed, &mut rng);
        chosen
    };

    assert_eq!(run(42), run(42));
}

fn key(a: MemberId, b: MemberId) -> PairKey {
    PairKey::new(a, b).unwrap()
}

fn universe(n: MemberId) -> Vec<PairKey> {
    let ids: Vec<MemberId> = (1..=n).collect();
    required_pair_universe(&ids).unwrap().into_iter().collect()
}

fn assert_no_double_booking(chosen: &[PairKey]) {
    let mut seen = HashSet::new();
    for pair in chosen {
        let (low, high) = pair.members();
        assert!(seen.insert(low), "member {low} booked twice in {chosen:?}");
        assert!(seen.insert(high), "member {high} booked twice in {chosen:?}");
    }
}
