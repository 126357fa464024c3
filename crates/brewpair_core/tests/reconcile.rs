use brewpair_core::db::open_db_in_memory;
use brewpair_core::{
    reconcile_pairs, MemberId, MemberRepository, PairKey, PairRepository, PairScope,
    SqliteMemberRepository, SqlitePairRepository,
};
use rusqlite::Connection;

#[test]
fn reconcile_builds_full_universe_from_scratch() {
    let conn = open_db_in_memory().unwrap();
    let (members, pairs) = repos(&conn);
    seed_members(&members, &["Jack", "Jill", "Kim", "Lee"]);

    let outcome = reconcile_pairs(&members, &pairs).unwrap();

    assert_eq!(outcome.created, 6);
    assert_eq!(outcome.reactivated, 0);
    assert_eq!(outcome.deactivated, 0);

    let all = pairs.list_pairs(PairScope::All).unwrap();
    assert_eq!(all.len(), 6);
    assert!(all.iter().all(|pair| pair.active && pair.meetings == 0));
}

#[test]
fn reconcile_labels_follow_key_id_order() {
    let conn = open_db_in_memory().unwrap();
    let (members, pairs) = repos(&conn);
    let jack = members.create_member("Jack", None, true).unwrap();
    let jill = members.create_member("Jill", None, true).unwrap();

    reconcile_pairs(&members, &pairs).unwrap();

    let key = PairKey::new(jack, jill).unwrap();
    assert_eq!(pairs.get_pair(&key).unwrap().label, "Jack | Jill");
}

#[test]
fn second_run_with_no_membership_change_is_a_noop() {
    let conn = open_db_in_memory().unwrap();
    let (members, pairs) = repos(&conn);
    seed_members(&members, &["Jack", "Jill", "Kim"]);

    reconcile_pairs(&members, &pairs).unwrap();
    let before = snapshot(&conn);

    let second = reconcile_pairs(&members, &pairs).unwrap();

    assert!(second.is_noop());
    assert_eq!(snapshot(&conn), before);
}

#[test]
fn deactivating_a_member_retires_their_pairs_without_touching_counts() {
    let conn = open_db_in_memory().unwrap();
    let (members, pairs) = repos(&conn);
    let ids = seed_members(&members, &["Jack", "Jill", "Kim"]);

    reconcile_pairs(&members, &pairs).unwrap();
    let jack_jill = PairKey::new(ids[0], ids[1]).unwrap();
    pairs.increment_meetings(&jack_jill).unwrap();

    members.set_member_active(ids[1], false).unwrap();
    let outcome = reconcile_pairs(&members, &pairs).unwrap();

    assert_eq!(outcome.deactivated, 2);
    assert_eq!(outcome.created, 0);
    let retired = pairs.get_pair(&jack_jill).unwrap();
    assert!(!retired.active);
    assert_eq!(retired.meetings, 1);
}

#[test]
fn reactivating_a_member_restores_pairs_with_history_intact() {
    let conn = open_db_in_memory().unwrap();
    let (members, pairs) = repos(&conn);
    let ids = seed_members(&members, &["Jack", "Jill", "Kim"]);

    reconcile_pairs(&members, &pairs).unwrap();
    let jack_jill = PairKey::new(ids[0], ids[1]).unwrap();
    pairs.increment_meetings(&jack_jill).unwrap();
    pairs.increment_meetings(&jack_jill).unwrap();

    members.set_member_active(ids[1], false).unwrap();
    reconcile_pairs(&members, &pairs).unwrap();

    members.set_member_active(ids[1], true).unwrap();
    let outcome = reconcile_pairs(&members, &pairs).unwrap();

    assert_eq!(outcome.reactivated, 2);
    assert_eq!(outcome.created, 0);
    let restored = pairs.get_pair(&jack_jill).unwrap();
    assert!(restored.active);
    assert_eq!(restored.meetings, 2);
}

#[test]
fn adding_a_third_member_creates_exactly_their_new_pairs() {
    let conn = open_db_in_memory().unwrap();
    let (members, pairs) = repos(&conn);
    let ids = seed_members(&members, &["Jack", "Jill"]);

    reconcile_pairs(&members, &pairs).unwrap();
    let jack_jill = PairKey::new(ids[0], ids[1]).unwrap();
    for _ in 0..3 {
        pairs.increment_meetings(&jack_jill).unwrap();
    }

    let kim = members.create_member("Kim", None, true).unwrap();
    let outcome = reconcile_pairs(&members, &pairs).unwrap();

    assert_eq!(outcome.created, 2);
    assert_eq!(outcome.reactivated, 0);
    assert_eq!(outcome.deactivated, 0);

    let untouched = pairs.get_pair(&jack_jill).unwrap();
    assert_eq!(untouched.meetings, 3);
    assert!(untouched.active);

    for &existing in &ids {
        let new_pair = pairs
            .get_pair(&PairKey::new(existing, kim).unwrap())
            .unwrap();
        assert_eq!(new_pair.meetings, 0);
        assert!(new_pair.active);
    }
}

fn repos(conn: &Connection) -> (SqliteMemberRepository<'_>, SqlitePairRepository<'_>) {
    (
        SqliteMemberRepository::try_new(conn).unwrap(),
        SqlitePairRepository::try_new(conn).unwrap(),
    )
}

fn seed_members(repo: &SqliteMemberRepository<'_>, names: &[&str]) -> Vec<MemberId> {
    names
        .iter()
        .map(|name| repo.create_member(name, None, true).unwrap())
        .collect()
}

/// Raw table snapshot including timestamps, so any UPDATE shows up even
/// when it rewrites a value to itself.
fn snapshot(conn: &Connection) -> Vec<(String, String, i64, i64, i64)> {
    let mut stmt = conn
        .prepare(
            "SELECT combination, named, meetings, active, updated_at
             FROM pairs ORDER BY combination;",
        )
        .unwrap();
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
            ))
        })
        .unwrap();
    rows.map(|row| row.unwrap()).collect()
}
