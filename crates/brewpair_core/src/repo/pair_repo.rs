//! Pair-universe repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Own persistence of the pair universe (`pairs` table): scope listings,
//!   count-preserving upserts, activation toggles, atomic count increments
//!   and meeting-count tier queries.
//!
//! # Invariants
//! - `upsert_pair` never touches the meetings count of an existing row.
//! - `increment_meetings` is a single atomic SQL update.
//! - Rows are deactivated, never deleted; meeting history survives roster
//!   changes.

use crate::model::pair::{Pair, PairKey};
use crate::repo::{bool_to_int, ensure_connection_ready, parse_flag, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const PAIR_SELECT_SQL: &str = "SELECT combination, named, meetings, active FROM pairs";

/// Pair filter for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairScope {
    All,
    Active,
    Inactive,
}

/// Repository interface for the pair universe.
pub trait PairRepository {
    /// Lists pairs in the given scope, ordered by key. No side effects.
    fn list_pairs(&self, scope: PairScope) -> RepoResult<Vec<Pair>>;
    /// Gets one pair by key; absent rows are `PairNotFound`.
    fn get_pair(&self, key: &PairKey) -> RepoResult<Pair>;
    /// Creates the pair with count 0/active if absent; an existing row
    /// keeps its count and label but is flipped back to active.
    fn upsert_pair(&self, key: &PairKey, label: &str) -> RepoResult<()>;
    /// Idempotent activation toggle.
    fn set_active(&self, key: &PairKey, active: bool) -> RepoResult<()>;
    /// Atomically increments the meetings count.
    fn increment_meetings(&self, key: &PairKey) -> RepoResult<()>;
    /// Active pairs whose meetings count equals the given tier.
    fn pairs_at_tier(&self, meetings: u32) -> RepoResult<Vec<Pair>>;
    /// Smallest meetings count among active pairs, `None` when none exist.
    fn min_active_meetings(&self) -> RepoResult<Option<u32>>;
    /// Largest meetings count among active pairs, `None` when none exist.
    fn max_active_meetings(&self) -> RepoResult<Option<u32>>;
}

/// SQLite-backed pair repository.
pub struct SqlitePairRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePairRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "pairs", &["combination", "named", "meetings", "active"])?;
        Ok(Self { conn })
    }
}

impl PairRepository for SqlitePairRepository<'_> {
    fn list_pairs(&self, scope: PairScope) -> RepoResult<Vec<Pair>> {
        let sql = match scope {
            PairScope::All => format!("{PAIR_SELECT_SQL} ORDER BY combination ASC;"),
            PairScope::Active => {
                format!("{PAIR_SELECT_SQL} WHERE active = 1 ORDER BY combination ASC;")
            }
            PairScope::Inactive => {
                format!("{PAIR_SELECT_SQL} WHERE active = 0 ORDER BY combination ASC;")
            }
        };

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([])?;
        let mut pairs = Vec::new();
        while let Some(row) = rows.next()? {
            pairs.push(parse_pair_row(row)?);
        }
        Ok(pairs)
    }

    fn get_pair(&self, key: &PairKey) -> RepoResult<Pair> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PAIR_SELECT_SQL} WHERE combination = ?1;"))?;
        let mut rows = stmt.query([key.to_string()])?;
        match rows.next()? {
            Some(row) => parse_pair_row(row),
            None => Err(RepoError::PairNotFound(*key)),
        }
    }

    fn upsert_pair(&self, key: &PairKey, label: &str) -> RepoResult<()> {
        // The label is denormalized at creation time; conflicts keep the
        // historical label and count and only restore the active flag.
        self.conn.execute(
            "INSERT INTO pairs (combination, named, meetings, active)
             VALUES (?1, ?2, 0, 1)
             ON CONFLICT (combination) DO UPDATE SET
                active = 1,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key.to_string(), label],
        )?;
        Ok(())
    }

    fn set_active(&self, key: &PairKey, active: bool) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE pairs
             SET
                active = ?1,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE combination = ?2;",
            params![bool_to_int(active), key.to_string()],
        )?;
        if changed == 0 {
            return Err(RepoError::PairNotFound(*key));
        }
        Ok(())
    }

    fn increment_meetings(&self, key: &PairKey) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE pairs
             SET
                meetings = meetings + 1,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE combination = ?1;",
            [key.to_string()],
        )?;
        if changed == 0 {
            return Err(RepoError::PairNotFound(*key));
        }
        Ok(())
    }

    fn pairs_at_tier(&self, meetings: u32) -> RepoResult<Vec<Pair>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PAIR_SELECT_SQL} WHERE active = 1 AND meetings = ?1 ORDER BY combination ASC;"
        ))?;
        let mut rows = stmt.query([meetings])?;
        let mut pairs = Vec::new();
        while let Some(row) = rows.next()? {
            pairs.push(parse_pair_row(row)?);
        }
        Ok(pairs)
    }

    fn min_active_meetings(&self) -> RepoResult<Option<u32>> {
        let value = self.conn.query_row(
            "SELECT MIN(meetings) FROM pairs WHERE active = 1;",
            [],
            |row| row.get::<_, Option<u32>>(0),
        )?;
        Ok(value)
    }

    fn max_active_meetings(&self) -> RepoResult<Option<u32>> {
        let value = self.conn.query_row(
            "SELECT MAX(meetings) FROM pairs WHERE active = 1;",
            [],
            |row| row.get::<_, Option<u32>>(0),
        )?;
        Ok(value)
    }
}

fn parse_pair_row(row: &Row<'_>) -> RepoResult<Pair> {
    let key_text: String = row.get("combination")?;
    let key = PairKey::parse(&key_text).map_err(|err| {
        RepoError::InvalidData(format!(
            "invalid pair key `{key_text}` in pairs.combination: {err}"
        ))
    })?;

    let meetings: i64 = row.get("meetings")?;
    let meetings = u32::try_from(meetings).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid meetings value `{meetings}` in pairs.meetings"
        ))
    })?;

    let active = parse_flag(row.get::<_, i64>("active")?, "pairs", "active")?;

    Ok(Pair {
        key,
        label: row.get("named")?,
        meetings,
        active,
    })
}
