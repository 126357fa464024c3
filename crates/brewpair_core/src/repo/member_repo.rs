//! Member repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide roster CRUD over the `members` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Members are soft-deactivated via the `active` flag, never deleted.
//! - `list_active_ids` ordering is ascending by id, which keeps pair-key
//!   enumeration stable across calls.

use crate::model::member::{Member, MemberId};
use crate::repo::{bool_to_int, ensure_connection_ready, parse_flag, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const MEMBER_SELECT_SQL: &str = "SELECT id, full_name, email, active FROM members";

/// Roster filter for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberScope {
    All,
    Active,
    Inactive,
}

/// Repository interface for roster operations.
pub trait MemberRepository {
    /// Creates one member and returns the assigned stable id.
    fn create_member(
        &self,
        full_name: &str,
        email: Option<&str>,
        active: bool,
    ) -> RepoResult<MemberId>;
    /// Gets one member by id; absent rows are `MemberNotFound`.
    fn get_member(&self, id: MemberId) -> RepoResult<Member>;
    /// Lists members in the given scope, ordered by display name.
    fn list_members(&self, scope: MemberScope) -> RepoResult<Vec<Member>>;
    /// Lists active member ids in ascending id order.
    fn list_active_ids(&self) -> RepoResult<Vec<MemberId>>;
    /// Updates name/email for an existing member.
    fn update_member(&self, member: &Member) -> RepoResult<()>;
    /// Flips the active flag; idempotent for an unchanged value.
    fn set_member_active(&self, id: MemberId, active: bool) -> RepoResult<()>;
}

/// SQLite-backed roster repository.
pub struct SqliteMemberRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMemberRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "members", &["id", "full_name", "email", "active"])?;
        Ok(Self { conn })
    }
}

impl MemberRepository for SqliteMemberRepository<'_> {
    fn create_member(
        &self,
        full_name: &str,
        email: Option<&str>,
        active: bool,
    ) -> RepoResult<MemberId> {
        self.conn.execute(
            "INSERT INTO members (full_name, email, active) VALUES (?1, ?2, ?3);",
            params![full_name, email, bool_to_int(active)],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_member(&self, id: MemberId) -> RepoResult<Member> {
        let mut stmt = self
            .conn
            .prepare(&format!("{MEMBER_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => parse_member_row(row),
            None => Err(RepoError::MemberNotFound(id)),
        }
    }

    fn list_members(&self, scope: MemberScope) -> RepoResult<Vec<Member>> {
        let sql = match scope {
            MemberScope::All => format!("{MEMBER_SELECT_SQL} ORDER BY full_name ASC;"),
            MemberScope::Active => {
                format!("{MEMBER_SELECT_SQL} WHERE active = 1 ORDER BY full_name ASC;")
            }
            MemberScope::Inactive => {
                format!("{MEMBER_SELECT_SQL} WHERE active = 0 ORDER BY full_name ASC;")
            }
        };

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([])?;
        let mut members = Vec::new();
        while let Some(row) = rows.next()? {
            members.push(parse_member_row(row)?);
        }
        Ok(members)
    }

    fn list_active_ids(&self) -> RepoResult<Vec<MemberId>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id FROM members WHERE active = 1 ORDER BY id ASC;")?;
        let mut rows = stmt.query([])?;
        let mut ids = Vec::new();
        while let Some(row) = rows.next()? {
            ids.push(row.get(0)?);
        }
        Ok(ids)
    }

    fn update_member(&self, member: &Member) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE members
             SET
                full_name = ?1,
                email = ?2,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?3;",
            params![member.full_name, member.email, member.id],
        )?;
        if changed == 0 {
            return Err(RepoError::MemberNotFound(member.id));
        }
        Ok(())
    }

    fn set_member_active(&self, id: MemberId, active: bool) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE members
             SET
                active = ?1,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?2;",
            params![bool_to_int(active), id],
        )?;
        if changed == 0 {
            return Err(RepoError::MemberNotFound(id));
        }
        Ok(())
    }
}

fn parse_member_row(row: &Row<'_>) -> RepoResult<Member> {
    let active = parse_flag(row.get::<_, i64>("active")?, "members", "active")?;
    Ok(Member {
        id: row.get("id")?,
        full_name: row.get("full_name")?,
        email: row.get("email")?,
        active,
    })
}
