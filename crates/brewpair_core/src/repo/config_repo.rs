//! Config-reference repository contract and SQLite implementation.
//!
//! Reference rows are read-mostly key/value settings consumed by the
//! notification body builder; the upsert path exists for seeding and
//! administration.

use crate::model::record::ConfigRef;
use crate::repo::{ensure_connection_ready, RepoError, RepoResult};
use rusqlite::{params, Connection};

/// Repository interface for key/value reference settings.
pub trait ConfigRepository {
    /// String value for the given name; missing row or NULL value is
    /// `ConfigNotFound`.
    fn get_str(&self, name: &str) -> RepoResult<String>;
    /// Integer value for the given name; missing row is `ConfigNotFound`.
    fn get_int(&self, name: &str) -> RepoResult<i64>;
    /// Creates or replaces one reference row.
    fn upsert_ref(&self, reference: &ConfigRef) -> RepoResult<()>;
}

/// SQLite-backed config repository.
pub struct SqliteConfigRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteConfigRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "config_refs", &["name", "desc", "ref_int", "ref_str"])?;
        Ok(Self { conn })
    }

    fn get_ref(&self, name: &str) -> RepoResult<ConfigRef> {
        let mut stmt = self.conn.prepare(
            "SELECT name, desc, ref_int, ref_str FROM config_refs WHERE name = ?1;",
        )?;
        let mut rows = stmt.query([name])?;
        match rows.next()? {
            Some(row) => Ok(ConfigRef {
                name: row.get("name")?,
                desc: row.get("desc")?,
                ref_int: row.get("ref_int")?,
                ref_str: row.get("ref_str")?,
            }),
            None => Err(RepoError::ConfigNotFound(name.to_string())),
        }
    }
}

impl ConfigRepository for SqliteConfigRepository<'_> {
    fn get_str(&self, name: &str) -> RepoResult<String> {
        self.get_ref(name)?
            .ref_str
            .ok_or_else(|| RepoError::ConfigNotFound(name.to_string()))
    }

    fn get_int(&self, name: &str) -> RepoResult<i64> {
        Ok(self.get_ref(name)?.ref_int)
    }

    fn upsert_ref(&self, reference: &ConfigRef) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO config_refs (name, desc, ref_int, ref_str)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (name) DO UPDATE SET
                desc = excluded.desc,
                ref_int = excluded.ref_int,
                ref_str = excluded.ref_str;",
            params![
                reference.name,
                reference.desc,
                reference.ref_int,
                reference.ref_str
            ],
        )?;
        Ok(())
    }
}
