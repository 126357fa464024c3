//! Meeting-record repository contract and SQLite implementation.
//!
//! # Invariants
//! - `meet_records` is append-only: no update or delete paths exist.
//! - `last_records` ordering is most recent first.

use crate::model::record::{MeetRecord, RecordId};
use crate::repo::{ensure_connection_ready, RepoResult};
use rusqlite::{Connection, Row};

const RECORD_SELECT_SQL: &str = "SELECT id, recorded_at, detail FROM meet_records";

/// Repository interface for the append-only meeting log.
pub trait MeetRecordRepository {
    /// Appends one record and returns its id.
    fn create_record(&self, detail: &str) -> RepoResult<RecordId>;
    /// Most recent record, `None` when the log is empty.
    fn latest_record(&self) -> RepoResult<Option<MeetRecord>>;
    /// The `n` most recent records, newest first.
    fn last_records(&self, n: u32) -> RepoResult<Vec<MeetRecord>>;
}

/// SQLite-backed meeting log repository.
pub struct SqliteMeetRecordRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMeetRecordRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "meet_records", &["id", "recorded_at", "detail"])?;
        Ok(Self { conn })
    }
}

impl MeetRecordRepository for SqliteMeetRecordRepository<'_> {
    fn create_record(&self, detail: &str) -> RepoResult<RecordId> {
        self.conn.execute(
            "INSERT INTO meet_records (detail) VALUES (?1);",
            [detail],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn latest_record(&self) -> RepoResult<Option<MeetRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{RECORD_SELECT_SQL} ORDER BY id DESC LIMIT 1;"))?;
        let mut rows = stmt.query([])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_record_row(row)?)),
            None => Ok(None),
        }
    }

    fn last_records(&self, n: u32) -> RepoResult<Vec<MeetRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{RECORD_SELECT_SQL} ORDER BY id DESC LIMIT ?1;"))?;
        let mut rows = stmt.query([n])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_record_row(row)?);
        }
        Ok(records)
    }
}

fn parse_record_row(row: &Row<'_>) -> RepoResult<MeetRecord> {
    Ok(MeetRecord {
        id: row.get("id")?,
        recorded_at: row.get("recorded_at")?,
        detail: row.get("detail")?,
    })
}
