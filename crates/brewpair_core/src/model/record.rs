//! Meeting-record and configuration-reference read models.

use serde::{Deserialize, Serialize};

/// Stable identifier of a meeting record row.
pub type RecordId = i64;

/// Append-only log entry for one completed scheduling cycle.
///
/// Records are never mutated or deleted; `detail` holds the
/// newline-joined `"<Name A> meeting <Name B>"` lines of the round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetRecord {
    pub id: RecordId,
    /// Creation time in epoch milliseconds, assigned by the database.
    pub recorded_at: i64,
    pub detail: String,
}

/// Key/value reference row consumed by the notification builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigRef {
    pub name: String,
    pub desc: Option<String>,
    pub ref_int: i64,
    pub ref_str: Option<String>,
}
