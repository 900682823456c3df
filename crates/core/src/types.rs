use chrono::SubsecRound;

/// All primary keys are UUIDs generated by the application layer.
pub type DbId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Generate a fresh, time-ordered identifier (UUIDv7).
pub fn new_id() -> DbId {
    uuid::Uuid::now_v7()
}

/// Current UTC time truncated to microseconds, the precision of `TIMESTAMPTZ`.
///
/// Truncating at construction keeps in-memory values identical to what a
/// round-trip through PostgreSQL returns.
pub fn now() -> Timestamp {
    chrono::Utc::now().trunc_subsecs(6)
}
