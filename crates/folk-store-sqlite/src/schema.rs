//! SQL schema for the Folk SQLite store.
//!
//! Executed once at connection startup. Idempotent thanks to
//! `CREATE ... IF NOT EXISTS`.

pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS persons (
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    uid       TEXT NOT NULL UNIQUE,
    name      TEXT NOT NULL,
    timestamp TEXT NOT NULL,   -- RFC 3339 UTC; server-assigned on every write
    traits    TEXT NOT NULL    -- JSON, stored verbatim
);

CREATE INDEX IF NOT EXISTS persons_name_idx ON persons(name);

PRAGMA user_version = 1;
";

/// Column list shared by every `SELECT`, in [`RawPerson`](crate::encode::RawPerson)
/// field order.
pub const COLUMNS: &str = "id, uid, name, timestamp, traits";

/// Upsert keyed by `uid`; shared by `save` and `create_person`.
pub const UPSERT: &str = "
INSERT INTO persons (uid, name, timestamp, traits)
VALUES (?1, ?2, ?3, ?4)
ON CONFLICT (uid) DO UPDATE
SET name = excluded.name, timestamp = excluded.timestamp, traits = excluded.traits
RETURNING id";
