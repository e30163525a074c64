//! SQL schema for the CareVis SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per persisted key. Values are strings: JSON for structured
-- records, bare strings for the completion flag and the role.
CREATE TABLE IF NOT EXISTS storage (
    key        TEXT PRIMARY KEY,   -- 'carevis-*' key space
    value      TEXT NOT NULL,
    updated_at TEXT NOT NULL       -- ISO 8601 UTC; set on every write
);

PRAGMA user_version = 1;
";
