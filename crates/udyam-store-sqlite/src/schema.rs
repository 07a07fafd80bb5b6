//! SQL schema for the Udyam SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS applications (
    app_id                  TEXT PRIMARY KEY,
    entrepreneur_name       TEXT,
    aadhaar_last4           TEXT,
    aadhaar_hash            TEXT,              -- sha256 hex; raw number never stored
    aadhaar_consent         INTEGER NOT NULL DEFAULT 0,
    aadhaar_verified        INTEGER NOT NULL DEFAULT 0,
    aadhaar_verified_at     TEXT,
    pan_masked              TEXT,
    pan_hash                TEXT,              -- sha256 hex; raw PAN never stored
    pan_holder_name         TEXT,
    dob_or_doi              TEXT,              -- YYYY-MM-DD
    type_of_organisation    TEXT,
    previous_year_itr_filed INTEGER,           -- NULL = unknown
    has_gstin_status        TEXT,              -- '1' | '2' | '3' | NULL
    pan_verified            INTEGER NOT NULL DEFAULT 0,
    pan_verified_at         TEXT,
    status                  TEXT NOT NULL DEFAULT 'draft',  -- 'draft' | 'submitted'
    form_payload            TEXT NOT NULL DEFAULT '{}',
    last_validation_errors  TEXT,
    created_at              TEXT NOT NULL,
    updated_at              TEXT NOT NULL
);

-- Attempts are strictly append-only.
-- No UPDATE is ever issued against this table; rows go only with their parent.
CREATE TABLE IF NOT EXISTS verification_attempts (
    attempt_id  TEXT PRIMARY KEY,
    app_id      TEXT NOT NULL REFERENCES applications(app_id) ON DELETE CASCADE,
    kind        TEXT NOT NULL,   -- 'aadhaar_otp' | 'pan'
    success     INTEGER NOT NULL DEFAULT 0,
    payload     TEXT NOT NULL DEFAULT '{}',
    message     TEXT,
    created_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS applications_aadhaar_hash_idx ON applications(aadhaar_hash);
CREATE INDEX IF NOT EXISTS applications_pan_hash_idx     ON applications(pan_hash);
CREATE INDEX IF NOT EXISTS applications_pan_masked_idx   ON applications(pan_masked);
CREATE INDEX IF NOT EXISTS applications_status_idx       ON applications(status);
CREATE INDEX IF NOT EXISTS attempts_app_idx              ON verification_attempts(app_id);
CREATE INDEX IF NOT EXISTS attempts_kind_idx             ON verification_attempts(kind);

PRAGMA user_version = 1;
";
