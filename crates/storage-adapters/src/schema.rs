//! Schema bootstrap.
//!
//! Applied once at startup (and by every test pool); all statements are
//! idempotent.

use domains::DomainResult;
use sqlx::SqlitePool;

use crate::sqlite::internal;

const STATEMENTS: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS accounts (
        id            BLOB PRIMARY KEY,
        name          TEXT NOT NULL,
        email         TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        role          TEXT NOT NULL,
        created_at    TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS queries (
        id           BLOB PRIMARY KEY,
        title        TEXT NOT NULL,
        description  TEXT NOT NULL,
        posted_by    BLOB NOT NULL,
        solution_ids TEXT NOT NULL DEFAULT '[]',
        created_at   TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS solutions (
        id             BLOB PRIMARY KEY,
        query_id       BLOB NOT NULL,
        expert_id      BLOB NOT NULL,
        content        TEXT NOT NULL,
        is_submitted   INTEGER NOT NULL DEFAULT 0,
        submitted_at   TEXT,
        last_edited_at TEXT,
        created_at     TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS feedback (
        id           BLOB PRIMARY KEY,
        from_id      BLOB NOT NULL,
        query_id     BLOB NOT NULL,
        solution_id  BLOB,
        to_expert_id BLOB,
        message      TEXT NOT NULL,
        rating       INTEGER,
        created_at   TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS tips (
        id           BLOB PRIMARY KEY,
        title        TEXT NOT NULL,
        content      TEXT NOT NULL,
        category     TEXT NOT NULL,
        expert_id    BLOB NOT NULL,
        is_published INTEGER NOT NULL DEFAULT 1,
        likes        TEXT NOT NULL DEFAULT '[]',
        views        INTEGER NOT NULL DEFAULT 0,
        created_at   TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_solutions_query ON solutions (query_id, created_at)",
    "CREATE INDEX IF NOT EXISTS idx_solutions_expert ON solutions (expert_id, created_at)",
    "CREATE INDEX IF NOT EXISTS idx_feedback_expert ON feedback (to_expert_id, created_at)",
    "CREATE INDEX IF NOT EXISTS idx_feedback_submitter ON feedback (from_id, query_id)",
    "CREATE INDEX IF NOT EXISTS idx_tips_expert ON tips (expert_id, created_at)",
];

/// Creates all tables and indexes if they do not exist yet.
pub async fn apply(pool: &SqlitePool) -> DomainResult<()> {
    for stmt in STATEMENTS {
        sqlx::query(stmt).execute(pool).await.map_err(internal)?;
    }
    Ok(())
}
