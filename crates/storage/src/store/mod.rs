#![forbid(unsafe_code)]

mod days;
mod error;
mod events;
mod goals;
mod history;
mod tasks;
mod types;

pub use error::StoreError;
pub use types::*;

use dl_core::ids::UserId;
use rusqlite::{Connection, OptionalExtension, Transaction, params};
use std::path::{Path, PathBuf};
use std::time::Duration;

const SCHEMA_VERSION: &str = "v1";

#[derive(Debug)]
pub struct SqliteStore {
    storage_dir: PathBuf,
    conn: Connection,
}

impl SqliteStore {
    pub fn open(storage_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let storage_dir = storage_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&storage_dir)?;
        let db_path = storage_dir.join("dayloop.db");
        let conn = Connection::open(db_path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        let store = Self { storage_dir, conn };
        store.migrate()?;
        Ok(store)
    }

    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    fn migrate(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            r#"
            PRAGMA journal_mode=WAL;
            PRAGMA synchronous=NORMAL;

            CREATE TABLE IF NOT EXISTS meta (
              key TEXT PRIMARY KEY,
              value TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS users (
              user_id TEXT PRIMARY KEY,
              name TEXT NOT NULL,
              created_at_ms INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS counters (
              user_id TEXT NOT NULL,
              name TEXT NOT NULL,
              value INTEGER NOT NULL,
              PRIMARY KEY (user_id, name)
            );

            CREATE TABLE IF NOT EXISTS season_goals (
              user_id TEXT NOT NULL,
              id TEXT NOT NULL,
              title TEXT NOT NULL,
              start_date TEXT NOT NULL,
              end_date TEXT NOT NULL,
              is_active INTEGER NOT NULL,
              created_at_ms INTEGER NOT NULL,
              updated_at_ms INTEGER NOT NULL,
              PRIMARY KEY (user_id, id)
            );

            CREATE TABLE IF NOT EXISTS monthly_goals (
              user_id TEXT NOT NULL,
              id TEXT NOT NULL,
              season_goal_id TEXT NOT NULL,
              title TEXT NOT NULL,
              month INTEGER NOT NULL,
              year INTEGER NOT NULL,
              created_at_ms INTEGER NOT NULL,
              updated_at_ms INTEGER NOT NULL,
              PRIMARY KEY (user_id, id)
            );

            CREATE INDEX IF NOT EXISTS idx_monthly_goals_user_year_month
              ON monthly_goals(user_id, year, month);

            CREATE TABLE IF NOT EXISTS weekly_goals (
              user_id TEXT NOT NULL,
              id TEXT NOT NULL,
              monthly_goal_id TEXT NOT NULL,
              title TEXT NOT NULL,
              week_number INTEGER NOT NULL,
              start_date TEXT NOT NULL,
              end_date TEXT NOT NULL,
              created_at_ms INTEGER NOT NULL,
              updated_at_ms INTEGER NOT NULL,
              PRIMARY KEY (user_id, id)
            );

            CREATE TABLE IF NOT EXISTS tasks (
              user_id TEXT NOT NULL,
              id TEXT NOT NULL,
              weekly_goal_id TEXT NOT NULL,
              title TEXT NOT NULL,
              date TEXT NOT NULL,
              duration_minutes INTEGER NOT NULL,
              is_completed INTEGER NOT NULL,
              created_at_ms INTEGER NOT NULL,
              updated_at_ms INTEGER NOT NULL,
              PRIMARY KEY (user_id, id)
            );

            CREATE INDEX IF NOT EXISTS idx_tasks_user_date
              ON tasks(user_id, date);

            CREATE TABLE IF NOT EXISTS daily_logs (
              user_id TEXT NOT NULL,
              date TEXT NOT NULL,
              achievement_rate INTEGER NOT NULL,
              journal TEXT,
              commit_time_ms INTEGER NOT NULL,
              created_at_ms INTEGER NOT NULL,
              updated_at_ms INTEGER NOT NULL,
              PRIMARY KEY (user_id, date)
            );

            CREATE TABLE IF NOT EXISTS events (
              seq INTEGER PRIMARY KEY AUTOINCREMENT,
              user_id TEXT NOT NULL,
              ts_ms INTEGER NOT NULL,
              entity_id TEXT,
              type TEXT NOT NULL,
              payload_json TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_events_user_seq ON events(user_id, seq);
            "#,
        )?;
        self.conn.execute(
            "INSERT OR IGNORE INTO meta(key, value) VALUES (?1, ?2)",
            params!["schema_version", SCHEMA_VERSION],
        )?;
        Ok(())
    }
}

fn now_ms() -> i64 {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    now.as_millis() as i64
}

fn ensure_user_tx(tx: &Transaction<'_>, user: &UserId, now_ms: i64) -> Result<(), StoreError> {
    tx.execute(
        "INSERT OR IGNORE INTO users(user_id, name, created_at_ms) VALUES (?1, ?1, ?2)",
        params![user.as_str(), now_ms],
    )?;
    Ok(())
}

fn next_counter_tx(tx: &Transaction<'_>, user_id: &str, name: &str) -> Result<i64, StoreError> {
    let current: i64 = tx
        .query_row(
            "SELECT value FROM counters WHERE user_id=?1 AND name=?2",
            params![user_id, name],
            |row| row.get(0),
        )
        .optional()?
        .unwrap_or(0);
    let next = current + 1;
    tx.execute(
        r#"
        INSERT INTO counters(user_id, name, value) VALUES (?1, ?2, ?3)
        ON CONFLICT(user_id, name) DO UPDATE SET value=excluded.value
        "#,
        params![user_id, name, next],
    )?;
    Ok(next)
}

fn insert_event_tx(
    tx: &Transaction<'_>,
    user_id: &str,
    ts_ms: i64,
    entity_id: Option<String>,
    event_type: &str,
    payload_json: &str,
) -> Result<EventRow, StoreError> {
    let entity_id_for_return = entity_id.clone();
    tx.execute(
        r#"
        INSERT INTO events(user_id, ts_ms, entity_id, type, payload_json)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
        params![user_id, ts_ms, entity_id, event_type, payload_json],
    )?;
    let seq = tx.last_insert_rowid();
    Ok(EventRow {
        seq,
        ts_ms,
        entity_id: entity_id_for_return,
        event_type: event_type.to_string(),
        payload_json: payload_json.to_string(),
    })
}

// Counter ids are zero-padded and stop sorting lexicographically past 999, so
// recency ordering always goes through created_at_ms with rowid as the
// insertion-order tie-break.
fn active_week_row(conn: &Connection, user_id: &str) -> Result<Option<WeeklyGoalRow>, StoreError> {
    Ok(conn
        .query_row(
            r#"
            SELECT id, monthly_goal_id, title, week_number, start_date, end_date, created_at_ms, updated_at_ms
            FROM weekly_goals
            WHERE user_id = ?1
            ORDER BY created_at_ms DESC, rowid DESC
            LIMIT 1
            "#,
            params![user_id],
            |row| {
                Ok(WeeklyGoalRow {
                    id: row.get(0)?,
                    monthly_goal_id: row.get(1)?,
                    title: row.get(2)?,
                    week_number: row.get(3)?,
                    start_date: row.get(4)?,
                    end_date: row.get(5)?,
                    created_at_ms: row.get(6)?,
                    updated_at_ms: row.get(7)?,
                })
            },
        )
        .optional()?)
}

fn to_sqlite_i64(value: usize) -> Result<i64, StoreError> {
    i64::try_from(value).map_err(|_| StoreError::InvalidInput("numeric overflow"))
}
