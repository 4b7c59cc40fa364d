#![forbid(unsafe_code)]

use super::{DailyLogRow, DayRollup, SqliteStore, StoreError};
use dl_core::calendar::Day;
use dl_core::ids::UserId;
use rusqlite::{Connection, OptionalExtension, params};
use serde_json::json;

impl SqliteStore {
    /// Completion counts for one day, with the rate the day would commit at.
    pub fn day_rollup(&self, user: &UserId, day: Day) -> Result<DayRollup, StoreError> {
        rollup_on(&self.conn, user.as_str(), day)
    }

    /// Commit the day: recompute the rate from the day's tasks and upsert the
    /// daily log. The rate is always derived here; callers never supply one.
    /// Committing the same day again overwrites the previous log in place.
    pub fn day_complete(
        &mut self,
        user: &UserId,
        journal: Option<&str>,
        day: Day,
    ) -> Result<DailyLogRow, StoreError> {
        let now_ms = super::now_ms();
        let date = day.to_string();
        let tx = self.conn.transaction()?;
        super::ensure_user_tx(&tx, user, now_ms)?;

        let rollup = rollup_on(&tx, user.as_str(), day)?;

        tx.execute(
            r#"
            INSERT INTO daily_logs(user_id, date, achievement_rate, journal, commit_time_ms, created_at_ms, updated_at_ms)
            VALUES (?1, ?2, ?3, ?4, ?5, ?5, ?5)
            ON CONFLICT(user_id, date) DO UPDATE SET
                achievement_rate = excluded.achievement_rate,
                journal = excluded.journal,
                commit_time_ms = excluded.commit_time_ms,
                updated_at_ms = excluded.updated_at_ms
            "#,
            params![
                user.as_str(),
                date,
                i64::from(rollup.achievement_rate),
                journal,
                now_ms
            ],
        )?;

        let log = tx.query_row(
            r#"
            SELECT date, achievement_rate, journal, commit_time_ms, created_at_ms, updated_at_ms
            FROM daily_logs
            WHERE user_id = ?1 AND date = ?2
            "#,
            params![user.as_str(), date],
            map_daily_log_row,
        )?;

        super::insert_event_tx(
            &tx,
            user.as_str(),
            now_ms,
            None,
            "day_committed",
            &json!({
                "date": date,
                "achievement_rate": rollup.achievement_rate,
                "total": rollup.total,
                "completed": rollup.completed,
            })
            .to_string(),
        )?;

        tx.commit()?;
        Ok(log)
    }

    /// The committed log for one day, if the day was ever completed.
    pub fn daily_log_get(
        &self,
        user: &UserId,
        day: Day,
    ) -> Result<Option<DailyLogRow>, StoreError> {
        let row = self
            .conn
            .query_row(
                r#"
                SELECT date, achievement_rate, journal, commit_time_ms, created_at_ms, updated_at_ms
                FROM daily_logs
                WHERE user_id = ?1 AND date = ?2
                "#,
                params![user.as_str(), day.to_string()],
                map_daily_log_row,
            )
            .optional()?;
        Ok(row)
    }
}

fn rollup_on(conn: &Connection, user_id: &str, day: Day) -> Result<DayRollup, StoreError> {
    let (total, completed) = conn.query_row(
        r#"
        SELECT COUNT(1), COALESCE(SUM(is_completed), 0)
        FROM tasks
        WHERE user_id = ?1 AND date = ?2
        "#,
        params![user_id, day.to_string()],
        |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)),
    )?;

    let total = usize::try_from(total).unwrap_or(0);
    let completed = usize::try_from(completed).unwrap_or(0);
    Ok(DayRollup {
        total,
        completed,
        achievement_rate: dl_core::rollup::achievement_rate(completed, total),
    })
}

fn map_daily_log_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<DailyLogRow> {
    Ok(DailyLogRow {
        date: row.get(0)?,
        achievement_rate: row.get(1)?,
        journal: row.get(2)?,
        commit_time_ms: row.get(3)?,
        created_at_ms: row.get(4)?,
        updated_at_ms: row.get(5)?,
    })
}
