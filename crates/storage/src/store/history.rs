#![forbid(unsafe_code)]

use std::collections::BTreeMap;

use super::{HistoryDay, HistoryLog, HistoryTask, SqliteStore, StoreError};
use dl_core::calendar::Day;
use dl_core::ids::UserId;
use rusqlite::params;

impl SqliteStore {
    /// One month of history, keyed by date in ascending order. A date shows
    /// up when it has a committed log, a completed task, or both; days with
    /// neither are absent rather than empty.
    pub fn month_history(
        &self,
        user: &UserId,
        year: i32,
        month: u8,
    ) -> Result<BTreeMap<String, HistoryDay>, StoreError> {
        let first = Day::try_new(year, month, 1)
            .map_err(|_| StoreError::InvalidInput("month must be a valid calendar month"))?;
        let (start, end) = first.month_bounds();
        let start = start.to_string();
        let end = end.to_string();

        let mut out: BTreeMap<String, HistoryDay> = BTreeMap::new();

        let mut stmt = self.conn.prepare(
            r#"
            SELECT date, achievement_rate, journal, commit_time_ms
            FROM daily_logs
            WHERE user_id = ?1 AND date BETWEEN ?2 AND ?3
            ORDER BY date ASC
            "#,
        )?;
        let logs = stmt.query_map(params![user.as_str(), start, end], |row| {
            Ok((
                row.get::<_, String>(0)?,
                HistoryLog {
                    achievement_rate: row.get(1)?,
                    journal: row.get(2)?,
                    commit_time_ms: row.get(3)?,
                },
            ))
        })?;
        for entry in logs {
            let (date, log) = entry?;
            out.entry(date).or_default().log = Some(log);
        }

        let mut stmt = self.conn.prepare(
            r#"
            SELECT date, id, title
            FROM tasks
            WHERE user_id = ?1 AND date BETWEEN ?2 AND ?3 AND is_completed = 1
            ORDER BY date ASC, created_at_ms ASC, rowid ASC
            "#,
        )?;
        let tasks = stmt.query_map(params![user.as_str(), start, end], |row| {
            Ok((
                row.get::<_, String>(0)?,
                HistoryTask {
                    id: row.get(1)?,
                    title: row.get(2)?,
                },
            ))
        })?;
        for entry in tasks {
            let (date, task) = entry?;
            out.entry(date).or_default().tasks.push(task);
        }

        Ok(out)
    }
}
