#![forbid(unsafe_code)]

use super::{DayStartOutcome, NewTask, SqliteStore, StoreError, TaskRow};
use dl_core::calendar::Day;
use dl_core::ids::UserId;
use rusqlite::{OptionalExtension, Transaction, params, params_from_iter};
use serde_json::json;

impl SqliteStore {
    /// Create a task for the given day against the active weekly goal.
    pub fn task_add(
        &mut self,
        user: &UserId,
        title: &str,
        duration_minutes: i64,
        day: Day,
    ) -> Result<TaskRow, StoreError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(StoreError::InvalidInput("title must not be empty"));
        }
        if duration_minutes < 0 {
            return Err(StoreError::InvalidInput(
                "duration_minutes must not be negative",
            ));
        }

        let now_ms = super::now_ms();
        let tx = self.conn.transaction()?;
        super::ensure_user_tx(&tx, user, now_ms)?;

        let Some(week) = super::active_week_row(&tx, user.as_str())? else {
            return Err(StoreError::NoActiveGoal);
        };

        let task = insert_task_tx(
            &tx,
            user.as_str(),
            &week.id,
            title,
            duration_minutes,
            day,
            now_ms,
        )?;
        super::insert_event_tx(
            &tx,
            user.as_str(),
            now_ms,
            Some(task.id.clone()),
            "task_added",
            &json!({
                "id": task.id,
                "title": task.title,
                "date": task.date,
                "weekly_goal_id": week.id,
            })
            .to_string(),
        )?;

        tx.commit()?;
        Ok(task)
    }

    /// Flip a task's completion state. Unknown or foreign ids return false
    /// without an error so callers cannot probe for existence.
    pub fn task_toggle(&mut self, user: &UserId, task_id: &str) -> Result<bool, StoreError> {
        let now_ms = super::now_ms();
        let tx = self.conn.transaction()?;

        let current = tx
            .query_row(
                "SELECT is_completed FROM tasks WHERE user_id=?1 AND id=?2",
                params![user.as_str(), task_id],
                |row| row.get::<_, bool>(0),
            )
            .optional()?;
        let Some(current) = current else {
            return Ok(false);
        };

        let next = !current;
        tx.execute(
            "UPDATE tasks SET is_completed=?3, updated_at_ms=?4 WHERE user_id=?1 AND id=?2",
            params![user.as_str(), task_id, next, now_ms],
        )?;
        super::insert_event_tx(
            &tx,
            user.as_str(),
            now_ms,
            Some(task_id.to_string()),
            "task_toggled",
            &json!({"id": task_id, "is_completed": next}).to_string(),
        )?;

        tx.commit()?;
        Ok(true)
    }

    /// Tasks for one day, or all of the user's tasks, newest first.
    pub fn task_list(
        &self,
        user: &UserId,
        on: Option<Day>,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<TaskRow>, StoreError> {
        let limit = super::to_sqlite_i64(limit)?;
        let offset = super::to_sqlite_i64(offset)?;

        if let Some(day) = on {
            let mut stmt = self.conn.prepare(
                r#"
                SELECT id, weekly_goal_id, title, date, duration_minutes, is_completed, created_at_ms, updated_at_ms
                FROM tasks
                WHERE user_id = ?1 AND date = ?2
                ORDER BY created_at_ms DESC, rowid DESC
                LIMIT ?3 OFFSET ?4
                "#,
            )?;
            let rows = stmt.query_map(
                params![user.as_str(), day.to_string(), limit, offset],
                map_task_row,
            )?;
            Ok(rows.collect::<Result<Vec<_>, _>>()?)
        } else {
            let mut stmt = self.conn.prepare(
                r#"
                SELECT id, weekly_goal_id, title, date, duration_minutes, is_completed, created_at_ms, updated_at_ms
                FROM tasks
                WHERE user_id = ?1
                ORDER BY created_at_ms DESC, rowid DESC
                LIMIT ?2 OFFSET ?3
                "#,
            )?;
            let rows = stmt.query_map(params![user.as_str(), limit, offset], map_task_row)?;
            Ok(rows.collect::<Result<Vec<_>, _>>()?)
        }
    }

    /// Unfinished tasks dated strictly before the day, oldest first. These
    /// are the carry-over candidates for a morning check.
    pub fn tasks_pending_before(
        &self,
        user: &UserId,
        day: Day,
    ) -> Result<Vec<TaskRow>, StoreError> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, weekly_goal_id, title, date, duration_minutes, is_completed, created_at_ms, updated_at_ms
            FROM tasks
            WHERE user_id = ?1 AND date < ?2 AND is_completed = 0
            ORDER BY date ASC, created_at_ms ASC, rowid ASC
            "#,
        )?;
        let rows = stmt.query_map(params![user.as_str(), day.to_string()], map_task_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Start the day in one transaction: re-date the chosen carry-over tasks,
    /// then create the new ones against the active weekly goal. If the goal
    /// is missing the whole call fails and the carry-over rolls back too.
    pub fn day_start(
        &mut self,
        user: &UserId,
        carry_over_ids: &[String],
        new_tasks: &[NewTask],
        day: Day,
    ) -> Result<DayStartOutcome, StoreError> {
        for task in new_tasks {
            if task.title.trim().is_empty() {
                return Err(StoreError::InvalidInput("title must not be empty"));
            }
            if task.duration_minutes < 0 {
                return Err(StoreError::InvalidInput(
                    "duration_minutes must not be negative",
                ));
            }
        }

        let now_ms = super::now_ms();
        let date = day.to_string();
        let tx = self.conn.transaction()?;
        super::ensure_user_tx(&tx, user, now_ms)?;

        // Scoped to the user: foreign ids in the list simply match nothing.
        let mut carried_over = 0usize;
        if !carry_over_ids.is_empty() {
            let placeholders = carry_over_ids
                .iter()
                .map(|_| "?")
                .collect::<Vec<_>>()
                .join(", ");
            let sql = format!(
                "UPDATE tasks SET date = ?, updated_at_ms = ? WHERE user_id = ? AND id IN ({placeholders})"
            );
            let mut sql_params = Vec::<rusqlite::types::Value>::new();
            sql_params.push(rusqlite::types::Value::Text(date.clone()));
            sql_params.push(rusqlite::types::Value::Integer(now_ms));
            sql_params.push(rusqlite::types::Value::Text(user.as_str().to_string()));
            for id in carry_over_ids {
                sql_params.push(rusqlite::types::Value::Text(id.clone()));
            }
            carried_over = tx.execute(&sql, params_from_iter(sql_params))?;
        }

        let mut created = Vec::with_capacity(new_tasks.len());
        if !new_tasks.is_empty() {
            let Some(week) = super::active_week_row(&tx, user.as_str())? else {
                return Err(StoreError::NoActiveGoal);
            };
            for task in new_tasks {
                created.push(insert_task_tx(
                    &tx,
                    user.as_str(),
                    &week.id,
                    task.title.trim(),
                    task.duration_minutes,
                    day,
                    now_ms,
                )?);
            }
        }

        super::insert_event_tx(
            &tx,
            user.as_str(),
            now_ms,
            None,
            "day_started",
            &json!({
                "date": date,
                "carried_over": carried_over,
                "created": created.len(),
            })
            .to_string(),
        )?;

        tx.commit()?;
        Ok(DayStartOutcome {
            carried_over,
            created,
        })
    }
}

fn insert_task_tx(
    tx: &Transaction<'_>,
    user_id: &str,
    weekly_goal_id: &str,
    title: &str,
    duration_minutes: i64,
    day: Day,
    now_ms: i64,
) -> Result<TaskRow, StoreError> {
    let seq = super::next_counter_tx(tx, user_id, "task_seq")?;
    let id = format!("TASK-{:03}", seq);
    let date = day.to_string();

    tx.execute(
        r#"
        INSERT INTO tasks(user_id, id, weekly_goal_id, title, date, duration_minutes, is_completed, created_at_ms, updated_at_ms)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, ?7, ?7)
        "#,
        params![user_id, id, weekly_goal_id, title, date, duration_minutes, now_ms],
    )?;

    Ok(TaskRow {
        id,
        weekly_goal_id: weekly_goal_id.to_string(),
        title: title.to_string(),
        date,
        duration_minutes,
        is_completed: false,
        created_at_ms: now_ms,
        updated_at_ms: now_ms,
    })
}

fn map_task_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<TaskRow> {
    Ok(TaskRow {
        id: row.get(0)?,
        weekly_goal_id: row.get(1)?,
        title: row.get(2)?,
        date: row.get(3)?,
        duration_minutes: row.get(4)?,
        is_completed: row.get(5)?,
        created_at_ms: row.get(6)?,
        updated_at_ms: row.get(7)?,
    })
}
