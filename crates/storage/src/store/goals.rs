#![forbid(unsafe_code)]

use super::{MonthlyGoalRow, SeasonGoalRow, SqliteStore, StoreError, WeeklyGoalRow};
use dl_core::calendar::Day;
use dl_core::ids::UserId;
use rusqlite::{OptionalExtension, Transaction, params};
use serde_json::json;

impl SqliteStore {
    /// Find the season goal covering the day, creating the quarter-spanning
    /// one when none exists yet.
    pub fn season_ensure(&mut self, user: &UserId, day: Day) -> Result<SeasonGoalRow, StoreError> {
        let now_ms = super::now_ms();
        let tx = self.conn.transaction()?;
        super::ensure_user_tx(&tx, user, now_ms)?;
        let season = season_ensure_tx(&tx, user.as_str(), day, now_ms)?;
        tx.commit()?;
        Ok(season)
    }

    /// Find the monthly goal for the day's month, creating it (and its season
    /// parent) when absent.
    pub fn month_ensure(&mut self, user: &UserId, day: Day) -> Result<MonthlyGoalRow, StoreError> {
        let now_ms = super::now_ms();
        let tx = self.conn.transaction()?;
        super::ensure_user_tx(&tx, user, now_ms)?;
        let month = month_ensure_tx(&tx, user.as_str(), day, now_ms)?;
        tx.commit()?;
        Ok(month)
    }

    /// Explicit creation for the day's month. An existing goal for that month
    /// is retitled in place so the one-per-month invariant holds.
    pub fn month_create(
        &mut self,
        user: &UserId,
        title: &str,
        day: Day,
    ) -> Result<MonthlyGoalRow, StoreError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(StoreError::InvalidInput("title must not be empty"));
        }

        let now_ms = super::now_ms();
        let tx = self.conn.transaction()?;
        super::ensure_user_tx(&tx, user, now_ms)?;

        let month = if let Some(mut existing) = month_find_tx(&tx, user.as_str(), day)? {
            if existing.title != title {
                tx.execute(
                    "UPDATE monthly_goals SET title=?3, updated_at_ms=?4 WHERE user_id=?1 AND id=?2",
                    params![user.as_str(), existing.id, title, now_ms],
                )?;
                super::insert_event_tx(
                    &tx,
                    user.as_str(),
                    now_ms,
                    Some(existing.id.clone()),
                    "month_updated",
                    &json!({"id": existing.id, "title": title}).to_string(),
                )?;
                existing.title = title.to_string();
                existing.updated_at_ms = now_ms;
            }
            existing
        } else {
            month_insert_tx(&tx, user.as_str(), day, title, now_ms)?
        };

        tx.commit()?;
        Ok(month)
    }

    /// Explicit creation of a weekly goal for the week containing the day.
    /// Always inserts: "active" is recency-based, so the newest one wins.
    pub fn week_create(
        &mut self,
        user: &UserId,
        title: &str,
        day: Day,
    ) -> Result<WeeklyGoalRow, StoreError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(StoreError::InvalidInput("title must not be empty"));
        }

        let now_ms = super::now_ms();
        let tx = self.conn.transaction()?;
        super::ensure_user_tx(&tx, user, now_ms)?;

        let month = month_ensure_tx(&tx, user.as_str(), day, now_ms)?;
        let (start, end) = day.week_sunday_bounds();
        let seq = super::next_counter_tx(&tx, user.as_str(), "week_seq")?;
        let id = format!("WEEK-{:03}", seq);

        tx.execute(
            r#"
            INSERT INTO weekly_goals(user_id, id, monthly_goal_id, title, week_number, start_date, end_date, created_at_ms, updated_at_ms)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
            "#,
            params![
                user.as_str(),
                id,
                month.id,
                title,
                i64::from(day.week_of_month()),
                start.to_string(),
                end.to_string(),
                now_ms
            ],
        )?;
        super::insert_event_tx(
            &tx,
            user.as_str(),
            now_ms,
            Some(id.clone()),
            "week_created",
            &json!({
                "id": id,
                "title": title,
                "monthly_goal_id": month.id,
                "start_date": start.to_string(),
                "end_date": end.to_string(),
            })
            .to_string(),
        )?;

        tx.commit()?;
        Ok(WeeklyGoalRow {
            id,
            monthly_goal_id: month.id,
            title: title.to_string(),
            week_number: i64::from(day.week_of_month()),
            start_date: start.to_string(),
            end_date: end.to_string(),
            created_at_ms: now_ms,
            updated_at_ms: now_ms,
        })
    }

    /// Most recently created weekly goal, or `None` when the user has none.
    pub fn week_active(&self, user: &UserId) -> Result<Option<WeeklyGoalRow>, StoreError> {
        super::active_week_row(&self.conn, user.as_str())
    }

    /// Most recently created monthly goal, regardless of month.
    pub fn month_latest(&self, user: &UserId) -> Result<Option<MonthlyGoalRow>, StoreError> {
        Ok(self
            .conn
            .query_row(
                r#"
                SELECT id, season_goal_id, title, month, year, created_at_ms, updated_at_ms
                FROM monthly_goals
                WHERE user_id = ?1
                ORDER BY created_at_ms DESC, rowid DESC
                LIMIT 1
                "#,
                params![user.as_str()],
                |row| {
                    Ok(MonthlyGoalRow {
                        id: row.get(0)?,
                        season_goal_id: row.get(1)?,
                        title: row.get(2)?,
                        month: row.get(3)?,
                        year: row.get(4)?,
                        created_at_ms: row.get(5)?,
                        updated_at_ms: row.get(6)?,
                    })
                },
            )
            .optional()?)
    }

    /// Retitle a monthly goal. Returns false without error when the id does
    /// not exist for this user, so callers cannot probe foreign goals.
    pub fn month_update(
        &mut self,
        user: &UserId,
        goal_id: &str,
        title: &str,
    ) -> Result<bool, StoreError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(StoreError::InvalidInput("title must not be empty"));
        }

        let now_ms = super::now_ms();
        let tx = self.conn.transaction()?;
        let updated = tx.execute(
            "UPDATE monthly_goals SET title=?3, updated_at_ms=?4 WHERE user_id=?1 AND id=?2",
            params![user.as_str(), goal_id, title, now_ms],
        )?;
        if updated > 0 {
            super::insert_event_tx(
                &tx,
                user.as_str(),
                now_ms,
                Some(goal_id.to_string()),
                "month_updated",
                &json!({"id": goal_id, "title": title}).to_string(),
            )?;
        }
        tx.commit()?;
        Ok(updated > 0)
    }

    /// Retitle a weekly goal, with the same silent no-op contract.
    pub fn week_update(
        &mut self,
        user: &UserId,
        goal_id: &str,
        title: &str,
    ) -> Result<bool, StoreError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(StoreError::InvalidInput("title must not be empty"));
        }

        let now_ms = super::now_ms();
        let tx = self.conn.transaction()?;
        let updated = tx.execute(
            "UPDATE weekly_goals SET title=?3, updated_at_ms=?4 WHERE user_id=?1 AND id=?2",
            params![user.as_str(), goal_id, title, now_ms],
        )?;
        if updated > 0 {
            super::insert_event_tx(
                &tx,
                user.as_str(),
                now_ms,
                Some(goal_id.to_string()),
                "week_updated",
                &json!({"id": goal_id, "title": title}).to_string(),
            )?;
        }
        tx.commit()?;
        Ok(updated > 0)
    }
}

pub(super) fn season_ensure_tx(
    tx: &Transaction<'_>,
    user_id: &str,
    day: Day,
    now_ms: i64,
) -> Result<SeasonGoalRow, StoreError> {
    let date = day.to_string();
    if let Some(existing) = tx
        .query_row(
            r#"
            SELECT id, title, start_date, end_date, is_active, created_at_ms, updated_at_ms
            FROM season_goals
            WHERE user_id = ?1 AND start_date <= ?2 AND end_date >= ?2
            ORDER BY start_date ASC, created_at_ms ASC, rowid ASC
            LIMIT 1
            "#,
            params![user_id, date],
            |row| {
                Ok(SeasonGoalRow {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    start_date: row.get(2)?,
                    end_date: row.get(3)?,
                    is_active: row.get(4)?,
                    created_at_ms: row.get(5)?,
                    updated_at_ms: row.get(6)?,
                })
            },
        )
        .optional()?
    {
        return Ok(existing);
    }

    let (start, end) = day.quarter_bounds();
    let seq = super::next_counter_tx(tx, user_id, "season_seq")?;
    let id = format!("SEASON-{:03}", seq);
    let title = format!("Season Q{} {}", day.quarter(), day.year());

    tx.execute(
        r#"
        INSERT INTO season_goals(user_id, id, title, start_date, end_date, is_active, created_at_ms, updated_at_ms)
        VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6, ?6)
        "#,
        params![user_id, id, title, start.to_string(), end.to_string(), now_ms],
    )?;
    super::insert_event_tx(
        tx,
        user_id,
        now_ms,
        Some(id.clone()),
        "season_created",
        &json!({
            "id": id,
            "title": title,
            "start_date": start.to_string(),
            "end_date": end.to_string(),
        })
        .to_string(),
    )?;

    Ok(SeasonGoalRow {
        id,
        title,
        start_date: start.to_string(),
        end_date: end.to_string(),
        is_active: true,
        created_at_ms: now_ms,
        updated_at_ms: now_ms,
    })
}

pub(super) fn month_ensure_tx(
    tx: &Transaction<'_>,
    user_id: &str,
    day: Day,
    now_ms: i64,
) -> Result<MonthlyGoalRow, StoreError> {
    if let Some(existing) = month_find_tx(tx, user_id, day)? {
        return Ok(existing);
    }
    let title = format!("Month {} {}", day.month(), day.year());
    month_insert_tx(tx, user_id, day, &title, now_ms)
}

fn month_find_tx(
    tx: &Transaction<'_>,
    user_id: &str,
    day: Day,
) -> Result<Option<MonthlyGoalRow>, StoreError> {
    Ok(tx
        .query_row(
            r#"
            SELECT id, season_goal_id, title, month, year, created_at_ms, updated_at_ms
            FROM monthly_goals
            WHERE user_id = ?1 AND month = ?2 AND year = ?3
            ORDER BY created_at_ms ASC, rowid ASC
            LIMIT 1
            "#,
            params![user_id, i64::from(day.month()), i64::from(day.year())],
            |row| {
                Ok(MonthlyGoalRow {
                    id: row.get(0)?,
                    season_goal_id: row.get(1)?,
                    title: row.get(2)?,
                    month: row.get(3)?,
                    year: row.get(4)?,
                    created_at_ms: row.get(5)?,
                    updated_at_ms: row.get(6)?,
                })
            },
        )
        .optional()?)
}

fn month_insert_tx(
    tx: &Transaction<'_>,
    user_id: &str,
    day: Day,
    title: &str,
    now_ms: i64,
) -> Result<MonthlyGoalRow, StoreError> {
    let season = season_ensure_tx(tx, user_id, day, now_ms)?;
    let seq = super::next_counter_tx(tx, user_id, "month_seq")?;
    let id = format!("MONTH-{:03}", seq);

    tx.execute(
        r#"
        INSERT INTO monthly_goals(user_id, id, season_goal_id, title, month, year, created_at_ms, updated_at_ms)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
        "#,
        params![
            user_id,
            id,
            season.id,
            title,
            i64::from(day.month()),
            i64::from(day.year()),
            now_ms
        ],
    )?;
    super::insert_event_tx(
        tx,
        user_id,
        now_ms,
        Some(id.clone()),
        "month_created",
        &json!({
            "id": id,
            "title": title,
            "season_goal_id": season.id,
            "month": day.month(),
            "year": day.year(),
        })
        .to_string(),
    )?;

    Ok(MonthlyGoalRow {
        id,
        season_goal_id: season.id,
        title: title.to_string(),
        month: i64::from(day.month()),
        year: i64::from(day.year()),
        created_at_ms: now_ms,
        updated_at_ms: now_ms,
    })
}
