#![forbid(unsafe_code)]

use super::{EventRow, SqliteStore, StoreError};
use dl_core::ids::UserId;
use rusqlite::params;

impl SqliteStore {
    /// Events for one user in append order, optionally resuming after a
    /// previously seen event id.
    pub fn list_events(
        &self,
        user: &UserId,
        since_event_id: Option<&str>,
        limit: usize,
    ) -> Result<Vec<EventRow>, StoreError> {
        let since_seq = match since_event_id {
            None => 0i64,
            Some(event_id) => EventRow::parse_event_id(event_id).ok_or(
                StoreError::InvalidInput("since must be like evt_<16-digit-seq>"),
            )?,
        };
        let limit = super::to_sqlite_i64(limit)?;

        let mut stmt = self.conn.prepare(
            r#"
            SELECT seq, ts_ms, entity_id, type, payload_json
            FROM events
            WHERE user_id = ?1 AND seq > ?2
            ORDER BY seq ASC
            LIMIT ?3
            "#,
        )?;
        let rows = stmt.query_map(params![user.as_str(), since_seq, limit], |row| {
            Ok(EventRow {
                seq: row.get(0)?,
                ts_ms: row.get(1)?,
                entity_id: row.get(2)?,
                event_type: row.get(3)?,
                payload_json: row.get(4)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}
