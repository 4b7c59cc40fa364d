#![forbid(unsafe_code)]

/// One appended journal entry. `seq` is global across users; the public id is
/// `evt_` plus the zero-padded sequence, so ids sort in append order even as
/// plain strings.
#[derive(Clone, Debug)]
pub struct EventRow {
    pub seq: i64,
    pub ts_ms: i64,
    pub entity_id: Option<String>,
    pub event_type: String,
    pub payload_json: String,
}

impl EventRow {
    pub fn event_id(&self) -> String {
        format!("evt_{:016}", self.seq)
    }

    /// Inverse of [`event_id`](Self::event_id). `None` for anything that does
    /// not look like a cursor this store handed out, including signed suffixes
    /// (`i64` parsing would accept `evt_-5`).
    pub fn parse_event_id(raw: &str) -> Option<i64> {
        let seq = raw.strip_prefix("evt_")?;
        if seq.is_empty() || !seq.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        seq.parse().ok()
    }
}
