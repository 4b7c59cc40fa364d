#![forbid(unsafe_code)]

#[derive(Clone, Debug)]
pub struct DailyLogRow {
    pub date: String,
    pub achievement_rate: i64,
    pub journal: Option<String>,
    pub commit_time_ms: i64,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

/// Completion state of a single day's tasks, before or after commit.
#[derive(Clone, Debug)]
pub struct DayRollup {
    pub total: usize,
    pub completed: usize,
    pub achievement_rate: u8,
}
