#![forbid(unsafe_code)]

#[derive(Clone, Debug)]
pub struct HistoryLog {
    pub achievement_rate: i64,
    pub journal: Option<String>,
    pub commit_time_ms: i64,
}

#[derive(Clone, Debug)]
pub struct HistoryTask {
    pub id: String,
    pub title: String,
}

/// One calendar day of a month's history: the committed log, if any, plus the
/// tasks completed that day.
#[derive(Clone, Debug, Default)]
pub struct HistoryDay {
    pub log: Option<HistoryLog>,
    pub tasks: Vec<HistoryTask>,
}
