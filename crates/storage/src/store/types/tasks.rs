#![forbid(unsafe_code)]

/// A task always hangs off the weekly goal that was active when it was added.
#[derive(Clone, Debug)]
pub struct TaskRow {
    pub id: String,
    pub weekly_goal_id: String,
    pub title: String,
    pub date: String,
    pub duration_minutes: i64,
    pub is_completed: bool,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

/// Task payload for bulk creation at the start of a day.
#[derive(Clone, Debug)]
pub struct NewTask {
    pub title: String,
    pub duration_minutes: i64,
}

#[derive(Clone, Debug)]
pub struct DayStartOutcome {
    pub carried_over: usize,
    pub created: Vec<TaskRow>,
}
