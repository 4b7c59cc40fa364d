#![forbid(unsafe_code)]

#[derive(Clone, Debug)]
pub struct SeasonGoalRow {
    pub id: String,
    pub title: String,
    pub start_date: String,
    pub end_date: String,
    pub is_active: bool,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

#[derive(Clone, Debug)]
pub struct MonthlyGoalRow {
    pub id: String,
    pub season_goal_id: String,
    pub title: String,
    pub month: i64,
    pub year: i64,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

#[derive(Clone, Debug)]
pub struct WeeklyGoalRow {
    pub id: String,
    pub monthly_goal_id: String,
    pub title: String,
    pub week_number: i64,
    pub start_date: String,
    pub end_date: String,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}
