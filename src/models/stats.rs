use serde::Serialize;

/// Per-habit statistics, wholly recomputed from the completion record
/// on every request. Nothing here is persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitStats {
    /// Current consecutive-day run ending at or adjacent to today.
    pub streak: u32,
    /// Longest run of completed entries over the recorded history.
    pub longest_streak: u32,
    /// Completed share of tracked days, as a percentage.
    pub completion_rate: f64,
    pub total_completions: u32,
    pub total_days: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewStats {
    pub total_habits: usize,
    pub completion_rate: f64,
    pub longest_streak: u32,
    pub average_streak: f64,
}

/// One day of the trailing-week completion chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyCompletionPoint {
    pub date: String,
    pub weekday: String,
    pub completions: u32,
    pub total: usize,
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyRatePoint {
    /// `YYYY-MM` month key.
    pub month: String,
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitComparisonEntry {
    pub name: String,
    pub completion_rate: f64,
    pub streak: u32,
    pub total_completions: u32,
}
