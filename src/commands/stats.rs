use crate::models::stats::{
    DailyCompletionPoint, HabitComparisonEntry, HabitStats, MonthlyRatePoint, OverviewStats,
};
use crate::services::stats_service;

use super::{AppState, CommandResult};

pub fn stats_overview_fetch(state: &AppState) -> CommandResult<OverviewStats> {
    let habits = state.habits().list()?;
    Ok(stats_service::overview(&habits))
}

pub fn habit_stats_fetch(state: &AppState, id: &str) -> CommandResult<HabitStats> {
    let habit = state.habits().get_habit(id)?;
    Ok(stats_service::compute_stats(&habit))
}

pub fn weekly_series_fetch(state: &AppState) -> CommandResult<Vec<DailyCompletionPoint>> {
    let habits = state.habits().list()?;
    Ok(stats_service::weekly_completion_series(&habits))
}

pub fn monthly_progress_fetch(state: &AppState) -> CommandResult<Vec<MonthlyRatePoint>> {
    let habits = state.habits().list()?;
    Ok(stats_service::monthly_completion_rates(&habits))
}

pub fn habit_comparison_fetch(state: &AppState) -> CommandResult<Vec<HabitComparisonEntry>> {
    let habits = state.habits().list()?;
    Ok(stats_service::habit_comparison(&habits))
}
