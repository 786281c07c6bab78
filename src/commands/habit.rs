use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::habit::{Habit, HabitCreateInput};
use crate::models::stats::HabitStats;
use crate::services::stats_service;

use super::{AppState, CommandResult};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HabitListFilters {
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitWithStats {
    #[serde(flatten)]
    pub habit: Habit,
    pub stats: HabitStats,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitListResponse {
    pub items: Vec<HabitWithStats>,
    pub total: usize,
}

pub fn habits_list(
    state: &AppState,
    filters: Option<HabitListFilters>,
) -> CommandResult<HabitListResponse> {
    let habits = state.habits().list()?;
    let filters = filters.unwrap_or_default();
    let today = Local::now().date_naive();

    let search = filters
        .search
        .map(|value| value.trim().to_lowercase())
        .filter(|value| !value.is_empty());

    let mut filtered: Vec<Habit> = habits
        .into_iter()
        .filter(|habit| matches_search(habit, search.as_deref()))
        .collect();

    sort_habits(
        &mut filtered,
        filters.sort_by.as_deref(),
        filters.sort_order.as_deref(),
    );

    let total = filtered.len();
    let items = filtered
        .into_iter()
        .map(|habit| {
            let stats = stats_service::compute_stats_at(&habit, today);
            HabitWithStats { habit, stats }
        })
        .collect::<Vec<_>>();

    debug!(target: "app::command", total, returned = items.len(), "habits_list");

    Ok(HabitListResponse { items, total })
}

pub fn habits_create(state: &AppState, payload: HabitCreateInput) -> CommandResult<Vec<Habit>> {
    Ok(state.habits().create_habit(payload)?)
}

pub fn habits_update(state: &AppState, payload: Habit) -> CommandResult<Vec<Habit>> {
    Ok(state.habits().update_habit(payload)?)
}

pub fn habits_delete(state: &AppState, id: &str) -> CommandResult<Vec<Habit>> {
    Ok(state.habits().delete_habit(id)?)
}

pub fn habits_toggle_completion(
    state: &AppState,
    id: &str,
    date: &str,
) -> CommandResult<Vec<Habit>> {
    Ok(state.habits().toggle_completion(id, date)?)
}

fn matches_search(habit: &Habit, search: Option<&str>) -> bool {
    let Some(search) = search else {
        return true;
    };

    let in_name = habit.name.to_lowercase().contains(search);
    let in_description = habit
        .description
        .as_ref()
        .map(|desc| desc.to_lowercase().contains(search))
        .unwrap_or(false);
    in_name || in_description
}

fn sort_habits(habits: &mut [Habit], sort_by: Option<&str>, sort_order: Option<&str>) {
    let order_desc = sort_order.unwrap_or("asc").eq_ignore_ascii_case("desc");
    let key = sort_by.unwrap_or("createdAt");

    habits.sort_by(|a, b| {
        let ordering = match key {
            "name" => a.name.cmp(&b.name),
            _ => compare_timestamp(&a.created_at, &b.created_at),
        };

        if order_desc {
            ordering.reverse()
        } else {
            ordering
        }
    });
}

fn compare_timestamp(a: &str, b: &str) -> std::cmp::Ordering {
    let ts_a = parse_timestamp(a).unwrap_or_default();
    let ts_b = parse_timestamp(b).unwrap_or_default();
    ts_a.cmp(&ts_b)
}

fn parse_timestamp(value: &str) -> Option<i64> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.timestamp_millis())
        .ok()
}
