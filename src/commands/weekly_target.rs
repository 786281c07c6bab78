use crate::models::weekly_target::{WeeklyStatus, WeeklyTargetData};

use super::{AppState, CommandResult};

pub fn weekly_target_get(state: &AppState) -> CommandResult<WeeklyTargetData> {
    Ok(state.weekly_target().get()?)
}

pub fn weekly_target_set(state: &AppState, target: u32) -> CommandResult<WeeklyTargetData> {
    Ok(state.weekly_target().set_target(target)?)
}

/// The explicit recompute step: the shell calls this after every habit
/// or target mutation instead of relying on hidden reactivity.
pub fn weekly_status_fetch(state: &AppState) -> CommandResult<WeeklyStatus> {
    Ok(state.weekly_target().refresh()?)
}
