use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Persisted weekly-target state. `accomplishments` is append-only and
/// holds each week identifier at most once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WeeklyTargetData {
    pub target: Option<u32>,
    pub accomplishments: Vec<String>,
}

/// Result of one weekly-target evaluation. Derived on demand, never
/// persisted; `celebrating` reflects the transient celebration flag.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyStatus {
    pub week_id: String,
    /// The current Monday-start week's dates mapped to "every habit
    /// completed that day".
    pub daily_completions: BTreeMap<String, bool>,
    pub completed_days: u32,
    pub target: Option<u32>,
    pub is_target_met: bool,
    /// True only on the evaluation that recorded the accomplishment.
    pub newly_accomplished: bool,
    pub celebrating: bool,
}
