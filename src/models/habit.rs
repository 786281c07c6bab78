use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A trackable recurring activity with a per-date completion record.
///
/// `completions` maps `YYYY-MM-DD` date keys to a completed flag. An
/// absent key means "not completed"; explicit `false` entries are
/// tolerated and preserved. The sorted map keeps entries in calendar
/// order, which the statistics functions rely on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub created_at: String,
    #[serde(default)]
    pub completions: BTreeMap<String, bool>,
}

impl Habit {
    pub fn is_completed_on(&self, date: &str) -> bool {
        self.completions.get(date).copied().unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HabitCreateInput {
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
}
