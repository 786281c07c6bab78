use rusqlite::Connection;
use tracing::warn;

use crate::db::repositories::storage_repository::StorageRepository;
use crate::error::AppResult;
use crate::models::weekly_target::WeeklyTargetData;

const STORAGE_KEY: &str = "habit-tracker-weekly-targets";

/// Owns the weekly-target slot. Missing or malformed payloads degrade
/// to the empty default (no target, no accomplishments).
pub struct WeeklyTargetRepository;

impl WeeklyTargetRepository {
    pub fn load(conn: &Connection) -> AppResult<WeeklyTargetData> {
        let Some(row) = StorageRepository::get(conn, STORAGE_KEY)? else {
            return Ok(WeeklyTargetData::default());
        };

        match serde_json::from_str(&row.value) {
            Ok(data) => Ok(data),
            Err(error) => {
                warn!(
                    target: "app::storage",
                    error = %error,
                    "stored weekly target payload is malformed, falling back to defaults"
                );
                Ok(WeeklyTargetData::default())
            }
        }
    }

    pub fn save(conn: &Connection, data: &WeeklyTargetData) -> AppResult<()> {
        let payload = serde_json::to_string(data)?;
        StorageRepository::upsert(conn, STORAGE_KEY, &payload)
    }
}
