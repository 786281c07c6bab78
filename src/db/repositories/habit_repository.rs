use rusqlite::Connection;
use tracing::warn;

use crate::db::repositories::storage_repository::StorageRepository;
use crate::error::AppResult;
use crate::models::habit::Habit;

/// Storage key shared with earlier releases; existing payloads keep
/// loading unchanged.
const STORAGE_KEY: &str = "habit-tracker-data";

/// Owns the habit collection slot: its key, its JSON encoding, and its
/// empty default. A missing or malformed payload degrades to an empty
/// collection instead of failing the caller.
pub struct HabitRepository;

impl HabitRepository {
    pub fn load(conn: &Connection) -> AppResult<Vec<Habit>> {
        let Some(row) = StorageRepository::get(conn, STORAGE_KEY)? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str(&row.value) {
            Ok(habits) => Ok(habits),
            Err(error) => {
                warn!(
                    target: "app::storage",
                    error = %error,
                    "stored habit payload is malformed, falling back to empty collection"
                );
                Ok(Vec::new())
            }
        }
    }

    pub fn save(conn: &Connection, habits: &[Habit]) -> AppResult<()> {
        let payload = serde_json::to_string(habits)?;
        StorageRepository::upsert(conn, STORAGE_KEY, &payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbPool;
    use tempfile::tempdir;

    fn sample_habit(id: &str) -> Habit {
        let mut habit = Habit {
            id: id.to_string(),
            name: format!("habit-{id}"),
            description: None,
            color: Some("bg-blue-500".to_string()),
            created_at: "2024-03-01T08:00:00Z".to_string(),
            completions: Default::default(),
        };
        habit.completions.insert("2024-03-01".to_string(), true);
        habit.completions.insert("2024-03-02".to_string(), false);
        habit
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempdir().expect("temp dir");
        let pool = DbPool::new(dir.path().join("habits.sqlite")).expect("db pool");

        let habits = vec![sample_habit("a"), sample_habit("b")];
        pool.with_connection(|conn| HabitRepository::save(conn, &habits))
            .expect("save habits");

        let loaded = pool
            .with_connection(HabitRepository::load)
            .expect("load habits");
        assert_eq!(loaded, habits);
    }

    #[test]
    fn missing_slot_loads_empty() {
        let dir = tempdir().expect("temp dir");
        let pool = DbPool::new(dir.path().join("habits.sqlite")).expect("db pool");

        let loaded = pool
            .with_connection(HabitRepository::load)
            .expect("load habits");
        assert!(loaded.is_empty());
    }

    #[test]
    fn malformed_slot_degrades_to_empty() {
        let dir = tempdir().expect("temp dir");
        let pool = DbPool::new(dir.path().join("habits.sqlite")).expect("db pool");

        pool.with_connection(|conn| {
            StorageRepository::upsert(conn, super::STORAGE_KEY, "{not json")
        })
        .expect("poison slot");

        let loaded = pool
            .with_connection(HabitRepository::load)
            .expect("load habits");
        assert!(loaded.is_empty());
    }
}
