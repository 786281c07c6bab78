use chrono::{NaiveDate, Utc};
use tracing::{debug, info};

use crate::db::repositories::habit_repository::HabitRepository;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::habit::{Habit, HabitCreateInput};

const MAX_NAME_CHARS: usize = 120;

/// The habit store: CRUD plus completion toggling over the persisted
/// collection. Every mutation loads the collection, applies the change
/// and writes the whole collection back before returning it, so the
/// caller always observes the durable state.
#[derive(Clone)]
pub struct HabitService {
    db: DbPool,
}

impl HabitService {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    pub fn list(&self) -> AppResult<Vec<Habit>> {
        let habits = self.db.with_connection(HabitRepository::load)?;
        debug!(count = habits.len(), "habits listed");
        Ok(habits)
    }

    pub fn get_habit(&self, id: &str) -> AppResult<Habit> {
        let habits = self.db.with_connection(HabitRepository::load)?;
        habits
            .into_iter()
            .find(|habit| habit.id == id)
            .ok_or_else(AppError::not_found)
    }

    pub fn create_habit(&self, input: HabitCreateInput) -> AppResult<Vec<Habit>> {
        let name = normalize_name(&input.name)?;
        let habit = Habit {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            description: normalize_optional_string(input.description),
            color: normalize_optional_string(input.color),
            created_at: Utc::now().to_rfc3339(),
            completions: Default::default(),
        };
        let habit_id = habit.id.clone();

        let habits = self.db.with_connection(|conn| {
            let mut habits = HabitRepository::load(conn)?;
            habits.push(habit);
            HabitRepository::save(conn, &habits)?;
            Ok(habits)
        })?;

        info!(habit_id = %habit_id, "habit created");
        Ok(habits)
    }

    pub fn update_habit(&self, mut habit: Habit) -> AppResult<Vec<Habit>> {
        habit.name = normalize_name(&habit.name)?;
        habit.description = normalize_optional_string(habit.description.take());
        habit.color = normalize_optional_string(habit.color.take());
        let habit_id = habit.id.clone();

        let habits = self.db.with_connection(|conn| {
            let mut habits = HabitRepository::load(conn)?;
            let slot = habits
                .iter_mut()
                .find(|existing| existing.id == habit.id)
                .ok_or_else(AppError::not_found)?;
            *slot = habit;
            HabitRepository::save(conn, &habits)?;
            Ok(habits)
        })?;

        info!(habit_id = %habit_id, "habit updated");
        Ok(habits)
    }

    /// Deleting is idempotent: an unknown id returns the collection
    /// unchanged. A real deletion drops the habit together with its
    /// completion record.
    pub fn delete_habit(&self, id: &str) -> AppResult<Vec<Habit>> {
        let habits = self.db.with_connection(|conn| {
            let mut habits = HabitRepository::load(conn)?;
            let before = habits.len();
            habits.retain(|habit| habit.id != id);
            if habits.len() < before {
                info!(habit_id = %id, "habit deleted");
            } else {
                debug!(habit_id = %id, "delete ignored, habit not found");
            }
            HabitRepository::save(conn, &habits)?;
            Ok(habits)
        })?;

        Ok(habits)
    }

    /// Flips the completion flag for one day. An absent entry counts as
    /// not completed, so the first toggle records `true`; toggling back
    /// leaves an explicit `false` entry in place.
    pub fn toggle_completion(&self, id: &str, date: &str) -> AppResult<Vec<Habit>> {
        let date = normalize_date(date)?;

        let habits = self.db.with_connection(|conn| {
            let mut habits = HabitRepository::load(conn)?;
            let habit = habits
                .iter_mut()
                .find(|habit| habit.id == id)
                .ok_or_else(AppError::not_found)?;

            let entry = habit.completions.entry(date.clone()).or_insert(false);
            *entry = !*entry;
            let completed = *entry;

            HabitRepository::save(conn, &habits)?;
            info!(habit_id = %id, %date, completed, "completion toggled");
            Ok(habits)
        })?;

        Ok(habits)
    }
}

fn normalize_name(name: &str) -> AppResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("习惯名称不能为空"));
    }
    if trimmed.chars().count() > MAX_NAME_CHARS {
        return Err(AppError::validation("习惯名称长度需在 120 字以内"));
    }
    Ok(trimmed.to_string())
}

fn normalize_optional_string(value: Option<String>) -> Option<String> {
    value.and_then(|val| {
        let trimmed = val.trim().to_string();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    })
}

fn normalize_date(date: &str) -> AppResult<String> {
    let trimmed = date.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map_err(|_| AppError::validation("日期格式非法，应为 YYYY-MM-DD"))?;
    Ok(trimmed.to_string())
}
