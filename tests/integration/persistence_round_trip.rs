use habitloop::commands::habit::{habits_create, habits_toggle_completion};
use habitloop::commands::weekly_target::{weekly_status_fetch, weekly_target_get};
use habitloop::commands::AppState;
use habitloop::db::DbPool;
use habitloop::db::repositories::storage_repository::StorageRepository;
use habitloop::models::habit::HabitCreateInput;
use tempfile::tempdir;

#[test]
fn collection_round_trips_through_reopened_storage() {
    let dir = tempdir().expect("temp dir");
    let db_path = dir.path().join("habitloop.sqlite");
    let state = AppState::new(DbPool::new(&db_path).expect("db pool"));

    // One habit with history (including an explicit false entry), one
    // never touched.
    let habits = habits_create(
        &state,
        HabitCreateInput {
            name: "Journal".into(),
            description: Some("three lines a day".into()),
            color: Some("bg-amber-500".into()),
        },
    )
    .expect("create journal");
    let journal_id = habits[0].id.clone();

    habits_create(
        &state,
        HabitCreateInput {
            name: "Hydrate".into(),
            ..Default::default()
        },
    )
    .expect("create hydrate");

    habits_toggle_completion(&state, &journal_id, "2024-02-01").expect("toggle");
    habits_toggle_completion(&state, &journal_id, "2024-02-02").expect("toggle");
    habits_toggle_completion(&state, &journal_id, "2024-02-02").expect("toggle back");

    let saved = state.habits().list().expect("list before reopen");

    let reopened = AppState::new(DbPool::new(&db_path).expect("reopen pool"));
    let reloaded = reopened.habits().list().expect("list after reopen");

    assert_eq!(reloaded, saved);
    assert_eq!(reloaded[0].completions.get("2024-02-01"), Some(&true));
    assert_eq!(reloaded[0].completions.get("2024-02-02"), Some(&false));
    assert!(reloaded[1].completions.is_empty());
}

#[test]
fn malformed_slots_degrade_to_defaults_with_an_error_free_read() {
    let dir = tempdir().expect("temp dir");
    let db_path = dir.path().join("habitloop.sqlite");
    let pool = DbPool::new(&db_path).expect("db pool");

    pool.with_connection(|conn| {
        StorageRepository::upsert(conn, "habit-tracker-data", "{\"definitely\": \"wrong\"}")?;
        StorageRepository::upsert(conn, "habit-tracker-weekly-targets", "not json at all")?;
        Ok(())
    })
    .expect("poison slots");

    let state = AppState::new(pool);

    let habits = state.habits().list().expect("habits degrade to empty");
    assert!(habits.is_empty());

    let data = weekly_target_get(&state).expect("weekly data degrades to default");
    assert_eq!(data.target, None);
    assert!(data.accomplishments.is_empty());

    // The derived weekly view still evaluates over the defaults.
    let status = weekly_status_fetch(&state).expect("status over defaults");
    assert!(!status.is_target_met);
    assert!(!status.newly_accomplished);
    assert_eq!(status.daily_completions.len(), 7);
}
