use habitloop::commands::habit::{
    habits_create, habits_delete, habits_list, habits_toggle_completion, habits_update,
    HabitListFilters,
};
use habitloop::commands::stats::habit_stats_fetch;
use habitloop::commands::AppState;
use habitloop::db::DbPool;
use habitloop::models::habit::HabitCreateInput;
use tempfile::tempdir;

#[test]
fn habit_crud_and_stats_flow() {
    let dir = tempdir().expect("temp dir");
    let db_path = dir.path().join("habitloop.sqlite");
    let pool = DbPool::new(&db_path).expect("db pool");
    let state = AppState::new(pool);

    let habits = habits_create(
        &state,
        HabitCreateInput {
            name: "Morning run".into(),
            description: Some("5km before work".into()),
            color: Some("bg-blue-500".into()),
        },
    )
    .expect("create first habit");
    assert_eq!(habits.len(), 1);
    let run_id = habits[0].id.clone();

    let habits = habits_create(
        &state,
        HabitCreateInput {
            name: "Read 30 minutes".into(),
            ..Default::default()
        },
    )
    .expect("create second habit");
    assert_eq!(habits.len(), 2);
    let read_id = habits[1].id.clone();

    // Collection order is insertion order, stable across reads.
    let listed = habits_list(&state, None).expect("list habits");
    assert_eq!(listed.total, 2);
    assert_eq!(listed.items[0].habit.id, run_id);
    assert_eq!(listed.items[1].habit.id, read_id);

    // Record a short history for the runner.
    for date in ["2024-03-04", "2024-03-05", "2024-03-06"] {
        habits_toggle_completion(&state, &run_id, date).expect("toggle completion");
    }
    // 03-05 toggled back: stays tracked as an explicit false entry.
    let habits = habits_toggle_completion(&state, &run_id, "2024-03-05").expect("toggle back");
    let runner = habits
        .iter()
        .find(|habit| habit.id == run_id)
        .expect("runner present");
    assert_eq!(runner.completions.get("2024-03-05"), Some(&false));

    let stats = habit_stats_fetch(&state, &run_id).expect("runner stats");
    assert_eq!(stats.total_days, 3);
    assert_eq!(stats.total_completions, 2);
    assert_eq!(stats.longest_streak, 1);
    assert!((stats.completion_rate - 66.666_666).abs() < 0.001);

    // Rename through a full-record update.
    let mut updated = runner.clone();
    updated.name = "Evening run".into();
    let habits = habits_update(&state, updated).expect("update habit");
    assert!(habits.iter().any(|habit| habit.name == "Evening run"));

    // Unknown id is an error, not a silent no-op.
    let mut ghost = habits[0].clone();
    ghost.id = "missing".into();
    let error = habits_update(&state, ghost).expect_err("unknown id");
    assert_eq!(error.code, "NOT_FOUND");

    // Search matches the renamed habit.
    let filtered = habits_list(
        &state,
        Some(HabitListFilters {
            search: Some("evening".into()),
            ..Default::default()
        }),
    )
    .expect("search");
    assert_eq!(filtered.total, 1);

    // Deletion removes the habit and its completions for good.
    let habits = habits_delete(&state, &run_id).expect("delete habit");
    assert_eq!(habits.len(), 1);
    let error = habit_stats_fetch(&state, &run_id).expect_err("stats for deleted habit");
    assert_eq!(error.code, "NOT_FOUND");

    // Idempotent: deleting again leaves the collection unchanged.
    let habits = habits_delete(&state, &run_id).expect("repeat delete");
    assert_eq!(habits.len(), 1);
    assert_eq!(habits[0].id, read_id);
}
