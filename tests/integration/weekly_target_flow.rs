use std::sync::Arc;

use chrono::NaiveDate;
use habitloop::db::DbPool;
use habitloop::models::habit::HabitCreateInput;
use habitloop::services::habit_service::HabitService;
use habitloop::services::weekly_target_service::WeeklyTargetService;
use tempfile::tempdir;

fn day(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").expect("test date")
}

#[test]
fn weekly_target_accomplishment_flow() {
    let dir = tempdir().expect("temp dir");
    let db_path = dir.path().join("habitloop.sqlite");
    let pool = DbPool::new(&db_path).expect("db pool");

    let habit_service = Arc::new(HabitService::new(pool.clone()));
    let weekly_service = WeeklyTargetService::new(pool.clone(), Arc::clone(&habit_service));

    let habits = habit_service
        .create_habit(HabitCreateInput {
            name: "Stretch".into(),
            ..Default::default()
        })
        .expect("create habit");
    let habit_id = habits[0].id.clone();

    weekly_service.set_target(3).expect("set target");

    // Wednesday 2024-01-10 anchors the Monday-start week 01-08..01-14.
    let anchor = day("2024-01-10");

    // Two complete days: target of three not met yet.
    for date in ["2024-01-08", "2024-01-09"] {
        habit_service
            .toggle_completion(&habit_id, date)
            .expect("toggle");
    }
    let status = weekly_service.refresh_at(anchor).expect("early refresh");
    assert_eq!(status.completed_days, 2);
    assert!(!status.is_target_met);
    assert!(!status.newly_accomplished);

    // Third complete day tips the week over the target.
    habit_service
        .toggle_completion(&habit_id, "2024-01-10")
        .expect("toggle");
    let status = weekly_service.refresh_at(anchor).expect("met refresh");
    assert!(status.is_target_met);
    assert!(status.newly_accomplished);
    assert!(status.celebrating);

    // Re-running the recompute step within the same week stays
    // idempotent: one recorded accomplishment, no second celebration.
    for _ in 0..4 {
        let repeat = weekly_service.refresh_at(anchor).expect("repeat refresh");
        assert!(repeat.is_target_met);
        assert!(!repeat.newly_accomplished);
    }
    let data = weekly_service.get().expect("target data");
    assert_eq!(data.accomplishments, vec!["2024-W2".to_string()]);

    // Accomplishments survive a full service rebuild on the same file.
    drop(weekly_service);
    let reopened_pool = DbPool::new(&db_path).expect("reopen pool");
    let reopened_habits = Arc::new(HabitService::new(reopened_pool.clone()));
    let reopened = WeeklyTargetService::new(reopened_pool, reopened_habits);

    let data = reopened.get().expect("reloaded data");
    assert_eq!(data.target, Some(3));
    assert_eq!(data.accomplishments, vec!["2024-W2".to_string()]);

    let status = reopened.refresh_at(anchor).expect("refresh after reopen");
    assert!(status.is_target_met);
    assert!(!status.newly_accomplished);
}
