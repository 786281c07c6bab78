pub mod habit_repository;
pub mod storage_repository;
pub mod weekly_target_repository;
