pub mod auth_service;
pub mod habit_service;
pub mod stats_service;
pub mod weekly_target_service;
