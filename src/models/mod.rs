pub mod auth;
pub mod habit;
pub mod stats;
pub mod weekly_target;
