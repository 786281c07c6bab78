pub mod auth;
pub mod habit;
pub mod stats;
pub mod weekly_target;

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::error;

use crate::db::DbPool;
use crate::error::AppError;
use crate::services::auth_service::{AuthService, MockCredentialProvider};
use crate::services::habit_service::HabitService;
use crate::services::weekly_target_service::WeeklyTargetService;

/// Wires the storage pool and services together; the single entry
/// point a UI shell holds on to. All commands are synchronous and
/// assume one caller at a time.
#[derive(Clone)]
pub struct AppState {
    db_pool: DbPool,
    habit_service: Arc<HabitService>,
    weekly_target_service: Arc<WeeklyTargetService>,
    auth_service: Arc<AuthService>,
}

impl AppState {
    pub fn new(db_pool: DbPool) -> Self {
        let habit_service = Arc::new(HabitService::new(db_pool.clone()));
        let weekly_target_service = Arc::new(WeeklyTargetService::new(
            db_pool.clone(),
            Arc::clone(&habit_service),
        ));
        let auth_service = Arc::new(AuthService::new(Arc::new(MockCredentialProvider)));

        Self {
            db_pool,
            habit_service,
            weekly_target_service,
            auth_service,
        }
    }

    pub fn habits(&self) -> Arc<HabitService> {
        Arc::clone(&self.habit_service)
    }

    pub fn weekly_target(&self) -> Arc<WeeklyTargetService> {
        Arc::clone(&self.weekly_target_service)
    }

    pub fn auth(&self) -> Arc<AuthService> {
        Arc::clone(&self.auth_service)
    }

    pub fn db(&self) -> DbPool {
        self.db_pool.clone()
    }
}

pub type CommandResult<T> = Result<T, CommandError>;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<JsonValue>,
}

impl CommandError {
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        details: Option<JsonValue>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details,
        }
    }
}

impl From<AppError> for CommandError {
    fn from(error: AppError) -> Self {
        match error {
            AppError::Validation {
                message, details, ..
            } => CommandError::new("VALIDATION_ERROR", message, details),
            AppError::NotFound => CommandError::new("NOT_FOUND", "请求的资源不存在", None),
            AppError::Persistence { message } => {
                error!(target: "app::command", %message, "persistence error in command");
                // Storage detail stays in the logs; the caller only
                // learns that the operation failed.
                CommandError::new("STORAGE_FAILURE", "操作失败，数据未能保存", None)
            }
            AppError::Serialization(error) => {
                error!(target: "app::command", error = %error, "serialization error in command");
                CommandError::new("STORAGE_FAILURE", "操作失败，数据未能保存", None)
            }
            AppError::Io(error) => {
                error!(target: "app::command", error = %error, "io error in command");
                CommandError::new("UNKNOWN", "文件系统读写失败", None)
            }
            AppError::Other(message) => {
                error!(target: "app::command", %message, "unexpected error in command");
                CommandError::new("UNKNOWN", message, None)
            }
        }
    }
}
