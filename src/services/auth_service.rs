use std::sync::{Arc, RwLock};

use sha2::{Digest, Sha256};
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::models::auth::{ProfileUpdateInput, UserProfile};

/// Seam for the sign-in flow. The shipped implementation is a mock; a
/// real backend would slot in behind the same trait without touching
/// the rest of the crate.
pub trait CredentialProvider: Send + Sync {
    fn sign_in(&self, email: &str, password: &str) -> AppResult<UserProfile>;
}

/// Accepts any well-formed credential pair. The id is derived from the
/// email so repeated sign-ins resolve to the same user.
pub struct MockCredentialProvider;

impl CredentialProvider for MockCredentialProvider {
    fn sign_in(&self, email: &str, password: &str) -> AppResult<UserProfile> {
        let email = email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(AppError::validation("邮箱格式非法"));
        }
        if password.trim().is_empty() {
            return Err(AppError::validation("密码不能为空"));
        }

        let display_name = email
            .split('@')
            .next()
            .filter(|local| !local.is_empty())
            .map(ToOwned::to_owned);

        Ok(UserProfile {
            id: derive_user_id(email),
            email: email.to_string(),
            display_name,
            photo_url: None,
        })
    }
}

/// Holds the current (in-memory) session. Stats and habit logic never
/// consult this service.
pub struct AuthService {
    provider: Arc<dyn CredentialProvider>,
    session: RwLock<Option<UserProfile>>,
}

impl AuthService {
    pub fn new(provider: Arc<dyn CredentialProvider>) -> Self {
        Self {
            provider,
            session: RwLock::new(None),
        }
    }

    pub fn sign_in(&self, email: &str, password: &str) -> AppResult<UserProfile> {
        let profile = self.provider.sign_in(email, password)?;

        if let Ok(mut guard) = self.session.write() {
            *guard = Some(profile.clone());
        }

        info!(user_id = %profile.id, "user signed in");
        Ok(profile)
    }

    pub fn sign_out(&self) {
        if let Ok(mut guard) = self.session.write() {
            if let Some(profile) = guard.take() {
                info!(user_id = %profile.id, "user signed out");
            }
        }
    }

    pub fn current_user(&self) -> Option<UserProfile> {
        self.session
            .read()
            .ok()
            .and_then(|guard| guard.as_ref().cloned())
    }

    pub fn update_profile(&self, input: ProfileUpdateInput) -> AppResult<UserProfile> {
        let mut guard = self
            .session
            .write()
            .map_err(|_| AppError::other("会话状态不可用"))?;

        let profile = guard
            .as_mut()
            .ok_or_else(|| AppError::validation("尚未登录，无法更新资料"))?;

        if let Some(display_name) = input.display_name {
            profile.display_name = normalize_optional(display_name);
        }
        if let Some(photo_url) = input.photo_url {
            profile.photo_url = normalize_optional(photo_url);
        }

        info!(user_id = %profile.id, "profile updated");
        Ok(profile.clone())
    }
}

fn normalize_optional(value: String) -> Option<String> {
    let trimmed = value.trim().to_string();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

fn derive_user_id(email: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"habitloop.auth.v1");
    hasher.update(email.to_lowercase().as_bytes());
    let digest = hasher.finalize();
    digest
        .iter()
        .take(8)
        .map(|byte| format!("{byte:02x}"))
        .collect()
}
