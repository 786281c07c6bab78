use crate::models::auth::{ProfileUpdateInput, UserProfile};

use super::{AppState, CommandResult};

pub fn auth_sign_in(state: &AppState, email: &str, password: &str) -> CommandResult<UserProfile> {
    Ok(state.auth().sign_in(email, password)?)
}

pub fn auth_sign_out(state: &AppState) -> CommandResult<()> {
    state.auth().sign_out();
    Ok(())
}

pub fn auth_current_user(state: &AppState) -> CommandResult<Option<UserProfile>> {
    Ok(state.auth().current_user())
}

pub fn profile_update(
    state: &AppState,
    payload: ProfileUpdateInput,
) -> CommandResult<UserProfile> {
    Ok(state.auth().update_profile(payload)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbPool;
    use tempfile::tempdir;

    #[test]
    fn mock_sign_in_flow() {
        let dir = tempdir().expect("temp dir");
        let pool = DbPool::new(dir.path().join("app.sqlite")).expect("db pool");
        let state = AppState::new(pool);

        assert!(auth_current_user(&state).expect("no session").is_none());

        let profile = auth_sign_in(&state, "ada@example.com", "secret").expect("sign in");
        assert_eq!(profile.display_name.as_deref(), Some("ada"));

        let updated = profile_update(
            &state,
            ProfileUpdateInput {
                display_name: Some("Ada".into()),
                photo_url: None,
            },
        )
        .expect("update profile");
        assert_eq!(updated.display_name.as_deref(), Some("Ada"));

        auth_sign_out(&state).expect("sign out");
        assert!(auth_current_user(&state).expect("cleared").is_none());
    }
}
