use axum::{Form, debug_handler, extract::State, response::Html};
use serde::Deserialize;
use sqlx::SqlitePool;
use tower_sessions::Session;

use crate::{
    AppResult, AppState, accounts, index,
    appresult::UserError,
    include_res,
    nav::Page,
    res::{self, Flash},
    session::SessionState,
};

use super::{check_new_credentials, login};

#[derive(Deserialize)]
pub(crate) struct ResetForm {
    username: String,
    new_password: String,
    confirm_password: String,
}

pub(crate) fn form(username: &str) -> String {
    res::fill(include_res!(str, "/pages/forgot_password.html"), &[("username", &res::escape(username))])
}

#[debug_handler(state = AppState)]
pub(crate) async fn reset_password(
    State(db_pool): State<SqlitePool>,
    session: Session,
    Form(ResetForm { username, new_password, confirm_password }): Form<ResetForm>,
) -> AppResult<Html<String>> {
    let state = SessionState::load(&session, &db_pool).await?;
    if state.identity().is_some() {
        return index::render(&db_pool, &state, state.default_page(), Vec::new()).await;
    }
    let username = username.trim();

    if let Err(err) = check_new_credentials(username, &new_password, &confirm_password) {
        return Ok(res::layout(&state, Page::ForgotPassword, &[err.into()], &form(username)));
    }

    if !accounts::reset_password(&db_pool, username, &new_password).await? {
        let missing = UserError::NotFound(format!("No account named {username:?}."));
        return Ok(res::layout(&state, Page::ForgotPassword, &[missing.into()], &form(username)));
    }

    tracing::info!(%username, "password reset");
    Ok(res::layout(
        &state,
        Page::Login,
        &[Flash::success("Password reset successfully! You can now log in with the new password.")],
        &login::form(username),
    ))
}
