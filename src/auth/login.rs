use axum::{Form, debug_handler, extract::State, response::Html};
use serde::Deserialize;
use sqlx::SqlitePool;
use tower_sessions::Session;

use crate::{
    AppResult, AppState, accounts, include_res, index,
    nav::Page,
    res::{self, Flash},
    session::SessionState,
};

#[derive(Deserialize)]
pub(crate) struct LoginForm {
    username: String,
    password: String,
}

pub(crate) fn form(username: &str) -> String {
    res::fill(include_res!(str, "/pages/login.html"), &[("username", &res::escape(username))])
}

#[debug_handler(state = AppState)]
pub(crate) async fn login(
    State(db_pool): State<SqlitePool>,
    session: Session,
    Form(LoginForm { username, password }): Form<LoginForm>,
) -> AppResult<Html<String>> {
    let username = username.trim();

    let Some(account) = accounts::verify(&db_pool, username, &password).await? else {
        tracing::warn!(%username, "failed login");
        let state = SessionState::load(&session, &db_pool).await?;
        return Ok(res::layout(
            &state,
            Page::Login,
            &[Flash::error("Invalid username or password. Please try again.")],
            &form(username),
        ));
    };

    let state = SessionState::login(&session, &account).await?;
    let welcome = Flash::success(format!("Welcome back, {}!", account.username));
    index::render(&db_pool, &state, state.default_page(), vec![welcome]).await
}
