use axum::{Form, debug_handler, extract::State, response::Html};
use serde::Deserialize;
use sqlx::SqlitePool;
use tower_sessions::Session;

use crate::{
    AppResult, AppState, index,
    accounts::{self, Role},
    appresult::UserError,
    include_res,
    nav::Page,
    res::{self, Flash},
    session::SessionState,
};

use super::{check_new_credentials, login};

#[derive(Deserialize)]
pub(crate) struct RegisterForm {
    username: String,
    password: String,
    confirm_password: String,
    role: Option<String>,
}

pub(crate) fn form(username: &str) -> String {
    let roles: String = Role::ALL
        .iter()
        .map(|role| format!(r#"<option value="{role}">{role}</option>"#))
        .collect();

    res::fill(include_res!(str, "/pages/register.html"), &[
        ("username", &res::escape(username)),
        ("roles", &roles),
    ])
}

#[debug_handler(state = AppState)]
pub(crate) async fn register(
    State(db_pool): State<SqlitePool>,
    session: Session,
    Form(RegisterForm { username, password, confirm_password, role }): Form<RegisterForm>,
) -> AppResult<Html<String>> {
    let state = SessionState::load(&session, &db_pool).await?;
    if state.identity().is_some() {
        return index::render(&db_pool, &state, state.default_page(), Vec::new()).await;
    }
    let username = username.trim();

    let checked = check_new_credentials(username, &password, &confirm_password).and_then(|()| {
        match role.as_deref() {
            None | Some("") => Ok(Role::default()),
            Some(role) => role
                .parse::<Role>()
                .map_err(|_| UserError::validation("Please select a valid role.")),
        }
    });
    let role = match checked {
        Ok(role) => role,
        Err(err) => return Ok(res::layout(&state, Page::Register, &[err.into()], &form(username))),
    };

    if !accounts::register(&db_pool, username, &password, role).await? {
        let conflict = UserError::Conflict("Username already exists. Please choose a different username.".into());
        return Ok(res::layout(&state, Page::Register, &[conflict.into()], &form(username)));
    }

    Ok(res::layout(
        &state,
        Page::Login,
        &[Flash::success("User registered successfully! You can now log in.")],
        &login::form(username),
    ))
}
