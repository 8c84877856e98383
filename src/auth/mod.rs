pub(crate) mod forgot;
pub(crate) mod login;
pub(crate) mod logout;
pub(crate) mod register;

use axum::{
    Router,
    response::{IntoResponse, Redirect, Response},
    routing::post,
};

use crate::{
    AppState,
    appresult::UserError,
    nav::Page,
    session::{Identity, SessionState},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login::login))
        .route("/logout", post(logout::logout))
        .route("/register", post(register::register))
        .route("/forgot-password", post(forgot::reset_password))
}

/// The signed-in identity, or a redirect to the login page.
pub(crate) fn require_login(state: &SessionState) -> Result<&Identity, Response> {
    state
        .identity()
        .ok_or_else(|| Redirect::to(&Page::Login.href()).into_response())
}

/// Shared checks for forms that set a password.
pub(crate) fn check_new_credentials(
    username: &str,
    password: &str,
    confirm_password: &str,
) -> Result<(), UserError> {
    if password != confirm_password {
        return Err(UserError::validation("Passwords do not match."));
    }
    if username.is_empty() || password.is_empty() {
        return Err(UserError::validation("Please fill in both username and password."));
    }
    Ok(())
}
