use axum::{debug_handler, extract::State, response::Html};
use sqlx::SqlitePool;
use tower_sessions::Session;

use crate::{AppResult, AppState, index, nav::Page, res::Flash, session::SessionState};

#[debug_handler(state = AppState)]
pub(crate) async fn logout(
    State(db_pool): State<SqlitePool>,
    session: Session,
) -> AppResult<Html<String>> {
    if let Some(identity) = SessionState::load(&session, &db_pool).await?.identity() {
        tracing::info!(username = %identity.username, "logged out");
    }
    let state = SessionState::logout(&session).await;
    index::render(&db_pool, &state, Page::Home, vec![Flash::success("You have logged out successfully.")]).await
}
