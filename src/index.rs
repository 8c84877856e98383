use axum::{
    debug_handler,
    extract::{Query, State},
    response::Html,
};
use serde::Deserialize;
use sqlx::SqlitePool;
use tower_sessions::Session;

use crate::{
    AppResult, AppState, auth, chat, include_res,
    nav::Page,
    profiles,
    res::{self, Flash},
    screening,
    session::SessionState,
};

#[derive(Deserialize)]
pub(crate) struct NavQuery {
    page: Option<String>,
}

#[debug_handler(state = AppState)]
pub(crate) async fn index(
    Query(NavQuery { page }): Query<NavQuery>,
    State(db_pool): State<SqlitePool>,
    session: Session,
) -> AppResult<Html<String>> {
    let state = SessionState::load(&session, &db_pool).await?;
    let requested = page.as_deref().and_then(Page::from_key);
    render(&db_pool, &state, state.resolve(requested), Vec::new()).await
}

/// Renders one page for the current session. A page the session can't reach
/// is swapped for its default page.
pub async fn render(
    db_pool: &SqlitePool,
    state: &SessionState,
    page: Page,
    mut flashes: Vec<Flash>,
) -> AppResult<Html<String>> {
    let page = state.resolve(Some(page));

    let body = match (page, state.identity()) {
        (Page::Home, _) => res::markdown(include_res!(str, "/pages/home.md")),
        (Page::Info, _) => res::markdown(include_res!(str, "/pages/info.md")),
        (Page::Login, _) => auth::login::form(""),
        (Page::Register, _) => auth::register::form(""),
        (Page::ForgotPassword, _) => auth::forgot::form(""),
        (Page::Prediction, Some(_)) => screening::form::questionnaire(),
        (Page::Profile, Some(identity)) => profiles::page::body(db_pool, identity, &mut flashes).await?,
        (Page::Chat, Some(_)) => chat::room::body(db_pool, state).await?,
        (Page::Prediction | Page::Profile | Page::Chat, None) => auth::login::form(""),
    };

    Ok(res::layout(state, page, &flashes, &body))
}
