use axum::{
    Form, debug_handler,
    extract::State,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use sqlx::SqlitePool;
use tower_sessions::Session;

use crate::{
    AppResult, AppState, auth, include_res, index,
    nav::Page,
    res::{self, Flash},
    session::SessionState,
};

use super::{DOCTOR_AUTHOR, log, msg};

#[derive(Deserialize)]
pub(crate) struct ChatForm {
    message: String,
}

/// The board, oldest message first. Doctors also get the reply form.
pub(crate) async fn body(db_pool: &SqlitePool, state: &SessionState) -> AppResult<String> {
    let messages: String = log::list(db_pool).await?.iter().map(msg::msg_to_html).collect();
    let reply = if state.is_doctor() {
        include_res!(str, "/pages/chat_reply.html")
    } else {
        ""
    };

    Ok(res::fill(include_res!(str, "/pages/chat.html"), &[("messages", &messages), ("reply", reply)]))
}

#[debug_handler(state = AppState)]
pub(crate) async fn send(
    State(db_pool): State<SqlitePool>,
    session: Session,
    Form(ChatForm { message }): Form<ChatForm>,
) -> AppResult<Response> {
    let state = SessionState::load(&session, &db_pool).await?;
    let identity = match auth::require_login(&state) {
        Ok(identity) => identity,
        Err(redirect) => return Ok(redirect),
    };

    let flash = match msg::check_text(&message, "Please enter a message.") {
        Ok(text) => {
            log::append(&db_pool, &identity.username, text).await?;
            Flash::success("Message sent!")
        }
        Err(err) => err.into(),
    };

    Ok(index::render(&db_pool, &state, Page::Chat, vec![flash]).await?.into_response())
}

#[debug_handler(state = AppState)]
pub(crate) async fn reply(
    State(db_pool): State<SqlitePool>,
    session: Session,
    Form(ChatForm { message }): Form<ChatForm>,
) -> AppResult<Response> {
    let state = SessionState::load(&session, &db_pool).await?;
    let identity = match auth::require_login(&state) {
        Ok(identity) => identity,
        Err(redirect) => return Ok(redirect),
    };

    let flash = if !state.is_doctor() {
        tracing::warn!(username = %identity.username, "non-doctor tried to reply");
        Flash::error("Only doctors can reply.")
    } else {
        match msg::check_text(&message, "Please enter a reply.") {
            Ok(text) => {
                log::append(&db_pool, DOCTOR_AUTHOR, text).await?;
                tracing::info!(username = %identity.username, "doctor replied");
                Flash::success("Reply sent!")
            }
            Err(err) => err.into(),
        }
    };

    Ok(index::render(&db_pool, &state, Page::Chat, vec![flash]).await?.into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{accounts::Role, db, session::Identity};

    fn signed_in(role: Role) -> SessionState {
        SessionState::Authenticated(Identity { id: 1, username: "amy".into(), role })
    }

    #[tokio::test]
    async fn reply_form_is_doctor_only() {
        let db_pool = db::memory_pool().await.unwrap();
        log::append(&db_pool, "amy", "hello there").await.unwrap();

        let body_user = body(&db_pool, &signed_in(Role::User)).await.unwrap();
        assert!(body_user.contains("hello there"));
        assert!(!body_user.contains(r#"action="/chat/reply""#));

        let body_doctor = body(&db_pool, &signed_in(Role::Doctor)).await.unwrap();
        assert!(body_doctor.contains(r#"action="/chat/reply""#));
    }

    #[tokio::test]
    async fn placeholders_in_messages_are_kept() {
        let db_pool = db::memory_pool().await.unwrap();
        log::append(&db_pool, "amy", "what does {reply} mean?").await.unwrap();

        let body_user = body(&db_pool, &signed_in(Role::User)).await.unwrap();
        assert!(body_user.contains("what does {reply} mean?"));

        let body_doctor = body(&db_pool, &signed_in(Role::Doctor)).await.unwrap();
        assert!(body_doctor.contains("what does {reply} mean?"));
        assert_eq!(body_doctor.matches(r#"action="/chat/reply""#).count(), 1);
    }
}
