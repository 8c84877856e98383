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
    accounts::{self, UsernameChange},
    appresult::UserError,
    nav::Page,
    res::{self, Flash},
    session::{Identity, SessionState},
};

use super::{check_address, check_phone};

#[derive(Deserialize)]
pub(crate) struct ProfileForm {
    phone: String,
    address: String,
    #[serde(default)]
    new_username: String,
}

#[derive(Deserialize)]
pub(crate) struct DeleteForm {
    confirm: Option<String>,
}

fn missing() -> UserError {
    UserError::NotFound("User not found. Please log in again.".into())
}

/// The profile form filled from the stored record. A session whose account
/// has vanished gets a flash telling it to log in again.
pub(crate) async fn body(
    db_pool: &SqlitePool,
    identity: &Identity,
    flashes: &mut Vec<Flash>,
) -> AppResult<String> {
    let Some(account) = accounts::find(db_pool, &identity.username).await? else {
        flashes.push(missing().into());
        return Ok(String::new());
    };

    Ok(res::fill(include_res!(str, "/pages/profile.html"), &[
        ("username", &res::escape(&account.username)),
        ("phone", &res::escape(account.phone.as_deref().unwrap_or_default())),
        ("address", &res::escape(account.address.as_deref().unwrap_or_default())),
    ]))
}

#[debug_handler(state = AppState)]
pub(crate) async fn update(
    State(db_pool): State<SqlitePool>,
    session: Session,
    Form(ProfileForm { phone, address, new_username }): Form<ProfileForm>,
) -> AppResult<Response> {
    let mut state = SessionState::load(&session, &db_pool).await?;
    let username = match auth::require_login(&state) {
        Ok(identity) => identity.username.clone(),
        Err(redirect) => return Ok(redirect),
    };

    let checked = check_phone(&phone).and_then(|phone| Ok((phone, check_address(&address)?)));
    let (phone, address) = match checked {
        Ok(checked) => checked,
        Err(err) => return profile(&db_pool, &state, err.into()).await,
    };

    if !accounts::update_profile(&db_pool, &username, phone, address).await? {
        return profile(&db_pool, &state, missing().into()).await;
    }
    tracing::info!(%username, "updated profile");
    let mut flashes = vec![Flash::success("Profile updated successfully!")];

    let new_username = new_username.trim();
    if !new_username.is_empty() && new_username != username {
        match accounts::update_username(&db_pool, &username, new_username).await? {
            UsernameChange::Renamed => {
                state.rename(&session, new_username).await?;
                flashes.push(Flash::success("Username updated successfully!"));
            }
            UsernameChange::Taken => flashes.push(
                UserError::Conflict("Username already exists. Please choose a different username.".into()).into(),
            ),
            UsernameChange::Missing => flashes.push(missing().into()),
        }
    }

    Ok(index::render(&db_pool, &state, Page::Profile, flashes).await?.into_response())
}

#[debug_handler(state = AppState)]
pub(crate) async fn delete(
    State(db_pool): State<SqlitePool>,
    session: Session,
    Form(DeleteForm { confirm }): Form<DeleteForm>,
) -> AppResult<Response> {
    let state = SessionState::load(&session, &db_pool).await?;
    let username = match auth::require_login(&state) {
        Ok(identity) => identity.username.clone(),
        Err(redirect) => return Ok(redirect),
    };

    if confirm.as_deref() != Some("yes") {
        return profile(&db_pool, &state, UserError::Unconfirmed.into()).await;
    }

    if accounts::delete(&db_pool, &username).await? {
        tracing::info!(%username, "deleted account");
    } else {
        tracing::warn!(%username, "account already gone");
    }
    let state = SessionState::logout(&session).await;
    Ok(index::render(&db_pool, &state, Page::Home, vec![Flash::success("Your account has been deleted.")])
        .await?
        .into_response())
}

async fn profile(db_pool: &SqlitePool, state: &SessionState, flash: Flash) -> AppResult<Response> {
    Ok(index::render(db_pool, state, Page::Profile, vec![flash]).await?.into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{accounts::Role, db};

    #[tokio::test]
    async fn body_shows_stored_details() {
        let db_pool = db::memory_pool().await.unwrap();
        accounts::register(&db_pool, "amy", "pw", Role::User).await.unwrap();
        accounts::update_profile(&db_pool, "amy", "0123456789", "<b>Kuala Lumpur</b>").await.unwrap();

        let identity = Identity { id: 1, username: "amy".into(), role: Role::User };
        let mut flashes = Vec::new();
        let html = body(&db_pool, &identity, &mut flashes).await.unwrap();
        assert!(flashes.is_empty());
        assert!(html.contains(r#"value="0123456789""#));
        assert!(html.contains("&lt;b&gt;Kuala Lumpur&lt;/b&gt;"));
    }

    #[tokio::test]
    async fn body_for_vanished_account() {
        let db_pool = db::memory_pool().await.unwrap();
        let identity = Identity { id: 99, username: "ghost".into(), role: Role::User };
        let mut flashes = Vec::new();
        let html = body(&db_pool, &identity, &mut flashes).await.unwrap();
        assert!(html.is_empty());
        assert_eq!(flashes, vec![Flash::error("User not found. Please log in again.")]);
    }
}
