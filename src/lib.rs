pub mod accounts;
pub mod appresult;
pub mod auth;
pub mod chat;
pub mod config;
pub mod db;
pub mod index;
pub mod nav;
pub mod profiles;
pub mod report;
pub mod res;
pub mod screening;
pub mod session;

pub use appresult::{AppError, AppResult};

use axum::{Router, extract::FromRef, routing::get};
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer, cookie::SameSite};

use crate::config::Config;

#[derive(Clone, FromRef)]
pub struct AppState {
    pub db_pool: SqlitePool,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index::index))
        .route("/res/style.css", get(res::stylesheet))
        .merge(auth::router())
        .merge(screening::form::router())
        .merge(profiles::router())
        .merge(chat::router())
}

/// The full application: routes, state, session cookies and request tracing.
pub fn app(app_state: AppState, config: &Config) -> Router {
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(config.secure_cookies)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(config.session_inactivity()));

    router()
        .with_state(app_state)
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
}
