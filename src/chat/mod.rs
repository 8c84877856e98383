//! Live chat board shared by all signed-in users.

pub mod log;
pub(crate) mod msg;
pub(crate) mod room;

use axum::{Router, routing::post};

use crate::AppState;

/// Author recorded for replies posted through the doctor form.
pub const DOCTOR_AUTHOR: &str = "Doctor";

pub const MAX_MESSAGE_CHARS: usize = 1000;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/chat", post(room::send))
        .route("/chat/reply", post(room::reply))
}
