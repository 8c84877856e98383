use axum::{http::StatusCode, response::{IntoResponse, Response}};
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

/// Infrastructure failure (database, session store). Rendered as a 500.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self.0, backtrace = %self.0.backtrace(), "request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Something went wrong: {}", self.0),
        )
            .into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

/// Problems the user can fix by editing the form and trying again.
/// These are shown inline on the page and never abort the request.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UserError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Please confirm to delete your account.")]
    Unconfirmed,
}

impl UserError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
