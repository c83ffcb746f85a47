//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Error bodies are plain text, matching what clients of the service expect:
//! the decoder message for 400, the conflicting name for 409, and the raw
//! backend message for 500.

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
};
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{0}")]
  NotFound(String),

  #[error("{0}")]
  BadRequest(String),

  #[error("{0}")]
  Conflict(String),

  #[error("{0}")]
  Store(#[source] folk_core::Error),
}

impl From<folk_core::Error> for ApiError {
  fn from(e: folk_core::Error) -> Self {
    match e {
      folk_core::Error::NotFound => ApiError::NotFound("Person not found".to_string()),
      e @ folk_core::Error::NameTaken(_) => ApiError::Conflict(e.to_string()),
      e => ApiError::Store(e),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = match &self {
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::Conflict(_) => StatusCode::CONFLICT,
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store failure");
        StatusCode::INTERNAL_SERVER_ERROR
      }
    };
    (status, self.to_string()).into_response()
  }
}
