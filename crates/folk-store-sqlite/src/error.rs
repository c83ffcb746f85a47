//! Error type for `folk-store-sqlite`.

use thiserror::Error;

/// Driver and JSON errors display as their own text, so the message that
/// reaches an API client is the backend's, unprefixed.
#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Database(#[from] tokio_rusqlite::Error),

  #[error(transparent)]
  Json(#[from] serde_json::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<Error> for folk_core::Error {
  fn from(e: Error) -> Self { folk_core::Error::store(e) }
}
