//! Error types for `folk-core`.

use thiserror::Error;

/// The error returned by every [`PersonStore`](crate::store::PersonStore)
/// operation.
///
/// `NotFound` and `NameTaken` are the only signals callers branch on. All
/// other backend failures travel in `Store` with their message intact.
#[derive(Debug, Error)]
pub enum Error {
  #[error("person not found")]
  NotFound,

  #[error("{0} already exists in the database!")]
  NameTaken(String),

  #[error("{0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap an arbitrary backend error.
  pub fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Error::Store(Box::new(e))
  }

  pub fn is_not_found(&self) -> bool { matches!(self, Error::NotFound) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
