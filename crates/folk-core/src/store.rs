//! The `PersonStore` trait.
//!
//! Implemented by storage backends (`folk-store-sqlite`, and
//! [`MemoryStore`](crate::memory::MemoryStore) for tests). The API layer
//! depends on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{Result, person::Person};

/// Abstraction over a person store backend.
///
/// Lookups report a miss as [`Error::NotFound`](crate::Error::NotFound);
/// every other failure is passed up untouched as
/// [`Error::Store`](crate::Error::Store). Nothing is retried.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait PersonStore: Send + Sync {
  // ── Writes ────────────────────────────────────────────────────────────

  /// Upsert keyed by `uid`: insert if absent, otherwise replace `name`,
  /// `timestamp` and `traits`. Returns the record with its surrogate `id`.
  fn save(&self, person: Person) -> impl Future<Output = Result<Person>> + Send + '_;

  /// Insert `person` unless another person already holds its name.
  ///
  /// The name check and the write happen atomically with respect to other
  /// store calls. Fails with [`Error::NameTaken`](crate::Error::NameTaken).
  fn create_person(
    &self,
    person: Person,
  ) -> impl Future<Output = Result<Person>> + Send + '_;

  /// Remove the person with `uid`. Succeeds whether or not a row matched.
  fn delete_person<'a>(
    &'a self,
    uid: &'a str,
  ) -> impl Future<Output = Result<()>> + Send + 'a;

  // ── Reads ─────────────────────────────────────────────────────────────

  fn get_person_by_name<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Person>> + Send + 'a;

  fn get_person_by_id(&self, id: i64) -> impl Future<Output = Result<Person>> + Send + '_;

  fn get_person_by_uid<'a>(
    &'a self,
    uid: &'a str,
  ) -> impl Future<Output = Result<Person>> + Send + 'a;

  /// Every stored person, in insertion order. Empty, not an error, when the
  /// store holds nobody.
  fn get_all_persons(&self) -> impl Future<Output = Result<Vec<Person>>> + Send + '_;
}
