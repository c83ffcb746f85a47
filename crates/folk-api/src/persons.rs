//! Handlers for `/person` endpoints.
//!
//! | Method   | Path           | Notes |
//! |----------|----------------|-------|
//! | `GET`    | `/person`      | All persons, `[]` when empty |
//! | `POST`   | `/person`      | Body: [`PersonBody`]; 201, or 409 if the name is taken |
//! | `GET`    | `/person/{id}` | Surrogate id or uid; 404 if neither matches |
//! | `PUT`    | `/person/{id}` | `id` is the uid; upserts, so unknown uids are created |
//! | `DELETE` | `/person/{id}` | `id` is the uid; always 204 on success |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use bytes::Bytes;
use folk_core::{
  Error,
  person::{Person, PersonBody},
  store::PersonStore,
};

use crate::error::ApiError;

/// Decode a request body, reporting any failure as a 400.
///
/// The body is decoded by hand rather than through [`Json`] so that a missing
/// `Content-Type` is accepted and every decode failure maps to 400.
fn decode_body(body: &Bytes) -> Result<PersonBody, ApiError> {
  serde_json::from_slice(body).map_err(|e| ApiError::BadRequest(e.to_string()))
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /person`
pub async fn list<S>(State(store): State<Arc<S>>) -> Result<Json<Vec<Person>>, ApiError>
where
  S: PersonStore,
{
  Ok(Json(store.get_all_persons().await?))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /person` — returns 201 + the stored person with its server-assigned
/// `id`, `uid` and `timestamp`.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  body: Bytes,
) -> Result<impl IntoResponse, ApiError>
where
  S: PersonStore,
{
  let body = decode_body(&body)?;
  let person = store.create_person(Person::new(body)).await.inspect_err(|e| {
    if let Error::NameTaken(name) = e {
      tracing::debug!(%name, "rejected duplicate name");
    }
  })?;
  Ok((StatusCode::CREATED, Json(person)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /person/{id}`
///
/// A numeric `id` is tried as the surrogate id first; anything that misses
/// there is looked up as a uid.
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<Json<Person>, ApiError>
where
  S: PersonStore,
{
  if let Ok(surrogate) = id.parse::<i64>() {
    match store.get_person_by_id(surrogate).await {
      Err(Error::NotFound) => {}
      found => return Ok(Json(found?)),
    }
  }
  Ok(Json(store.get_person_by_uid(&id).await?))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /person/{uid}` — replaces `name` and `traits`, restamps `timestamp`.
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(uid): Path<String>,
  body: Bytes,
) -> Result<Json<Person>, ApiError>
where
  S: PersonStore,
{
  let body = decode_body(&body)?;
  let person = store.save(Person::with_uid(uid, body)).await?;
  Ok(Json(person))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /person/{uid}` — 204 whether or not a row was removed.
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  Path(uid): Path<String>,
) -> Result<StatusCode, ApiError>
where
  S: PersonStore,
{
  store.delete_person(&uid).await?;
  Ok(StatusCode::NO_CONTENT)
}
