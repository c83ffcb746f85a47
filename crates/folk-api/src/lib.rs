//! JSON REST API for Folk.
//!
//! Exposes an axum [`Router`] backed by any [`folk_core::store::PersonStore`].
//! TLS, timeouts and tracing layers are the caller's responsibility.

pub mod error;
pub mod persons;

use std::sync::Arc;

use axum::{Router, routing::get};
use folk_core::store::PersonStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: PersonStore + 'static,
{
  Router::new()
    .route("/person", get(persons::list::<S>).post(persons::create::<S>))
    .route(
      "/person/{id}",
      get(persons::get_one::<S>)
        .put(persons::update::<S>)
        .delete(persons::delete_one::<S>),
    )
    .with_state(store)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
  };
  use folk_core::{
    Error,
    memory::MemoryStore,
    person::Person,
  };
  use folk_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  async fn sqlite_router() -> Router {
    let store = SqliteStore::open_in_memory().await.unwrap();
    api_router(Arc::new(store))
  }

  async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Response {
    let body = match body {
      Some(v) => Body::from(v.to_string()),
      None => Body::empty(),
    };
    let req = Request::builder()
      .method(method)
      .uri(uri)
      .header(header::CONTENT_TYPE, "application/json")
      .body(body)
      .unwrap();
    app.clone().oneshot(req).await.unwrap()
  }

  async fn send_raw(app: &Router, method: &str, uri: &str, body: &str) -> Response {
    let req = Request::builder()
      .method(method)
      .uri(uri)
      .body(Body::from(body.to_string()))
      .unwrap();
    app.clone().oneshot(req).await.unwrap()
  }

  async fn body_text(resp: Response) -> String {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
  }

  async fn body_json(resp: Response) -> Value {
    serde_json::from_str(&body_text(resp).await).unwrap()
  }

  async fn create(app: &Router, name: &str, traits: Value) -> Value {
    let resp = send(app, "POST", "/person", Some(json!({ "name": name, "traits": traits }))).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    body_json(resp).await
  }

  // ── List ────────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn list_empty_returns_empty_array() {
    let app = sqlite_router().await;
    let resp = send(&app, "GET", "/person", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!([]));
  }

  #[tokio::test]
  async fn list_returns_all_created() {
    let app = sqlite_router().await;
    create(&app, "John Doe", json!({})).await;
    create(&app, "Jane Doe", json!({})).await;

    let resp = send(&app, "GET", "/person", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let people = body_json(resp).await;
    let names: Vec<_> = people.as_array().unwrap().iter().map(|p| p["name"].clone()).collect();
    assert_eq!(names, [json!("John Doe"), json!("Jane Doe")]);
  }

  // ── Create ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_assigns_server_fields() {
    let app = sqlite_router().await;
    let before = chrono::Utc::now();
    let person = create(&app, "John Doe", json!({ "age": 30 })).await;

    assert!(person["id"].as_i64().unwrap() > 0);
    let uid = person["uid"].as_str().unwrap();
    assert!(uuid::Uuid::parse_str(uid).is_ok(), "uid: {uid}");
    assert_eq!(person["name"], "John Doe");
    assert_eq!(person["traits"], json!({ "age": 30 }));

    let ts: chrono::DateTime<chrono::Utc> =
      serde_json::from_value(person["timestamp"].clone()).unwrap();
    assert!(ts >= before);
  }

  #[tokio::test]
  async fn create_ignores_client_supplied_identity() {
    let app = sqlite_router().await;
    let resp = send(
      &app,
      "POST",
      "/person",
      Some(json!({
        "id": 777,
        "uid": "mine",
        "timestamp": "1999-12-31T23:59:59Z",
        "name": "Sneaky",
        "traits": null
      })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let person = body_json(resp).await;
    assert_ne!(person["id"], 777);
    assert_ne!(person["uid"], "mine");
    assert_ne!(person["timestamp"], "1999-12-31T23:59:59Z");
  }

  #[tokio::test]
  async fn create_accepts_missing_content_type_and_empty_fields() {
    let app = sqlite_router().await;
    let resp = send_raw(&app, "POST", "/person", "{}").await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let person = body_json(resp).await;
    assert_eq!(person["name"], "");
    assert_eq!(person["traits"], Value::Null);
  }

  #[tokio::test]
  async fn create_and_update_accept_null_name() {
    let app = sqlite_router().await;
    let resp = send_raw(&app, "POST", "/person", r#"{"name":null,"traits":{"a":1}}"#).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let person = body_json(resp).await;
    assert_eq!(person["name"], "");
    assert_eq!(person["traits"], json!({ "a": 1 }));

    let uid = person["uid"].as_str().unwrap();
    let resp = send_raw(&app, "PUT", &format!("/person/{uid}"), r#"{"name":null}"#).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["name"], "");
  }

  #[tokio::test]
  async fn create_duplicate_name_returns_409_and_writes_nothing() {
    let app = sqlite_router().await;
    create(&app, "John Doe", json!({})).await;

    let resp = send(&app, "POST", "/person", Some(json!({ "name": "John Doe" }))).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert_eq!(body_text(resp).await, "John Doe already exists in the database!");

    let list = body_json(send(&app, "GET", "/person", None).await).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
  }

  #[tokio::test]
  async fn create_malformed_body_returns_400() {
    let app = sqlite_router().await;
    for bad in ["", "{", "not json", r#"{"name": 5}"#, "[1,2]"] {
      let resp = send_raw(&app, "POST", "/person", bad).await;
      assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body: {bad:?}");
      assert!(!body_text(resp).await.is_empty());
    }
  }

  // ── Get one ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn get_by_uid_and_by_id_match_created() {
    let app = sqlite_router().await;
    let created = create(&app, "John Doe", json!({ "age": 30 })).await;

    let by_uid = send(&app, "GET", &format!("/person/{}", created["uid"].as_str().unwrap()), None).await;
    assert_eq!(by_uid.status(), StatusCode::OK);
    assert_eq!(body_json(by_uid).await, created);

    let by_id = send(&app, "GET", &format!("/person/{}", created["id"]), None).await;
    assert_eq!(by_id.status(), StatusCode::OK);
    assert_eq!(body_json(by_id).await, created);
  }

  #[tokio::test]
  async fn get_missing_returns_404() {
    let app = sqlite_router().await;
    for path in ["/person/999", "/person/no-such-uid"] {
      let resp = send(&app, "GET", path, None).await;
      assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{path}");
      assert_eq!(body_text(resp).await, "Person not found");
    }
  }

  #[tokio::test]
  async fn numeric_segment_prefers_surrogate_id_over_uid() {
    let app = sqlite_router().await;
    for i in 1..=5 {
      create(&app, &format!("p{i}"), json!({})).await;
    }

    // uid "5" lands on surrogate id 6.
    let resp = send(&app, "PUT", "/person/5", Some(json!({ "name": "uid five" }))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["id"], 6);

    let by_five = body_json(send(&app, "GET", "/person/5", None).await).await;
    assert_eq!(by_five["id"], 5);
    assert_eq!(by_five["name"], "p5");

    let by_six = body_json(send(&app, "GET", "/person/6", None).await).await;
    assert_eq!(by_six["uid"], "5");
    assert_eq!(by_six["name"], "uid five");
  }

  #[tokio::test]
  async fn numeric_uid_is_found_when_no_such_surrogate_id() {
    let app = sqlite_router().await;
    send(&app, "PUT", "/person/9000", Some(json!({ "name": "only" }))).await;

    let resp = send(&app, "GET", "/person/9000", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["uid"], "9000");
  }

  // ── Update ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn update_replaces_fields_and_keeps_identity() {
    let app = sqlite_router().await;
    let created = create(&app, "John Doe", json!({ "age": 30 })).await;
    let uid = created["uid"].as_str().unwrap();

    let resp = send(
      &app,
      "PUT",
      &format!("/person/{uid}"),
      Some(json!({ "name": "John Q. Doe", "traits": { "age": 31 }, "timestamp": "2000-01-01T00:00:00Z" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated = body_json(resp).await;
    assert_eq!(updated["id"], created["id"]);
    assert_eq!(updated["uid"], created["uid"]);

    let fetched = body_json(send(&app, "GET", &format!("/person/{uid}"), None).await).await;
    assert_eq!(fetched["id"], created["id"]);
    assert_eq!(fetched["uid"], created["uid"]);
    assert_eq!(fetched["name"], "John Q. Doe");
    assert_eq!(fetched["traits"], json!({ "age": 31 }));
    assert_ne!(fetched["timestamp"], "2000-01-01T00:00:00Z");

    let old: chrono::DateTime<chrono::Utc> =
      serde_json::from_value(created["timestamp"].clone()).unwrap();
    let new: chrono::DateTime<chrono::Utc> =
      serde_json::from_value(fetched["timestamp"].clone()).unwrap();
    assert!(new >= old);
  }

  #[tokio::test]
  async fn update_unknown_uid_creates_it() {
    let app = sqlite_router().await;
    let resp = send(&app, "PUT", "/person/fresh-uid", Some(json!({ "name": "New" }))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let person = body_json(resp).await;
    assert_eq!(person["uid"], "fresh-uid");
    assert!(person["id"].as_i64().unwrap() > 0);
  }

  #[tokio::test]
  async fn update_malformed_body_returns_400() {
    let app = sqlite_router().await;
    let resp = send_raw(&app, "PUT", "/person/x", "{\"traits\":").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  // ── Delete ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_get_delete_get_lifecycle() {
    let app = sqlite_router().await;
    let created = create(&app, "John Doe", json!({ "age": 30 })).await;
    let path = format!("/person/{}", created["uid"].as_str().unwrap());

    assert_eq!(send(&app, "GET", &path, None).await.status(), StatusCode::OK);

    let del = send(&app, "DELETE", &path, None).await;
    assert_eq!(del.status(), StatusCode::NO_CONTENT);
    assert!(body_text(del).await.is_empty());

    assert_eq!(send(&app, "GET", &path, None).await.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn delete_nonexistent_returns_204() {
    let app = sqlite_router().await;
    let resp = send(&app, "DELETE", "/person/never-existed", None).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
  }

  // ── Alternate stores ────────────────────────────────────────────────────────

  #[tokio::test]
  async fn memory_store_serves_same_contract() {
    let store = Arc::new(MemoryStore::new());
    let app = api_router(store.clone());

    let created = create(&app, "Mem", json!([1, 2, 3])).await;
    let dup = send(&app, "POST", "/person", Some(json!({ "name": "Mem" }))).await;
    assert_eq!(dup.status(), StatusCode::CONFLICT);

    let uid = created["uid"].as_str().unwrap();
    assert_eq!(store.get_person_by_uid(uid).await.unwrap().traits, json!([1, 2, 3]));
  }

  /// A store whose every call fails with a backend error.
  struct BrokenStore;

  fn broken() -> Error { Error::Store("connection refused".into()) }

  impl PersonStore for BrokenStore {
    async fn save(&self, _: Person) -> folk_core::Result<Person> { Err(broken()) }
    async fn create_person(&self, _: Person) -> folk_core::Result<Person> { Err(broken()) }
    async fn delete_person(&self, _: &str) -> folk_core::Result<()> { Err(broken()) }
    async fn get_person_by_name(&self, _: &str) -> folk_core::Result<Person> { Err(broken()) }
    async fn get_person_by_id(&self, _: i64) -> folk_core::Result<Person> { Err(broken()) }
    async fn get_person_by_uid(&self, _: &str) -> folk_core::Result<Person> { Err(broken()) }
    async fn get_all_persons(&self) -> folk_core::Result<Vec<Person>> { Err(broken()) }
  }

  #[tokio::test]
  async fn store_failures_return_500_with_raw_message() {
    let app = api_router(Arc::new(BrokenStore));
    let body = json!({ "name": "x" });
    let calls = [
      ("GET", "/person", None),
      ("POST", "/person", Some(body.clone())),
      ("GET", "/person/1", None),
      ("GET", "/person/abc", None),
      ("PUT", "/person/abc", Some(body)),
      ("DELETE", "/person/abc", None),
    ];
    for (method, uri, body) in calls {
      let resp = send(&app, method, uri, body).await;
      assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR, "{method} {uri}");
      assert_eq!(body_text(resp).await, "connection refused");
    }
  }

  #[tokio::test]
  async fn decode_error_wins_over_store_failure() {
    let app = api_router(Arc::new(BrokenStore));
    let resp = send_raw(&app, "POST", "/person", "nope").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }
}
