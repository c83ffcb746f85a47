//! The `Person` record and its write payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// A stored person.
///
/// `id` is assigned by the store on first insert. `uid` is the public handle
/// and never changes once assigned. `traits` is carried verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
  pub id:        i64,
  pub uid:       String,
  pub name:      String,
  pub timestamp: DateTime<Utc>,
  pub traits:    serde_json::Value,
}

/// Client-supplied fields of a create or update request.
///
/// Any `id`, `uid` or `timestamp` present in the request body is ignored;
/// those are always assigned server-side.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PersonBody {
  #[serde(default, deserialize_with = "null_as_empty")]
  pub name:   String,
  #[serde(default)]
  pub traits: serde_json::Value,
}

/// `null` decodes as the empty string, same as an absent field.
fn null_as_empty<'de, D>(de: D) -> Result<String, D::Error>
where
  D: Deserializer<'de>,
{
  Ok(Option::<String>::deserialize(de)?.unwrap_or_default())
}

impl Person {
  /// Build an unsaved person with a fresh uid, stamped now.
  pub fn new(body: PersonBody) -> Self {
    Self::with_uid(Uuid::new_v4().hyphenated().to_string(), body)
  }

  /// Build an unsaved person under an existing uid, stamped now.
  ///
  /// `id` is left at zero; [`PersonStore::save`](crate::store::PersonStore::save)
  /// fills it in.
  pub fn with_uid(uid: impl Into<String>, body: PersonBody) -> Self {
    Person {
      id:        0,
      uid:       uid.into(),
      name:      body.name,
      timestamp: Utc::now(),
      traits:    body.traits,
    }
  }
}
