//! Encoding and decoding helpers between [`Person`] and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings; traits as compact JSON.

use chrono::{DateTime, Utc};
use folk_core::person::Person;

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Bound parameters for [`UPSERT`](crate::schema::UPSERT).
pub struct EncodedPerson {
  pub uid:       String,
  pub name:      String,
  pub timestamp: String,
  pub traits:    String,
}

impl EncodedPerson {
  pub fn new(p: &Person) -> Result<Self> {
    Ok(Self {
      uid:       p.uid.clone(),
      name:      p.name.clone(),
      timestamp: encode_dt(p.timestamp),
      traits:    serde_json::to_string(&p.traits)?,
    })
  }

  pub fn upsert(&self, conn: &rusqlite::Connection) -> rusqlite::Result<i64> {
    conn.query_row(
      crate::schema::UPSERT,
      rusqlite::params![self.uid, self.name, self.timestamp, self.traits],
      |row| row.get(0),
    )
  }
}

/// Raw values read directly from a `persons` row.
pub struct RawPerson {
  pub id:        i64,
  pub uid:       String,
  pub name:      String,
  pub timestamp: String,
  pub traits:    String,
}

impl RawPerson {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(RawPerson {
      id:        row.get(0)?,
      uid:       row.get(1)?,
      name:      row.get(2)?,
      timestamp: row.get(3)?,
      traits:    row.get(4)?,
    })
  }

  pub fn into_person(self) -> Result<Person> {
    Ok(Person {
      id:        self.id,
      uid:       self.uid,
      name:      self.name,
      timestamp: decode_dt(&self.timestamp)?,
      traits:    serde_json::from_str(&self.traits)?,
    })
  }
}
