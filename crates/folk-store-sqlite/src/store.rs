//! [`SqliteStore`] — the SQLite implementation of [`PersonStore`].

use std::path::Path;

use rusqlite::{OptionalExtension as _, TransactionBehavior};

use folk_core::{person::Person, store::PersonStore};

use crate::{
  Result,
  encode::{EncodedPerson, RawPerson},
  schema::{COLUMNS, SCHEMA},
};

/// Outcome of the guarded insert run by `create_person`.
enum Created {
  Inserted(i64),
  NameTaken,
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A person store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. All calls
/// are serialised onto the connection's worker thread.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Fetch at most one row matching `column = value`.
  async fn find_one(
    &self,
    column: &'static str,
    value: rusqlite::types::Value,
  ) -> Result<Option<Person>> {
    let raw: Option<RawPerson> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {COLUMNS} FROM persons WHERE {column} = ?1 LIMIT 1"),
              rusqlite::params![value],
              RawPerson::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPerson::into_person).transpose()
  }

  async fn upsert(&self, mut person: Person) -> Result<Person> {
    let encoded = EncodedPerson::new(&person)?;
    person.id = self
      .conn
      .call(move |conn| Ok(encoded.upsert(conn)?))
      .await?;
    Ok(person)
  }

  async fn insert_unless_name_taken(&self, person: &Person) -> Result<Created> {
    let encoded = EncodedPerson::new(person)?;
    let created = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let taken = tx
          .query_row(
            "SELECT 1 FROM persons WHERE name = ?1 LIMIT 1",
            rusqlite::params![encoded.name],
            |_| Ok(()),
          )
          .optional()?
          .is_some();
        if taken {
          return Ok(Created::NameTaken);
        }
        let id = encoded.upsert(&tx)?;
        tx.commit()?;
        Ok(Created::Inserted(id))
      })
      .await?;
    Ok(created)
  }
}

// ─── PersonStore impl ────────────────────────────────────────────────────────

impl PersonStore for SqliteStore {
  // ── Writes ────────────────────────────────────────────────────────────────

  async fn save(&self, person: Person) -> folk_core::Result<Person> {
    Ok(self.upsert(person).await?)
  }

  async fn create_person(&self, mut person: Person) -> folk_core::Result<Person> {
    match self.insert_unless_name_taken(&person).await? {
      Created::Inserted(id) => {
        person.id = id;
        Ok(person)
      }
      Created::NameTaken => Err(folk_core::Error::NameTaken(person.name)),
    }
  }

  async fn delete_person(&self, uid: &str) -> folk_core::Result<()> {
    let uid = uid.to_owned();
    self
      .conn
      .call(move |conn| {
        conn.execute("DELETE FROM persons WHERE uid = ?1", rusqlite::params![uid])?;
        Ok(())
      })
      .await
      .map_err(crate::Error::from)?;
    Ok(())
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn get_person_by_name(&self, name: &str) -> folk_core::Result<Person> {
    self
      .find_one("name", name.to_owned().into())
      .await?
      .ok_or(folk_core::Error::NotFound)
  }

  async fn get_person_by_id(&self, id: i64) -> folk_core::Result<Person> {
    self
      .find_one("id", id.into())
      .await?
      .ok_or(folk_core::Error::NotFound)
  }

  async fn get_person_by_uid(&self, uid: &str) -> folk_core::Result<Person> {
    self
      .find_one("uid", uid.to_owned().into())
      .await?
      .ok_or(folk_core::Error::NotFound)
  }

  async fn get_all_persons(&self) -> folk_core::Result<Vec<Person>> {
    let raws: Vec<RawPerson> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM persons ORDER BY id"))?;
        let rows = stmt
          .query_map([], RawPerson::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(crate::Error::from)?;

    Ok(
      raws
        .into_iter()
        .map(RawPerson::into_person)
        .collect::<Result<_>>()?,
    )
  }
}
