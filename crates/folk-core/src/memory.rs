//! [`MemoryStore`] — a process-local [`PersonStore`], used as a test double
//! for the API layer.

use std::sync::{Arc, RwLock};

use crate::{Error, Result, person::Person, store::PersonStore};

#[derive(Debug, Default)]
struct Inner {
  next_id: i64,
  rows:    Vec<Person>,
}

impl Inner {
  fn upsert(&mut self, mut person: Person) -> Person {
    if let Some(row) = self.rows.iter_mut().find(|p| p.uid == person.uid) {
      row.name = person.name;
      row.timestamp = person.timestamp;
      row.traits = person.traits;
      return row.clone();
    }
    self.next_id += 1;
    person.id = self.next_id;
    self.rows.push(person.clone());
    person
  }

  fn find(&self, pred: impl Fn(&Person) -> bool) -> Result<Person> {
    self.rows.iter().find(|p| pred(p)).cloned().ok_or(Error::NotFound)
  }
}

/// An in-memory person store.
///
/// Cloning is cheap; clones share the same rows.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
  inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Inner>> {
    self.inner.read().map_err(|e| Error::Store(e.to_string().into()))
  }

  fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Inner>> {
    self.inner.write().map_err(|e| Error::Store(e.to_string().into()))
  }
}

impl PersonStore for MemoryStore {
  async fn save(&self, person: Person) -> Result<Person> {
    Ok(self.write()?.upsert(person))
  }

  async fn create_person(&self, person: Person) -> Result<Person> {
    let mut inner = self.write()?;
    if inner.rows.iter().any(|p| p.name == person.name) {
      return Err(Error::NameTaken(person.name));
    }
    Ok(inner.upsert(person))
  }

  async fn delete_person(&self, uid: &str) -> Result<()> {
    self.write()?.rows.retain(|p| p.uid != uid);
    Ok(())
  }

  async fn get_person_by_name(&self, name: &str) -> Result<Person> {
    self.read()?.find(|p| p.name == name)
  }

  async fn get_person_by_id(&self, id: i64) -> Result<Person> {
    self.read()?.find(|p| p.id == id)
  }

  async fn get_person_by_uid(&self, uid: &str) -> Result<Person> {
    self.read()?.find(|p| p.uid == uid)
  }

  async fn get_all_persons(&self) -> Result<Vec<Person>> {
    Ok(self.read()?.rows.clone())
  }
}
