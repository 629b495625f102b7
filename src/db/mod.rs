//! Review record storage.
//!
//! `ReviewStore` is the seam between the engine and the persistence medium.
//! Every mutating call is durable before it returns, and a failed write leaves
//! the previously stored state readable.

pub mod json_file;
pub mod memory;
pub mod schema;
pub mod sqlite;

use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::ReviewState;
use crate::error::{Result, StorageError};

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use schema::run_migrations;
pub use sqlite::SqliteStore;

pub type DbPool = Arc<Mutex<Connection>>;

/// Durable key-value persistence of review states by item id
pub trait ReviewStore: Send {
  /// State for `id`, or `None` if the item was never registered
  fn get(&self, id: &str) -> Result<Option<ReviewState>>;

  /// Insert or replace the state for `id`
  fn put(&mut self, id: &str, state: &ReviewState) -> Result<()>;

  /// Every stored state; order is not guaranteed
  fn all(&self) -> Result<Vec<(String, ReviewState)>>;

  /// Remove the state for `id`, failing with `NotFound` if there is none
  fn delete(&mut self, id: &str) -> Result<()>;
}

impl<S: ReviewStore + ?Sized> ReviewStore for Box<S> {
  fn get(&self, id: &str) -> Result<Option<ReviewState>> {
    (**self).get(id)
  }

  fn put(&mut self, id: &str, state: &ReviewState) -> Result<()> {
    (**self).put(id, state)
  }

  fn all(&self) -> Result<Vec<(String, ReviewState)>> {
    (**self).all()
  }

  fn delete(&mut self, id: &str) -> Result<()> {
    (**self).delete(id)
  }
}

/// Try to acquire the database lock, returning an error if poisoned
pub fn try_lock(pool: &DbPool) -> std::result::Result<MutexGuard<'_, Connection>, StorageError> {
  pool.lock().map_err(|_: PoisonError<_>| {
    tracing::error!("Database mutex poisoned - a thread panicked while holding the lock");
    StorageError::LockPoisoned
  })
}

pub fn init_db(path: &Path) -> rusqlite::Result<DbPool> {
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent).ok();
  }

  // Create backup before migrations if database exists
  if path.exists() {
    let backup_path = path.with_extension("db.backup");
    if let Err(e) = std::fs::copy(path, &backup_path) {
      tracing::warn!("Could not create database backup: {}", e);
    }
  }

  let conn = Connection::open(path)?;
  run_migrations(&conn)?;
  tracing::info!("Opened review database at {}", path.display());
  Ok(Arc::new(Mutex::new(conn)))
}
