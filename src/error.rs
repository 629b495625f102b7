//! Scheduler errors.

use thiserror::Error;

/// Failures of the persistence medium behind a [`crate::db::ReviewStore`].
#[derive(Error, Debug)]
pub enum StorageError {
  #[error("SQLite error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  #[error("Failed to read/write review file: {0}")]
  Io(#[from] std::io::Error),

  #[error("Failed to (de)serialize review states: {0}")]
  Serde(#[from] serde_json::Error),

  #[error("Database unavailable")]
  LockPoisoned,
}

/// Errors reported by the engine and its collaborators
#[derive(Error, Debug)]
pub enum SchedulerError {
  #[error("Item '{0}' not found")]
  NotFound(String),

  #[error("Invalid review state for '{id}': {reason}")]
  InvalidState { id: String, reason: String },

  #[error("Storage failure: {0}")]
  StorageFailure(#[from] StorageError),
}

impl SchedulerError {
  pub fn invalid_state(id: &str, reason: impl Into<String>) -> Self {
    Self::InvalidState {
      id: id.to_string(),
      reason: reason.into(),
    }
  }
}

impl From<rusqlite::Error> for SchedulerError {
  fn from(e: rusqlite::Error) -> Self {
    Self::StorageFailure(StorageError::Sqlite(e))
  }
}

impl From<std::io::Error> for SchedulerError {
  fn from(e: std::io::Error) -> Self {
    Self::StorageFailure(StorageError::Io(e))
  }
}

impl From<serde_json::Error> for SchedulerError {
  fn from(e: serde_json::Error) -> Self {
    Self::StorageFailure(StorageError::Serde(e))
  }
}

pub type Result<T, E = SchedulerError> = std::result::Result<T, E>;
