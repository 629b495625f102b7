//! In-memory review store.
//!
//! Nothing survives a restart; used by tests and throwaway sessions.

use std::collections::HashMap;

use super::ReviewStore;
use crate::domain::ReviewState;
use crate::error::{Result, SchedulerError};

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
  states: HashMap<String, ReviewState>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }
}

impl ReviewStore for MemoryStore {
  fn get(&self, id: &str) -> Result<Option<ReviewState>> {
    Ok(self.states.get(id).cloned())
  }

  fn put(&mut self, id: &str, state: &ReviewState) -> Result<()> {
    self.states.insert(id.to_string(), state.clone());
    Ok(())
  }

  fn all(&self) -> Result<Vec<(String, ReviewState)>> {
    Ok(
      self
        .states
        .iter()
        .map(|(id, state)| (id.clone(), state.clone()))
        .collect(),
    )
  }

  fn delete(&mut self, id: &str) -> Result<()> {
    self
      .states
      .remove(id)
      .map(|_| ())
      .ok_or_else(|| SchedulerError::NotFound(id.to_string()))
  }
}
