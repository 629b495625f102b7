//! Review store kept as a single JSON document per catalog.
//!
//! The file holds `{ "<item id>": ReviewState, ... }`. The whole table is
//! rewritten on every mutation: serialized to a sibling temp file, synced to
//! disk, then renamed over the previous file, so readers never observe a
//! half-written table.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use super::ReviewStore;
use crate::domain::ReviewState;
use crate::error::{Result, SchedulerError};

pub struct JsonFileStore {
  path: PathBuf,
  states: BTreeMap<String, ReviewState>,
}

impl JsonFileStore {
  /// Open the store at `path`, loading any states already on disk
  pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
    let path = path.into();
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)?;
    }

    let states = if path.exists() {
      let content = std::fs::read_to_string(&path)?;
      if content.trim().is_empty() {
        BTreeMap::new()
      } else {
        serde_json::from_str(&content)?
      }
    } else {
      BTreeMap::new()
    };

    tracing::info!("Loaded {} review states from {}", states.len(), path.display());
    Ok(Self { path, states })
  }

  fn flush(&self) -> Result<()> {
    let tmp_path = self.path.with_extension("json.tmp");
    let content = serde_json::to_vec_pretty(&self.states)?;
    {
      let mut file = File::create(&tmp_path)?;
      file.write_all(&content)?;
      file.sync_all()?;
    }
    std::fs::rename(&tmp_path, &self.path)?;
    Ok(())
  }
}

impl ReviewStore for JsonFileStore {
  fn get(&self, id: &str) -> Result<Option<ReviewState>> {
    Ok(self.states.get(id).cloned())
  }

  fn put(&mut self, id: &str, state: &ReviewState) -> Result<()> {
    let previous = self.states.insert(id.to_string(), state.clone());
    if let Err(e) = self.flush() {
      // Roll back so memory keeps matching the file
      match previous {
        Some(previous) => self.states.insert(id.to_string(), previous),
        None => self.states.remove(id),
      };
      return Err(e);
    }
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
    let previous = self
      .states
      .remove(id)
      .ok_or_else(|| SchedulerError::NotFound(id.to_string()))?;
    if let Err(e) = self.flush() {
      self.states.insert(id.to_string(), previous);
      return Err(e);
    }
    Ok(())
  }
}
