//! Test utilities for store setup.
//!
//! Provides helpers that reuse the authoritative schema initialization,
//! so tests never carry their own copy of the table definitions.

use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::db::{self, DbPool};

/// Test environment with a migrated SQLite database and a directory for JSON stores.
///
/// Everything lives in one temporary directory that is removed when dropped.
pub struct TestEnv {
    /// Temporary directory (kept alive for database file persistence)
    pub temp: TempDir,
    /// revision.db with the full schema
    pub pool: DbPool,
}

impl TestEnv {
    pub fn new() -> rusqlite::Result<Self> {
        let temp =
            TempDir::new().map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
        let pool = db::init_db(&temp.path().join("revision.db"))?;
        Ok(Self { temp, pool })
    }

    /// Get the temporary directory path for creating test files.
    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    /// Path for a catalog's JSON store inside the temp directory
    pub fn json_path(&self, catalog: &str) -> PathBuf {
        self.temp.path().join(format!("{catalog}.json"))
    }
}
