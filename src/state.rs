//! Application state: one engine per configured catalog.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use crate::clock::{Clock, SystemClock};
use crate::config::{Config, StorageBackend};
use crate::db::{self, JsonFileStore, ReviewStore, SqliteStore};
use crate::engine::Engine;
use crate::error::Result;

pub type SharedClock = Arc<dyn Clock + Sync>;

/// Engine as held by the server: store and clock chosen at start-up
pub type CatalogEngine = Engine<Box<dyn ReviewStore>, SharedClock>;

/// Catalog's engine behind a lock, so each request is one atomic unit
pub type SharedEngine = Arc<Mutex<CatalogEngine>>;

/// Application state passed to all handlers
#[derive(Clone)]
pub struct AppState {
    engines: Arc<BTreeMap<String, SharedEngine>>,
}

impl AppState {
    pub fn new(engines: impl IntoIterator<Item = CatalogEngine>) -> Self {
        let engines = engines
            .into_iter()
            .map(|engine| (engine.catalog().to_string(), Arc::new(Mutex::new(engine))))
            .collect();
        Self {
            engines: Arc::new(engines),
        }
    }

    /// Open a store for every configured catalog
    pub fn from_config(config: &Config) -> Result<Self> {
        let clock: SharedClock = Arc::new(SystemClock);
        let mut engines = Vec::with_capacity(config.catalogs.len());

        match config.backend {
            StorageBackend::Sqlite => {
                let pool = db::init_db(&config.database_path)?;
                for (name, policy) in &config.catalogs {
                    let store: Box<dyn ReviewStore> = Box::new(SqliteStore::new(pool.clone(), name.as_str()));
                    engines.push(Engine::with_clock(name.as_str(), *policy, store, clock.clone()));
                }
            }
            StorageBackend::Json => {
                for (name, policy) in &config.catalogs {
                    let store: Box<dyn ReviewStore> = Box::new(JsonFileStore::open(config.json_path(name))?);
                    engines.push(Engine::with_clock(name.as_str(), *policy, store, clock.clone()));
                }
            }
        }

        for engine in &engines {
            tracing::info!("Catalog '{}' uses {}", engine.catalog(), engine.policy().as_str());
        }
        Ok(Self::new(engines))
    }

    pub fn engine(&self, catalog: &str) -> Option<&SharedEngine> {
        self.engines.get(catalog)
    }

    pub fn catalogs(&self) -> impl Iterator<Item = (&str, &SharedEngine)> {
        self.engines.iter().map(|(name, engine)| (name.as_str(), engine))
    }
}
