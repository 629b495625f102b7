//! Application configuration.
//!
//! Scheduling constants live here next to the runtime settings. Runtime
//! settings are resolved with priority config.toml > environment (.env) > default.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::srs::SchedulingPolicy;

// ==================== Scheduling Constants ====================

/// Interval given to a freshly registered item, in days
pub const INITIAL_INTERVAL: i64 = 1;

/// Ease factor given to a freshly registered item
pub const DEFAULT_EASE: f64 = 2.5;

/// Ease factor floor shared by both policies
pub const MIN_EASE: f64 = 1.3;

/// Ease factor ceiling of the boolean-outcome policy
pub const MAX_BOOLEAN_EASE: f64 = 2.5;

/// Boolean-outcome ease adjustments
pub const EASE_BONUS: f64 = 0.15;
pub const EASE_PENALTY: f64 = 0.2;

/// Graded-outcome interval multipliers (medium is 1.0)
pub const EASY_MULTIPLIER: f64 = 1.3;
pub const HARD_MULTIPLIER: f64 = 0.5;

/// Graded-outcome ease step, added on easy and subtracted otherwise
pub const GRADED_EASE_STEP: f64 = 0.1;

/// Longest interval either policy hands out, in days (about a century).
/// Keeps repeated easy reviews from running past the calendar.
pub const MAX_INTERVAL_DAYS: i64 = 36_500;

/// Items scheduled at least this far out count as mastered in stats
pub const MASTERED_INTERVAL_DAYS: i64 = 21;

// ==================== Runtime Configuration ====================

pub const DEFAULT_DATABASE_PATH: &str = "data/revision.db";
pub const DEFAULT_JSON_DIR: &str = "data/catalogs";
pub const DEFAULT_SERVER_ADDR: &str = "0.0.0.0";
pub const DEFAULT_SERVER_PORT: u16 = 3000;

/// Where review states are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// One SQLite database shared by all catalogs
    Sqlite,
    /// One JSON file per catalog
    Json,
}

impl StorageBackend {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "sqlite" => Some(Self::Sqlite),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Resolved configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database_path: PathBuf,
    pub backend: StorageBackend,
    pub json_dir: PathBuf,
    pub server_addr: String,
    pub server_port: u16,
    /// Catalog name → scheduling policy
    pub catalogs: BTreeMap<String, SchedulingPolicy>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            backend: StorageBackend::Sqlite,
            json_dir: PathBuf::from(DEFAULT_JSON_DIR),
            server_addr: DEFAULT_SERVER_ADDR.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            catalogs: default_catalogs(),
        }
    }
}

/// Exercises are judged pass/fail, flashcards are self-graded
pub fn default_catalogs() -> BTreeMap<String, SchedulingPolicy> {
    BTreeMap::from([
        ("exercises".to_string(), SchedulingPolicy::BooleanOutcome),
        ("flashcards".to_string(), SchedulingPolicy::GradedOutcome),
    ])
}

impl Config {
    /// Load configuration from `config.toml` in the working directory and the environment
    pub fn load() -> Self {
        // Load .env file if present
        let _ = dotenvy::dotenv();
        Self::load_from(Path::new("config.toml"), |key| std::env::var(key).ok())
    }

    /// Resolve configuration from a TOML file (if readable) and an env lookup
    pub fn load_from(config_path: &Path, env: impl Fn(&str) -> Option<String>) -> Self {
        let file = match std::fs::read_to_string(config_path) {
            Ok(contents) => match toml::from_str::<ConfigFile>(&contents) {
                Ok(file) => file,
                Err(e) => {
                    tracing::warn!("Ignoring malformed {}: {}", config_path.display(), e);
                    ConfigFile::default()
                }
            },
            Err(_) => ConfigFile::default(),
        };
        Self::resolve(file, env)
    }

    fn resolve(file: ConfigFile, env: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Config::default();
        let database = file.database.unwrap_or_default();
        let storage = file.storage.unwrap_or_default();
        let server = file.server.unwrap_or_default();

        if let Some(path) = database.path {
            tracing::info!("Using database from config.toml: {}", path);
            config.database_path = PathBuf::from(path);
        } else if let Some(path) = env("DATABASE_PATH") {
            tracing::info!("Using database from DATABASE_PATH env: {}", path);
            config.database_path = PathBuf::from(path);
        }

        if let Some(backend) = storage.backend {
            config.backend = backend;
        } else if let Some(value) = env("STORAGE_BACKEND") {
            match StorageBackend::from_str(&value) {
                Some(backend) => config.backend = backend,
                None => tracing::warn!("Unknown STORAGE_BACKEND '{}', using sqlite", value),
            }
        }

        if let Some(dir) = storage.json_dir.or_else(|| env("JSON_DIR")) {
            config.json_dir = PathBuf::from(dir);
        }

        if let Some(addr) = server.addr {
            config.server_addr = addr;
        }
        if let Some(port) = server.port {
            config.server_port = port;
        } else if let Some(port) = env("PORT").and_then(|p| p.parse().ok()) {
            config.server_port = port;
        }

        // Catalogs listed in config.toml override or extend the defaults
        for (name, catalog) in file.catalogs {
            config.catalogs.insert(name, catalog.strategy);
        }

        config
    }

    /// Get the full server bind address
    pub fn server_bind_addr(&self) -> String {
        format!("{}:{}", self.server_addr, self.server_port)
    }

    /// JSON file backing a catalog when the json backend is selected
    pub fn json_path(&self, catalog: &str) -> PathBuf {
        self.json_dir.join(format!("{catalog}.json"))
    }
}

// ==================== config.toml Layout ====================

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    database: Option<DatabaseSection>,
    storage: Option<StorageSection>,
    server: Option<ServerSection>,
    #[serde(default)]
    catalogs: BTreeMap<String, CatalogSection>,
}

#[derive(Debug, Default, Deserialize)]
struct DatabaseSection {
    path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct StorageSection {
    backend: Option<StorageBackend>,
    json_dir: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerSection {
    addr: Option<String>,
    port: Option<u16>,
}

#[derive(Debug, Deserialize)]
struct CatalogSection {
    strategy: SchedulingPolicy,
}
