//! # Application Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     WARUNG_DB_PATH=/data/warung.db                                     │
//! │     WARUNG_STORAGE_BACKEND=memory                                      │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/warungsayur/warung.toml (Linux)                          │
//! │     ~/Library/Application Support/com.warung.warungsayur/ (macOS)      │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [shop]
//! name = "Warung Sayur"
//! backup_slug = "warung-sayur"
//!
//! [storage]
//! backend = "sqlite"   # sqlite | memory
//! database_path = "/home/ibu/warung.db"
//!
//! [policy]
//! reverse_stock_on_delete = false
//!
//! [report]
//! operating_expenses = 500000
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use warung_core::{Backup, Money};

use crate::error::{StoreError, StoreResult};
use crate::store::StorePolicy;

const CONFIG_FILE_NAME: &str = "warung.toml";
const DATABASE_FILE_NAME: &str = "warung.db";

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "warung", "warungsayur")
}

// =============================================================================
// Storage Backend
// =============================================================================

/// Where the collections are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageKind {
    /// Local SQLite file.
    #[default]
    Sqlite,

    /// Nothing written to disk; data is lost on exit.
    Memory,
}

impl std::fmt::Display for StorageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageKind::Sqlite => write!(f, "sqlite"),
            StorageKind::Memory => write!(f, "memory"),
        }
    }
}

impl std::str::FromStr for StorageKind {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sqlite" | "file" => Ok(StorageKind::Sqlite),
            "memory" | "in-memory" => Ok(StorageKind::Memory),
            other => Err(StoreError::Config(format!(
                "Unknown storage backend: '{}'. Valid options: sqlite, memory",
                other
            ))),
        }
    }
}

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopConfig {
    /// Shown in the header and logs.
    #[serde(default = "default_shop_name")]
    pub name: String,

    /// Middle part of backup file names.
    #[serde(default = "default_backup_slug")]
    pub backup_slug: String,
}

fn default_shop_name() -> String {
    "Warung Sayur".to_string()
}

fn default_backup_slug() -> String {
    "warung-sayur".to_string()
}

impl Default for ShopConfig {
    fn default() -> Self {
        ShopConfig {
            name: default_shop_name(),
            backup_slug: default_backup_slug(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageKind,

    /// SQLite file. Defaults to `warung.db` in the platform data directory.
    #[serde(default)]
    pub database_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Monthly running costs in rupiah, subtracted for net profit.
    #[serde(default = "default_operating_expenses")]
    pub operating_expenses: i64,
}

fn default_operating_expenses() -> i64 {
    500_000
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            operating_expenses: default_operating_expenses(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub shop: ShopConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub policy: StorePolicy,

    #[serde(default)]
    pub report: ReportConfig,
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`warung.toml`)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> StoreResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> StoreResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| StoreError::Config("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Config saved");
        Ok(())
    }

    pub fn validate(&self) -> StoreResult<()> {
        let slug = self.shop.backup_slug.trim();
        if slug.is_empty() {
            return Err(StoreError::Config("backup_slug must not be empty".into()));
        }
        if slug.contains(['/', '\\']) {
            return Err(StoreError::Config(format!(
                "backup_slug must not contain path separators, got: {}",
                slug
            )));
        }

        if self.report.operating_expenses < 0 {
            return Err(StoreError::Config(
                "operating_expenses must not be negative".into(),
            ));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Applies `WARUNG_*` overrides read through `var`.
    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(path) = var("WARUNG_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.storage.database_path = Some(PathBuf::from(path));
        }

        if let Some(backend) = var("WARUNG_STORAGE_BACKEND") {
            match backend.parse() {
                Ok(kind) => self.storage.backend = kind,
                Err(e) => warn!(backend = %backend, error = %e, "Ignoring storage backend override"),
            }
        }

        if let Some(flag) = var("WARUNG_REVERSE_STOCK_ON_DELETE") {
            match flag.to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.policy.reverse_stock_on_delete = true,
                "0" | "false" | "no" | "off" => self.policy.reverse_stock_on_delete = false,
                _ => warn!(value = %flag, "Unknown WARUNG_REVERSE_STOCK_ON_DELETE value"),
            }
        }

        if let Some(name) = var("WARUNG_SHOP_NAME") {
            self.shop.name = name;
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// The SQLite file to open: the configured one, or `warung.db` in the
    /// platform data directory.
    pub fn database_path(&self) -> StoreResult<PathBuf> {
        if let Some(path) = &self.storage.database_path {
            return Ok(path.clone());
        }

        project_dirs()
            .map(|dirs| dirs.data_dir().join(DATABASE_FILE_NAME))
            .ok_or_else(|| StoreError::Config("Could not determine app data directory".into()))
    }

    pub fn operating_expenses(&self) -> Money {
        Money::from_rupiah(self.report.operating_expenses)
    }

    /// `backup-<slug>-<YYYY-MM-DD>.json`
    pub fn backup_file_name(&self, date: NaiveDate) -> String {
        Backup::file_name(self.shop.backup_slug.trim(), date)
    }
}
