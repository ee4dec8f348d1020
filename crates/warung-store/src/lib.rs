//! # warung-store: Application Layer for Warung Sayur
//!
//! Ties the pieces together: configuration, the storage backend, the
//! [`DataStore`] and the login [`SessionStore`].
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Application Startup                               │
//! │                                                                         │
//! │  1. Initialize Logging ───────────────────────────────────────────────► │
//! │     • tracing-subscriber with env filter                                │
//! │     • Default: info,warung=debug,sqlx=warn; override with RUST_LOG      │
//! │                                                                         │
//! │  2. Load Configuration ───────────────────────────────────────────────► │
//! │     • defaults → warung.toml → WARUNG_* environment                     │
//! │                                                                         │
//! │  3. Open Storage ─────────────────────────────────────────────────────► │
//! │     • sqlite: create data dir, connect, WAL, run migrations             │
//! │     • memory: nothing on disk                                           │
//! │                                                                         │
//! │  4. Load State ───────────────────────────────────────────────────────► │
//! │     • DataStore: products, sales, purchases                             │
//! │     • SessionStore: last logged-in user                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! warung_store::init_tracing();
//! let app = warung_store::open(AppConfig::load_or_default(None)).await?;
//!
//! let user = app.session.login("kasir", "kasir123").await?;
//! let sale = app.store.add_sale(NewSale::new(1, 5), &user.username).await?;
//! if let Some(warning) = app.store.take_persistence_warning().await {
//!     show_toast(&warning);
//! }
//! ```

pub mod config;
pub mod error;
pub mod session;
pub mod store;

pub use config::{AppConfig, StorageKind};
pub use error::{ApiError, ErrorCode, StoreError, StoreResult};
pub use session::SessionStore;
pub use store::{DataStore, StorePolicy};

use tracing::info;
use tracing_subscriber::EnvFilter;
use warung_db::{Database, DbConfig, Persistence};

/// Everything a running shop needs.
#[derive(Debug)]
pub struct AppState {
    pub config: AppConfig,
    pub store: DataStore,
    pub session: SessionStore,
}

impl AppState {
    /// Shuts down the storage backend.
    pub async fn close(&self) {
        self.store.close().await;
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages everywhere
/// - `RUST_LOG=warung_store=trace` - Trace one crate only
/// - Default: `info,warung=debug,sqlx=warn`
///
/// Safe to call more than once; later calls do nothing.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,warung=debug,sqlx=warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init();
}

/// Opens the configured storage and loads the store and session.
pub async fn open(config: AppConfig) -> StoreResult<AppState> {
    config.validate()?;

    info!(
        shop = %config.shop.name,
        backend = %config.storage.backend,
        "Opening Warung Sayur"
    );

    let (persistence, database) = match config.storage.backend {
        StorageKind::Memory => (Persistence::in_memory(), None),
        StorageKind::Sqlite => {
            let path = config.database_path()?;
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            info!(?path, "Database path determined");

            let database = Database::new(DbConfig::new(path)).await?;
            (Persistence::sqlite(&database), Some(database))
        }
    };

    let mut store = DataStore::init(persistence.clone(), config.policy).await;
    if let Some(database) = database {
        store = store.with_database(database);
    }
    let session = SessionStore::restore(persistence).await;

    info!("State initialized");
    Ok(AppState {
        config,
        store,
        session,
    })
}
