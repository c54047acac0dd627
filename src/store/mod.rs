// Persistence stores - durable database or ephemeral session-keyed rows
//
// The backend is chosen once, at construction time, from configuration.
// The workflow only ever sees the trait object.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::config::StoreConfig;
use crate::record::{Record, Selector};

#[cfg(feature = "database")]
pub mod database;
pub mod session;

#[cfg(feature = "database")]
pub use database::DatabaseStore;
pub use session::SessionStore;

/// Failure classes a store can report for a single record update.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// User-correctable failure (constraint violations and the like);
    /// surfaces as a record-level validation error, not a fatal page.
    #[error("{0}")]
    User(String),
    /// Unrecoverable failure carrying the raw store diagnostic.
    #[error("{0}")]
    Fatal(String),
    /// The store reported failure without any diagnostic.
    #[error("store reported failure without diagnostic")]
    Unknown,
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Commits or rejects a single record update. The implementation owns
/// whatever transaction semantics the backend provides; no retries are
/// performed on top of it.
#[async_trait]
pub trait PersistenceStore: Send + Sync {
    /// Persist the updated record under `selector`.
    async fn update(&self, selector: &Selector, record: &Record) -> StoreResult<()>;

    /// Backend name for log lines.
    fn backend(&self) -> &'static str;
}

/// Name selecting the ephemeral store; any other backend value means the
/// durable database store.
pub const SESSION_BACKEND: &str = "session";

/// Build the configured store. Called once when the workflow is
/// constructed; the choice is never re-read per invocation.
pub async fn from_config(cfg: &StoreConfig) -> Result<Arc<dyn PersistenceStore>> {
    if cfg.backend == SESSION_BACKEND {
        Ok(Arc::new(SessionStore::new()))
    } else {
        durable_from_config(cfg).await
    }
}

#[cfg(feature = "database")]
async fn durable_from_config(cfg: &StoreConfig) -> Result<Arc<dyn PersistenceStore>> {
    let db = cfg.database.as_ref().ok_or_else(|| {
        anyhow::anyhow!(
            "store backend '{}' requires [store.database] configuration",
            cfg.backend
        )
    })?;
    let store = DatabaseStore::connect(&db.url, db.max_connections, db.auto_migrate).await?;
    Ok(Arc::new(store))
}

#[cfg(not(feature = "database"))]
async fn durable_from_config(cfg: &StoreConfig) -> Result<Arc<dyn PersistenceStore>> {
    anyhow::bail!(
        "store backend '{}' requires the 'database' feature",
        cfg.backend
    )
}
