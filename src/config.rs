use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for editflow
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EditflowConfig {
    /// Persistence store selection and settings
    pub store: StoreConfig,
    /// Redirect target construction
    pub navigation: NavigationConfig,
    /// Render cache settings
    pub cache: CacheConfig,
    /// Observability settings
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Store backend: `session` for the ephemeral keyed store, anything
    /// else selects the durable database store.
    pub backend: String,
    /// Database settings, required for non-session backends
    pub database: Option<DatabaseConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Database URL (SQLite file path or connection string)
    pub url: String,
    /// Maximum connections in pool
    pub max_connections: u32,
    /// Enable automatic migrations
    pub auto_migrate: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NavigationConfig {
    /// Dispatch endpoint all redirect URLs are built against
    pub base_url: String,
    /// Action name of the edit view redirects return to
    pub edit_action: String,
    /// Override target dialog saves post back to
    pub dialog_save_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Enable the render cache (invalidated on successful updates)
    pub enabled: bool,
    /// Maximum cached renderings
    pub capacity: u64,
    /// Entry time-to-live in seconds
    pub ttl_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Enable structured tracing output
    pub tracing_enabled: bool,
    /// Log level
    pub log_level: String,
}

impl Default for EditflowConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig {
                backend: "session".to_string(),
                database: Some(DatabaseConfig {
                    url: ".editflow/records.db".to_string(),
                    max_connections: 10,
                    auto_migrate: true,
                }),
            },
            navigation: NavigationConfig::default(),
            cache: CacheConfig {
                enabled: true,
                capacity: 1000,
                ttl_seconds: 300,
            },
            observability: ObservabilityConfig {
                tracing_enabled: true,
                log_level: "info".to_string(),
            },
        }
    }
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost/dispatch".to_string(),
            edit_action: "edit".to_string(),
            dialog_save_url: None,
        }
    }
}

impl EditflowConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration file (editflow.toml)
    /// 3. Environment variables (prefixed with EDITFLOW_)
    pub fn load() -> Result<Self> {
        let mut builder =
            Config::builder().add_source(Config::try_from(&EditflowConfig::default())?);

        if Path::new("editflow.toml").exists() {
            builder = builder.add_source(File::with_name("editflow"));
        }

        builder = builder.add_source(
            Environment::with_prefix("EDITFLOW")
                .separator("_")
                .try_parsing(true),
        );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_content = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::info!("Loaded environment variables from .env file");
        }
        Ok(())
    }
}

/// Global configuration instance
static CONFIG: std::sync::LazyLock<Result<EditflowConfig, anyhow::Error>> =
    std::sync::LazyLock::new(|| {
        let _ = EditflowConfig::load_env_file();
        EditflowConfig::load()
    });

/// Get the global configuration
pub fn config() -> Result<&'static EditflowConfig> {
    CONFIG
        .as_ref()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))
}

/// Initialize configuration (called at startup)
pub fn init_config() -> Result<()> {
    let _config = config()?;
    tracing::info!("Configuration loaded successfully");
    Ok(())
}
