//! Configuration management for the inventory dashboards
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides with INVDASH_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use validator::Validate;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Snapshot file locations
    pub data: DataConfig,

    /// Report tuning
    pub reports: ReportsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

/// Text encoding of the snapshot exports
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotEncoding {
    /// Windows-side exports; decoded as windows-1252, the superset of Latin-1
    Latin1,
    Utf8,
}

impl SnapshotEncoding {
    pub fn encoding(self) -> &'static encoding_rs::Encoding {
        match self {
            SnapshotEncoding::Latin1 => encoding_rs::WINDOWS_1252,
            SnapshotEncoding::Utf8 => encoding_rs::UTF_8,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DataConfig {
    /// Supplier assignment list (`Forn.csv`)
    pub supplier_path: String,

    /// Stock ledger (`smg12.f888.csv`)
    pub stock_ledger_path: String,

    /// Loss events, exported to delimited text
    pub loss_events_path: String,

    /// Expiry list, exported to delimited text
    pub expiry_path: String,

    /// Field delimiter of every snapshot
    pub delimiter: char,

    pub encoding: SnapshotEncoding,
}

#[derive(Debug, Deserialize, Clone, Validate)]
pub struct ReportsConfig {
    /// Rows per page on paginated listings
    #[validate(range(min = 1, max = 10000))]
    pub page_size: usize,

    /// Row cap on interactive (non-export) results
    #[validate(range(min = 1))]
    pub display_cap: usize,

    /// Minimum days without sale when a stale-inventory query gives none
    #[validate(range(min = 0))]
    pub default_min_days: i64,

    /// Upper bound of the expiring-soon window, in days
    #[validate(range(min = 0, max = 3650))]
    pub expiry_window_days: i64,

    /// Rows listed per total-loss box
    #[validate(range(min = 1))]
    pub detail_row_limit: usize,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("INVDASH_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("data.supplier_path", "data/Forn.csv")?
            .set_default("data.stock_ledger_path", "data/smg12.f888.csv")?
            .set_default("data.loss_events_path", "data/SAEOI051.csv")?
            .set_default("data.expiry_path", "data/SAEOU060.csv")?
            .set_default("data.delimiter", ";")?
            .set_default("data.encoding", "latin1")?
            .set_default("reports.page_size", 50)?
            .set_default("reports.display_cap", 1000)?
            .set_default("reports.default_min_days", 3)?
            .set_default("reports.expiry_window_days", 45)?
            .set_default("reports.detail_row_limit", 50)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (INVDASH_ prefix)
            .add_source(
                Environment::with_prefix("INVDASH")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = config.try_deserialize()?;
        config
            .reports
            .validate()
            .map_err(|e| ConfigError::Message(format!("invalid reports settings: {}", e)))?;
        Ok(config)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            supplier_path: "data/Forn.csv".to_string(),
            stock_ledger_path: "data/smg12.f888.csv".to_string(),
            loss_events_path: "data/SAEOI051.csv".to_string(),
            expiry_path: "data/SAEOU060.csv".to_string(),
            delimiter: ';',
            encoding: SnapshotEncoding::Latin1,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            server: ServerConfig::default(),
            data: DataConfig::default(),
            reports: ReportsConfig::default(),
        }
    }
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            page_size: 50,
            display_cap: 1000,
            default_min_days: 3,
            expiry_window_days: 45,
            detail_row_limit: 50,
        }
    }
}
