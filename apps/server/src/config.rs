//! Server configuration.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | Variable                      | Default                         |
//! |-------------------------------|---------------------------------|
//! | `ECOTRACK_BIND`               | `0.0.0.0:8080`                  |
//! | `ECOTRACK_DB_PATH`            | `<data dir>/erp_data.db`        |
//! | `ECOTRACK_DB_MAX_CONNECTIONS` | `5`                             |
//! | `ECOTRACK_STOCK_POLICY`       | `reject` (or `allow_oversell`)  |
//! | `ECOTRACK_CURRENCY`           | `INR`                           |
//! | `ECOTRACK_SESSION_IDLE_MINUTES` | `480` (one shift)             |

use directories::ProjectDirs;
use ecotrack_core::StockPolicy;
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

const DATABASE_FILE_NAME: &str = "erp_data.db";

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to
    pub bind_addr: SocketAddr,

    /// SQLite database file
    pub database_path: PathBuf,

    /// Pool size
    pub db_max_connections: u32,

    /// Commit-time stock rule for checkouts
    pub stock_policy: StockPolicy,

    /// Label printed next to invoice totals
    pub currency: String,

    /// Sessions unused for longer than this are dropped
    pub session_idle_timeout: Duration,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key → value source.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_path = match get("ECOTRACK_DB_PATH") {
            Some(path) => PathBuf::from(path),
            None => default_database_path()?,
        };

        let config = ServerConfig {
            bind_addr: get("ECOTRACK_BIND")
                .unwrap_or_else(|| "0.0.0.0:8080".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("ECOTRACK_BIND".to_string()))?,

            database_path,

            db_max_connections: get("ECOTRACK_DB_MAX_CONNECTIONS")
                .unwrap_or_else(|| "5".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("ECOTRACK_DB_MAX_CONNECTIONS".to_string()))?,

            stock_policy: match get("ECOTRACK_STOCK_POLICY") {
                Some(value) => value
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue("ECOTRACK_STOCK_POLICY".to_string()))?,
                None => StockPolicy::default(),
            },

            currency: get("ECOTRACK_CURRENCY").unwrap_or_else(|| "INR".to_string()),

            session_idle_timeout: get("ECOTRACK_SESSION_IDLE_MINUTES")
                .unwrap_or_else(|| "480".to_string())
                .parse::<u64>()
                .ok()
                .filter(|minutes| *minutes > 0)
                .map(|minutes| Duration::from_secs(minutes * 60))
                .ok_or_else(|| ConfigError::InvalidValue("ECOTRACK_SESSION_IDLE_MINUTES".to_string()))?,
        };

        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "ECOTRACK_DB_MAX_CONNECTIONS".to_string(),
            ));
        }

        Ok(config)
    }
}

/// Platform data directory, e.g. `~/.local/share/ecotrack/erp_data.db`.
///
/// The directory is created if missing.
fn default_database_path() -> Result<PathBuf, ConfigError> {
    let dirs = ProjectDirs::from("com", "ecotrack", "ecotrack").ok_or(ConfigError::NoDataDir)?;
    let data_dir = dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {}", data_dir.display(), e)))?;
    Ok(data_dir.join(DATABASE_FILE_NAME))
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Could not determine a data directory; set ECOTRACK_DB_PATH")]
    NoDataDir,

    #[error("Could not create data directory {0}")]
    DataDir(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("ECOTRACK_DB_PATH", "/tmp/x.db")]).unwrap();
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.database_path, PathBuf::from("/tmp/x.db"));
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(config.stock_policy, StockPolicy::Reject);
        assert_eq!(config.currency, "INR");
        assert_eq!(config.session_idle_timeout, Duration::from_secs(8 * 60 * 60));
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("ECOTRACK_DB_PATH", "/tmp/x.db"),
            ("ECOTRACK_BIND", "127.0.0.1:9000"),
            ("ECOTRACK_STOCK_POLICY", "allow_oversell"),
            ("ECOTRACK_CURRENCY", "EUR"),
            ("ECOTRACK_DB_MAX_CONNECTIONS", "8"),
            ("ECOTRACK_SESSION_IDLE_MINUTES", "15"),
        ])
        .unwrap();
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:9000");
        assert_eq!(config.stock_policy, StockPolicy::AllowOversell);
        assert_eq!(config.currency, "EUR");
        assert_eq!(config.db_max_connections, 8);
        assert_eq!(config.session_idle_timeout, Duration::from_secs(15 * 60));
    }

    #[test]
    fn test_invalid_values() {
        let base = ("ECOTRACK_DB_PATH", "/tmp/x.db");
        assert!(load(&[base, ("ECOTRACK_BIND", "not-an-addr")]).is_err());
        assert!(load(&[base, ("ECOTRACK_STOCK_POLICY", "maybe")]).is_err());
        assert!(load(&[base, ("ECOTRACK_DB_MAX_CONNECTIONS", "0")]).is_err());
        assert!(load(&[base, ("ECOTRACK_SESSION_IDLE_MINUTES", "0")]).is_err());
        assert!(load(&[base, ("ECOTRACK_SESSION_IDLE_MINUTES", "soon")]).is_err());
    }
}
