//! Process settings loaded via OrthoConfig.
//!
//! Values come from `BLOG_*` environment variables, an optional config file
//! and command-line flags, in increasing order of precedence.

use std::net::{AddrParseError, SocketAddr};
use std::time::Duration;

use backend::outbound::persistence::PoolConfig;
use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_POOL_MAX_SIZE: u32 = 10;

/// Server settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "BLOG")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. Without one the server keeps data in memory.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub pool_max_size: Option<u32>,
    /// Idle connections the pool keeps open.
    pub pool_min_idle: Option<u32>,
    /// Seconds a request may wait for a pooled connection.
    pub pool_connection_timeout_secs: Option<u64>,
    /// Apply embedded migrations before serving.
    #[ortho_config(default = true)]
    pub run_migrations: bool,
}

impl ServerSettings {
    /// Parsed bind address, defaulting to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, AddrParseError> {
        self.bind_addr
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDR)
            .parse()
    }

    /// Pool size, defaulting to ten connections.
    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE)
    }

    /// Pool settings for `database_url`. Unset knobs keep the pool defaults.
    pub fn pool_config(&self, database_url: &str) -> PoolConfig {
        let mut config = PoolConfig::new(database_url).with_max_size(self.pool_max_size());
        if let Some(min_idle) = self.pool_min_idle {
            config = config.with_min_idle(Some(min_idle));
        }
        if let Some(secs) = self.pool_connection_timeout_secs {
            config = config.with_connection_timeout(Duration::from_secs(secs));
        }
        config
    }

    /// The database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}
