//! Server configuration loaded via OrthoConfig.
//!
//! Values come from CLI flags, `BLOG_*` environment variables and config
//! files. Unset values fall back to the defaults applied by the accessors;
//! seeding and migrations stay on unless a `skip_*` switch is set.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// Errors raised while interpreting loaded settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// The bind address is not `host:port`.
    #[error("invalid bind address {value:?}: {message}")]
    InvalidBindAddr { value: String, message: String },
    /// A zero timeout would fail every request.
    #[error("request timeout must be at least one second")]
    ZeroTimeout,
}

/// Configuration for the HTTP server and its storage backend.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "BLOG")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; the in-memory store is used when absent.
    pub database_url: Option<String>,
    /// Upper bound on handling time per request, in seconds.
    pub request_timeout_secs: Option<u64>,
    /// Maximum pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Leave an empty store unseeded instead of adding the example posts.
    #[ortho_config(default = false)]
    pub skip_example_posts: bool,
    /// Serve without applying the embedded migrations first.
    #[ortho_config(default = false)]
    pub skip_migrations: bool,
}

impl ServerSettings {
    /// Return the parsed bind address, falling back to `0.0.0.0:8080`.
    ///
    /// # Examples
    /// ```
    /// use blog_backend::settings::ServerSettings;
    ///
    /// let settings = ServerSettings::default();
    /// assert_eq!(settings.bind_addr().map(|a| a.port()), Ok(8080));
    /// ```
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err: std::net::AddrParseError| {
            SettingsError::InvalidBindAddr {
                value: raw.to_owned(),
                message: err.to_string(),
            }
        })
    }

    /// Return the database URL when one is configured and non-blank.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Return the per-request timeout, falling back to 30 seconds.
    pub fn request_timeout(&self) -> Result<Duration, SettingsError> {
        match self.request_timeout_secs.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS) {
            0 => Err(SettingsError::ZeroTimeout),
            secs => Ok(Duration::from_secs(secs)),
        }
    }

    /// Return the pool size, falling back to 10 connections.
    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
            .filter(|size| *size > 0)
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }

    /// Whether example posts are seeded; enabled unless skipped.
    pub fn seed_example_posts(&self) -> bool {
        !self.skip_example_posts
    }

    /// Whether migrations run at startup; enabled unless skipped.
    pub fn run_migrations(&self) -> bool {
        !self.skip_migrations
    }
}
