//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use blog_backend::outbound::memory::InMemoryStore;
use blog_backend::outbound::persistence::DbPool;
use mockable::Clock;

/// Backing store the repositories run against.
#[derive(Clone)]
pub enum Storage {
    /// Process-wide in-memory collections.
    Memory(Arc<InMemoryStore>),
    /// PostgreSQL through the Diesel adapters.
    Postgres(DbPool),
}

impl Storage {
    /// Short label for startup logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::Postgres(_) => "postgres",
        }
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) request_timeout: Duration,
    pub(crate) storage: Storage,
    pub(crate) clock: Arc<dyn Clock>,
}

impl ServerConfig {
    /// Construct a configuration serving from a fresh in-memory store.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, request_timeout: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            bind_addr,
            request_timeout,
            storage: Storage::Memory(Arc::new(InMemoryStore::new(clock.clone()))),
            clock,
        }
    }

    /// Attach a database connection pool; repositories then use PostgreSQL.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.storage = Storage::Postgres(pool);
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    /// Return the configured storage backend.
    #[must_use]
    pub fn storage(&self) -> &Storage {
        &self.storage
    }
}
