use docgate::namespace::DEFAULT_RESERVED_MARKER;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

/// Which document store the gateway runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    Memory,
    MongoDb,
}

impl StoreKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKind::Memory => "memory",
            StoreKind::MongoDb => "mongodb",
        }
    }
}

/// Document store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Backend to use
    #[serde(default = "default_store_kind")]
    pub backend: StoreKind,

    /// MongoDB connection string (mongodb backend only)
    #[serde(default = "default_mongodb_uri")]
    pub mongodb_uri: String,

    /// MongoDB database holding the collections (mongodb backend only)
    #[serde(default = "default_mongodb_database")]
    pub mongodb_database: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_store_kind(),
            mongodb_uri: default_mongodb_uri(),
            mongodb_database: default_mongodb_database(),
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server bind address
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum request body size in MB
    #[serde(default = "default_max_body_size_mb")]
    pub max_body_size_mb: usize,

    /// Log level / filter directive
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Collections whose name contains this are owned by the store and never touched
    #[serde(default = "default_reserved_marker")]
    pub reserved_marker: String,

    /// Document store
    #[serde(default)]
    pub store: StoreConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
            timeout_secs: default_timeout_secs(),
            max_body_size_mb: default_max_body_size_mb(),
            log_level: default_log_level(),
            reserved_marker: default_reserved_marker(),
            store: StoreConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from an optional `docgate` config file, overridden by
    /// `DOCGATE_*` environment variables (`__` separates nested keys, e.g.
    /// `DOCGATE_STORE__BACKEND=mongodb`).
    pub fn load() -> anyhow::Result<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("docgate").required(false))
            .add_source(
                config::Environment::with_prefix("DOCGATE")
                    .prefix_separator("_")
                    .separator("__"),
            );

        Ok(builder.build()?.try_deserialize()?)
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.bind_addr, self.port);
        Ok(addr_str.parse()?)
    }

    /// Get request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Get max body size in bytes
    pub fn max_body_size(&self) -> usize {
        self.max_body_size_mb * 1024 * 1024
    }

    /// Flattened `docgate.*` view of the effective configuration.
    pub fn properties(&self) -> Vec<(String, String)> {
        vec![
            ("docgate.bind_addr".to_string(), self.bind_addr.clone()),
            ("docgate.port".to_string(), self.port.to_string()),
            ("docgate.timeout_secs".to_string(), self.timeout_secs.to_string()),
            ("docgate.max_body_size_mb".to_string(), self.max_body_size_mb.to_string()),
            ("docgate.log_level".to_string(), self.log_level.clone()),
            ("docgate.reserved_marker".to_string(), self.reserved_marker.clone()),
            ("docgate.store.backend".to_string(), self.store.backend.as_str().to_string()),
            ("docgate.store.mongodb_uri".to_string(), self.store.mongodb_uri.clone()),
            ("docgate.store.mongodb_database".to_string(), self.store.mongodb_database.clone()),
        ]
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_body_size_mb() -> usize {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_reserved_marker() -> String {
    DEFAULT_RESERVED_MARKER.to_string()
}

fn default_store_kind() -> StoreKind {
    StoreKind::Memory
}

fn default_mongodb_uri() -> String {
    "mongodb://localhost:27017".to_string()
}

fn default_mongodb_database() -> String {
    "docgate".to_string()
}
