//! docgate server - HTTP API over schema-less JSON document collections
//!
//! Collections are created by posting into them. Every posted JSON object gets
//! a per-collection `uid`, and documents are read back without the store's own
//! identity fields. Collections the storage engine owns (by default any name
//! containing `system`) are never listed and survive the startup reset, which
//! drops everything else.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use server::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::load()?;
//!     server::start_server(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! # API Endpoints
//!
//! - `GET /` - Collection names
//! - `GET /{collection}` - All documents of a collection
//! - `POST /{collection}` - Insert a JSON value, `201` with `Location` for objects
//! - `GET /{collection}/{uid}` - One document by uid, `404` when absent
//! - `ANY /env` - Process properties and environment as plain text

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use config::{ServerConfig, StoreConfig, StoreKind};
pub use error::{ServerError, ServerResult};
pub use server::{build_router, start_server};
pub use state::ServerState;
