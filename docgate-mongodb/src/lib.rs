//! MongoDB backend implementation for docgate.
//!
//! This crate provides a MongoDB-based implementation of the `StoreBackend` trait.
//! MongoDB's own `_id` serves as the opaque storage identity, and its reserved
//! `system.*` collections are what the gateway's default reserved-namespace marker
//! protects.
//!
//! To use this backend, include the `mongodb` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! docgate = { version = "x.y.z", features = ["mongodb"] }
//! ```
//!
//! # Connection
//!
//! The client is configured from a connection string and a database name via the
//! builder. Connections are established lazily, so an unreachable server surfaces on
//! the first operation (for the gateway, the startup reset).
//!
//! # Example
//!
//! ```ignore
//! use docgate::{backend::StoreBackendBuilder, mongodb::MongoDbStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = MongoDbStore::builder("mongodb://localhost:27017", "docgate")
//!         .build()
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

pub mod store;
pub mod query;
pub mod sanitizer;

pub use store::{MongoDbStore, MongoDbStoreBuilder};
