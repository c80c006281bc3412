//! In-memory document storage backend for docgate.
//!
//! This crate provides a thread-safe, in-memory implementation of the `StoreBackend` trait.
//! It uses async-aware read-write locks for concurrent access and is the default backend
//! of the gateway server as well as the one its tests run against.
//!
//! # Features
//!
//! - **Thread-safe access** - Concurrent reads and writes using async-aware RwLock
//! - **Opaque identities** - Every inserted value receives an `ObjectId`
//! - **Store-native order** - Collections iterate in insertion order
//! - **Equality queries** - Field equality and conjunction, with an optional limit
//!
//! # Quick Start
//!
//! ```ignore
//! use docgate::{gateway::CollectionGateway, memory::InMemoryStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let backend = InMemoryStore::builder().build().await?;
//!     let gateway = CollectionGateway::builder(backend).open().await?;
//!
//!     gateway.create("users", r#"{"name":"Alice"}"#).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod store;
pub mod evaluator;

pub use store::{InMemoryStore, InMemoryStoreBuilder};
