//! Core of the docgate project: a schema-less gateway over named JSON document
//! collections.
//!
//! This crate provides:
//!
//! - **Store backend abstraction** ([`backend`]) - The contract a document store adapter fulfils
//! - **Equality queries** ([`query`]) - The lookups the gateway needs, and a visitor for backends
//! - **Document boundary** ([`document`]) - JSON/BSON conversion and removal of storage-internal fields
//! - **Uid allocation** ([`uid`]) - Per-collection, process-lifetime sequence numbers
//! - **Reserved namespaces** ([`namespace`]) - Which collection names belong to the storage engine
//! - **Collection gateway** ([`gateway`]) - Create, list and lookup operations plus the startup reset
//! - **Error handling** ([`error`]) - Error types and result types
//!
//! # Example
//!
//! ```ignore
//! use docgate::{gateway::CollectionGateway, memory::InMemoryStore};
//!
//! let gateway = CollectionGateway::builder(InMemoryStore::new()).open().await?;
//!
//! gateway.create("things", r#"{"x":1}"#).await?;
//! assert_eq!(gateway.list_documents("things").await?, vec![serde_json::json!({"x":1,"uid":1})]);
//! ```

pub mod backend;
pub mod document;
pub mod error;
pub mod gateway;
pub mod namespace;
pub mod query;
pub mod uid;
