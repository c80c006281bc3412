//! Main docgate crate: a schema-less gateway over named JSON document collections.
//!
//! This crate is the primary entry point for users of docgate. It re-exports the core
//! types from `docgate-core` and gives access to the available storage backends.
//!
//! # Features
//!
//! - **Implicit collections** - Insert into any name; the collection exists from then on
//! - **Server-assigned uids** - Every JSON object gets a per-collection sequence number
//! - **Multiple backends** - In-memory and MongoDB storage behind one trait
//! - **Clean responses** - Storage identities never leave the gateway
//!
//! # Quick Start
//!
//! ```ignore
//! use docgate::{prelude::*, memory::InMemoryStore};
//!
//! #[tokio::main]
//! async fn main() {
//!     let backend = InMemoryStore::builder().build().await.unwrap();
//!
//!     // Opening runs the startup reset: every non-reserved collection is dropped.
//!     let gateway = CollectionGateway::builder(backend).open().await.unwrap();
//!
//!     let uid = gateway.create("widgets", r#"{"name":"a"}"#).await.unwrap();
//!     assert_eq!(uid, Some(1));
//!
//!     let widget = gateway.get_by_uid("widgets", 1).await.unwrap();
//!     println!("{widget:?}");
//!
//!     gateway.shutdown().await.unwrap();
//! }
//! ```
//!
//! # Dynamic Dispatch
//!
//! When the backend is chosen at runtime (for example from configuration), box it as a
//! [`DynStoreBackend`](backend::DynStoreBackend). The box is itself a
//! [`StoreBackend`](backend::StoreBackend), so the gateway is used the same way.
//!
//! ```ignore
//! use docgate::{prelude::*, memory::InMemoryStore};
//!
//! let backend: Box<dyn DynStoreBackend> = Box::new(InMemoryStore::new());
//! let gateway = CollectionGateway::builder(backend).open().await?;
//! ```
//!
//! # Backends
//!
//! - [`memory`] - In-memory storage for development and testing
//! - `mongodb` - MongoDB backend (requires the `mongodb` feature)

pub mod prelude;

pub use docgate_core::{backend, document, error, gateway, namespace, query, uid};

// Re-export BSON types for convenience
pub use bson;
pub use serde_json;

/// In-memory storage backend implementations.
pub mod memory {
    pub use docgate_memory::{InMemoryStore, InMemoryStoreBuilder};
}

/// MongoDB storage backend implementations.
///
/// This module is only available when the `mongodb` feature is enabled.
#[cfg(feature = "mongodb")]
pub mod mongodb {
    pub use docgate_mongodb::{MongoDbStore, MongoDbStoreBuilder};
}
