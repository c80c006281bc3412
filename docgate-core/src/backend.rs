//! Storage backend abstraction for the gateway.
//!
//! The [`StoreBackend`] trait is the contract the gateway consumes from a document store:
//! insert, find (all or by field equality), drop a collection, and list collection names.
//! Query execution, persistence and indexing are entirely the backend's business.
//!
//! # Identity
//!
//! Backends assign their own opaque identity to every inserted value and store it under
//! [`STORAGE_ID_FIELD`](crate::document::STORAGE_ID_FIELD) for document values. Callers
//! never supply it and the gateway strips it before anything leaves the process.
//!
//! # Traits
//!
//! - [`StoreBackend`]: The core trait for storage backends
//! - [`DynStoreBackend`]: A trait for dynamic dispatch over backend implementations
//! - [`StoreBackendBuilder`]: Factory trait for creating backend instances
//!
//! # Examples
//!
//! ```ignore
//! use docgate::backend::StoreBackend;
//! use docgate::query::{Filter, Query};
//! use bson::{Bson, doc};
//!
//! let backend = MyBackendImpl::new();
//!
//! backend.insert_documents(vec![Bson::Document(doc! { "name": "Alice", "uid": 1_i64 })], "users").await?;
//! let found = backend
//!     .query_documents(Query::builder().filter(Filter::eq("uid", 1_i64)).build(), "users")
//!     .await?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use async_trait::async_trait;
use bson::Bson;
use std::fmt::Debug;

use crate::{error::DocumentStoreResult, query::Query};

/// Abstract interface for document storage backends.
///
/// # Thread Safety
///
/// All implementations must be thread-safe and support concurrent access from multiple
/// async tasks. The gateway performs no locking of its own around backend calls, so any
/// consistency between concurrent writers to one collection is the backend's guarantee.
#[async_trait]
pub trait StoreBackend: Send + Sync + Debug {
    /// Inserts values into a collection, assigning each its storage identity.
    ///
    /// The collection is created implicitly if it does not exist yet. Values are stored
    /// as given; backends that cannot hold a particular shape (for example a bare
    /// scalar) return [`DocumentStoreError::InvalidDocument`](crate::error::DocumentStoreError::InvalidDocument).
    async fn insert_documents(&self, documents: Vec<Bson>, collection: &str) -> DocumentStoreResult<()>;

    /// Queries documents in a collection.
    ///
    /// Without a filter every document matches. Results are returned in the backend's
    /// native iteration order, with the storage identity still attached. An unknown
    /// collection yields an empty vector.
    async fn query_documents(&self, query: Query, collection: &str) -> DocumentStoreResult<Vec<Bson>>;

    /// Drops a collection and all its documents.
    ///
    /// Dropping a collection that does not exist is not an error.
    async fn drop_collection(&self, name: &str) -> DocumentStoreResult<()>;

    /// Lists the names of all collections in the store, including any the engine reserves
    /// for itself.
    async fn list_collections(&self) -> DocumentStoreResult<Vec<String>>;

    /// Cleanly shuts down the backend, releasing all resources.
    ///
    /// The default implementation is a no-op, but backends with external connections
    /// should override this.
    async fn shutdown(self) -> DocumentStoreResult<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

#[async_trait]
pub trait DynStoreBackend: Send + Sync + Debug {
    async fn insert_documents(&self, documents: Vec<Bson>, collection: &str) -> DocumentStoreResult<()>;
    async fn query_documents(&self, query: Query, collection: &str) -> DocumentStoreResult<Vec<Bson>>;
    async fn drop_collection(&self, name: &str) -> DocumentStoreResult<()>;
    async fn list_collections(&self) -> DocumentStoreResult<Vec<String>>;
    async fn shutdown_boxed(self: Box<Self>) -> DocumentStoreResult<()>;
}

#[async_trait]
impl<B: StoreBackend + Send + Sync + 'static> DynStoreBackend for B {
    async fn insert_documents(&self, documents: Vec<Bson>, collection: &str) -> DocumentStoreResult<()> {
        StoreBackend::insert_documents(self, documents, collection).await
    }

    async fn query_documents(&self, query: Query, collection: &str) -> DocumentStoreResult<Vec<Bson>> {
        StoreBackend::query_documents(self, query, collection).await
    }

    async fn drop_collection(&self, name: &str) -> DocumentStoreResult<()> {
        StoreBackend::drop_collection(self, name).await
    }

    async fn list_collections(&self) -> DocumentStoreResult<Vec<String>> {
        StoreBackend::list_collections(self).await
    }

    async fn shutdown_boxed(self: Box<Self>) -> DocumentStoreResult<()> {
        StoreBackend::shutdown(*self).await
    }
}

/// A boxed backend chosen at runtime is usable anywhere a static backend is.
#[async_trait]
impl StoreBackend for Box<dyn DynStoreBackend> {
    async fn insert_documents(&self, documents: Vec<Bson>, collection: &str) -> DocumentStoreResult<()> {
        (**self).insert_documents(documents, collection).await
    }

    async fn query_documents(&self, query: Query, collection: &str) -> DocumentStoreResult<Vec<Bson>> {
        (**self).query_documents(query, collection).await
    }

    async fn drop_collection(&self, name: &str) -> DocumentStoreResult<()> {
        (**self).drop_collection(name).await
    }

    async fn list_collections(&self) -> DocumentStoreResult<Vec<String>> {
        (**self).list_collections().await
    }

    async fn shutdown(self) -> DocumentStoreResult<()> {
        self.shutdown_boxed().await
    }
}

#[async_trait]
pub trait StoreBackendBuilder {
    type Backend: StoreBackend;

    async fn build(self) -> DocumentStoreResult<Self::Backend>;
}
