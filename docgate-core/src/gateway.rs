//! The collection gateway: schema-less create, list and lookup over a [`StoreBackend`].
//!
//! A [`CollectionGateway`] owns a backend, a [`UidAllocator`] and a [`ReservedNamespaces`]
//! policy. Collections are never declared; inserting into an unknown name creates it.
//!
//! # Example
//!
//! ```ignore
//! use docgate::{gateway::CollectionGateway, memory::InMemoryStore};
//!
//! let gateway = CollectionGateway::builder(InMemoryStore::new()).open().await?;
//!
//! let uid = gateway.create("widgets", r#"{"name":"a"}"#).await?;
//! assert_eq!(uid, Some(1));
//!
//! let widget = gateway.get_by_uid("widgets", 1).await?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use bson::Bson;
use serde_json::Value;
use std::collections::BTreeSet;

use crate::{
    backend::StoreBackend,
    document::{UID_FIELD, into_client_json, json_to_bson},
    error::{DocumentStoreError, DocumentStoreResult},
    namespace::ReservedNamespaces,
    query::{Filter, Query},
    uid::{InMemoryUidAllocator, UidAllocator},
};

/// Orchestrates uid allocation and the store backend for every gateway operation.
///
/// # Type Parameters
///
/// * `B` - The backend implementation type
/// * `A` - The uid allocator, [`InMemoryUidAllocator`] unless injected
#[derive(Debug)]
pub struct CollectionGateway<B: StoreBackend, A: UidAllocator = InMemoryUidAllocator> {
    backend: B,
    allocator: A,
    namespaces: ReservedNamespaces,
}

impl<B: StoreBackend> CollectionGateway<B> {
    /// Starts building a gateway over `backend` with the default allocator and namespaces.
    pub fn builder(backend: B) -> CollectionGatewayBuilder<B> {
        CollectionGatewayBuilder::new(backend)
    }
}

impl<B: StoreBackend, A: UidAllocator> CollectionGateway<B, A> {
    /// Drops every client collection and forgets every uid counter.
    ///
    /// Reserved collections are left untouched. Run automatically by
    /// [`CollectionGatewayBuilder::open`].
    ///
    /// # Errors
    ///
    /// Fails on the first backend error; collections dropped before it stay dropped.
    pub async fn reset(&self) -> DocumentStoreResult<()> {
        for collection in self.backend.list_collections().await? {
            if self.namespaces.is_reserved(&collection) {
                tracing::debug!(collection = %collection, "keeping reserved collection");
                continue;
            }

            self.backend.drop_collection(&collection).await?;
            tracing::info!(collection = %collection, "dropped collection on reset");
        }

        self.allocator.reset();

        Ok(())
    }

    /// Inserts a raw JSON payload into `collection`.
    ///
    /// Objects receive the next uid for the collection under `"uid"`, replacing any value
    /// the client sent. Every other JSON value is stored exactly as submitted and gets no
    /// uid.
    ///
    /// # Returns
    ///
    /// The uid assigned to the document, or `None` for non-object payloads.
    ///
    /// # Errors
    ///
    /// [`DocumentStoreError::MalformedPayload`] when the payload is not JSON,
    /// [`DocumentStoreError::InvalidDocument`] when it is JSON that BSON cannot represent
    /// (such as an integer above `i64::MAX`), otherwise any backend error. Both payload
    /// faults are raised before a uid is allocated. A uid allocated before a failed insert
    /// is not reused.
    pub async fn create(&self, collection: &str, payload: &str) -> DocumentStoreResult<Option<i64>> {
        let value: Value = serde_json::from_str(payload).map_err(DocumentStoreError::malformed)?;
        let mut stored = json_to_bson(&value).map_err(|e| DocumentStoreError::InvalidDocument(e.to_string()))?;

        let uid = match stored.as_document_mut() {
            Some(document) => {
                let uid = self.allocator.allocate(collection);
                document.insert(UID_FIELD, Bson::Int64(uid));
                Some(uid)
            }
            None => None,
        };

        self.backend
            .insert_documents(vec![stored], collection)
            .await?;

        tracing::debug!(collection = %collection, uid = ?uid, "inserted document");

        Ok(uid)
    }

    /// Names of all client collections, deduplicated and sorted.
    pub async fn list_collections(&self) -> DocumentStoreResult<Vec<String>> {
        Ok(
            self.backend
                .list_collections()
                .await?
                .into_iter()
                .filter(|name| !self.namespaces.is_reserved(name))
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect()
        )
    }

    /// Every document in `collection`, in store order, with internal fields removed.
    ///
    /// An unknown collection yields an empty vector rather than an error.
    pub async fn list_documents(&self, collection: &str) -> DocumentStoreResult<Vec<Value>> {
        self.backend
            .query_documents(Query::new(), collection)
            .await?
            .into_iter()
            .map(into_client_json)
            .collect()
    }

    /// The document in `collection` whose `"uid"` equals `uid`, with internal fields
    /// removed.
    ///
    /// Returns `Ok(None)` when nothing matches, whether or not the collection exists. If
    /// several documents match, the first in store order wins.
    pub async fn get_by_uid(&self, collection: &str, uid: i64) -> DocumentStoreResult<Option<Value>> {
        let query = Query::builder()
            .filter(Filter::eq(UID_FIELD, Bson::Int64(uid)))
            .limit(1)
            .build();

        self.backend
            .query_documents(query, collection)
            .await?
            .into_iter()
            .next()
            .map(into_client_json)
            .transpose()
    }

    /// The reserved-namespace policy in effect.
    pub fn namespaces(&self) -> &ReservedNamespaces {
        &self.namespaces
    }

    /// The allocator handing out uids.
    pub fn allocator(&self) -> &A {
        &self.allocator
    }

    /// Returns a reference to the underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Shuts down the gateway and releases backend resources.
    pub async fn shutdown(self) -> DocumentStoreResult<()> {
        self.backend.shutdown().await
    }
}

/// Builder for [`CollectionGateway`].
///
/// Opening the gateway performs the startup reset, so a built gateway always starts
/// from an empty set of client collections.
#[derive(Debug)]
pub struct CollectionGatewayBuilder<B: StoreBackend, A: UidAllocator = InMemoryUidAllocator> {
    backend: B,
    allocator: A,
    namespaces: ReservedNamespaces,
}

impl<B: StoreBackend> CollectionGatewayBuilder<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            allocator: InMemoryUidAllocator::new(),
            namespaces: ReservedNamespaces::default(),
        }
    }
}

impl<B: StoreBackend, A: UidAllocator> CollectionGatewayBuilder<B, A> {
    /// Replaces the uid allocator.
    pub fn allocator<N: UidAllocator>(self, allocator: N) -> CollectionGatewayBuilder<B, N> {
        CollectionGatewayBuilder {
            backend: self.backend,
            allocator,
            namespaces: self.namespaces,
        }
    }

    /// Replaces the reserved-namespace policy.
    pub fn namespaces(mut self, namespaces: ReservedNamespaces) -> Self {
        self.namespaces = namespaces;
        self
    }

    /// Builds the gateway and runs the startup reset.
    ///
    /// # Errors
    ///
    /// Any backend error raised while listing or dropping collections.
    pub async fn open(self) -> DocumentStoreResult<CollectionGateway<B, A>> {
        let gateway = CollectionGateway {
            backend: self.backend,
            allocator: self.allocator,
            namespaces: self.namespaces,
        };

        gateway.reset().await?;

        Ok(gateway)
    }
}
