//! In-memory storage implementation for the gateway.
//!
//! Collections are insertion-ordered lists of values guarded by an async-aware
//! read-write lock.

use std::{collections::HashMap, sync::Arc};
use async_trait::async_trait;
use mea::rwlock::RwLock;
use bson::{Bson, oid::ObjectId};

use docgate_core::{
    document::STORAGE_ID_FIELD,
    query::Query,
    error::DocumentStoreResult,
    backend::{StoreBackend, StoreBackendBuilder},
};

use crate::evaluator::DocumentEvaluator;

/// A stored value and the identity the store gave it.
#[derive(Debug, Clone)]
struct StoredValue {
    id: ObjectId,
    value: Bson,
}

type CollectionList = Vec<StoredValue>;
type StoreMap = HashMap<String, CollectionList>;


/// Thread-safe in-memory document storage backend.
///
/// Every inserted value is assigned a fresh `ObjectId`. Document values carry it under
/// `_id`, replacing anything the caller put there; other values (arrays, scalars) are
/// stored untouched with the identity kept alongside. Queries scan the collection in
/// insertion order.
///
/// # Thread Safety
///
/// `InMemoryStore` is cloneable and uses an `Arc`-wrapped internal state, allowing
/// it to be safely shared across async tasks. Multiple clones of the same instance
/// share the same underlying data.
///
/// # Example
///
/// ```ignore
/// use docgate_memory::InMemoryStore;
/// use docgate::backend::StoreBackend;
/// use bson::{Bson, doc};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = InMemoryStore::new();
///
///     store.insert_documents(vec![Bson::Document(doc! { "name": "Alice" })], "users").await?;
///     assert_eq!(store.list_collections().await?, vec!["users".to_string()]);
///
///     Ok(())
/// }
/// ```
#[derive(Default, Clone, Debug)]
pub struct InMemoryStore {
    /// collection_name -> values in insertion order
    store: Arc<RwLock<StoreMap>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory document store.
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(StoreMap::new())),
        }
    }

    /// Creates a builder for constructing an `InMemoryStore`.
    ///
    /// ```ignore
    /// let store = InMemoryStore::builder().build().await.unwrap();
    /// ```
    pub fn builder() -> InMemoryStoreBuilder {
        InMemoryStoreBuilder::default()
    }

    /// Number of values stored in `collection`.
    pub async fn len(&self, collection: &str) -> usize {
        self.store
            .read()
            .await
            .get(collection)
            .map_or(0, Vec::len)
    }

    /// The storage identities of `collection`, in insertion order.
    pub async fn identities(&self, collection: &str) -> Vec<ObjectId> {
        self.store
            .read()
            .await
            .get(collection)
            .map(|values| values.iter().map(|stored| stored.id).collect())
            .unwrap_or_default()
    }
}


#[async_trait]
impl StoreBackend for InMemoryStore {
    async fn insert_documents(&self, documents: Vec<Bson>, collection: &str) -> DocumentStoreResult<()> {
        let mut store = self.store.write().await;
        let collection_list = store
            .entry(collection.to_string())
            .or_default();

        for mut value in documents {
            let id = ObjectId::new();

            if let Some(doc) = value.as_document_mut() {
                doc.insert(STORAGE_ID_FIELD, id);
            }

            collection_list.push(StoredValue { id, value });
        }

        Ok(())
    }

    async fn query_documents(&self, query: Query, collection: &str) -> DocumentStoreResult<Vec<Bson>> {
        let store = self.store.read().await;
        let collection_list = match store.get(collection) {
            Some(col) => col,
            None => return Ok(vec![]),
        };

        let limit = query.limit.unwrap_or(usize::MAX);
        let mut documents = Vec::new();

        for stored in collection_list {
            if documents.len() >= limit {
                break;
            }

            let matched = match &query.filter {
                Some(filter) => DocumentEvaluator::new(&stored.value).evaluate(filter)?,
                None => true,
            };

            if matched {
                documents.push(stored.value.clone());
            }
        }

        Ok(documents)
    }

    async fn drop_collection(&self, name: &str) -> DocumentStoreResult<()> {
        self.store.write().await.remove(name);

        Ok(())
    }

    async fn list_collections(&self) -> DocumentStoreResult<Vec<String>> {
        Ok(
            self.store
                .read()
                .await
                .keys()
                .cloned()
                .collect()
        )
    }
}


/// Builder for constructing [`InMemoryStore`] instances.
///
/// ```ignore
/// use docgate_memory::InMemoryStore;
/// use docgate::backend::StoreBackendBuilder;
///
/// let store = InMemoryStore::builder().build().await.unwrap();
/// ```
#[derive(Default)]
pub struct InMemoryStoreBuilder;

#[async_trait]
impl StoreBackendBuilder for InMemoryStoreBuilder {
    type Backend = InMemoryStore;

    /// Builds and returns a new [`InMemoryStore`] instance.
    ///
    /// This always succeeds and returns a freshly initialized store.
    async fn build(self) -> DocumentStoreResult<Self::Backend> {
        Ok(InMemoryStore::new())
    }
}
