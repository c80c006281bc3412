use async_trait::async_trait;
use futures::TryStreamExt;
use bson::{Document, Bson, doc};
use mongodb::{
    Client, Collection as MongoCollection,
    options::{ClientOptions, FindOptions},
};
use docgate_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    error::{DocumentStoreError, DocumentStoreResult},
    query::{Query, QueryVisitor},
};

use crate::{sanitizer::KeySanitizer, query::MongoQueryTranslator};


/// MongoDB-backed [`StoreBackend`].
///
/// MongoDB assigns `_id` itself when a document has none, which makes it the opaque
/// storage identity. Only documents can be stored; any other top-level value is rejected
/// with [`DocumentStoreError::InvalidDocument`].
#[derive(Debug)]
pub struct MongoDbStore {
    client: Client,
    database: String,
}

impl MongoDbStore {
    pub fn new(client: Client, database: String) -> Self {
        Self { client, database }
    }

    pub fn builder(dsn: &str, database: &str) -> MongoDbStoreBuilder {
        MongoDbStoreBuilder::new(dsn, database)
    }

    fn get_collection(&self, collection_name: &str) -> MongoCollection<Document> {
        self.client
            .database(&self.database)
            .collection(&KeySanitizer::sanitize_string(collection_name))
    }

    fn prepare_document(&self, document: &Bson) -> DocumentStoreResult<Document> {
        match document {
            Bson::Document(doc) => Ok(KeySanitizer::sanitize_document(doc)),
            other => Err(DocumentStoreError::InvalidDocument(format!(
                "MongoDB can only store documents, got {:?}",
                other.element_type()
            ))),
        }
    }

    fn restore_document(&self, document: &Document) -> Bson {
        Bson::Document(KeySanitizer::restore_document(document))
    }

    async fn shutdown(self) -> DocumentStoreResult<()> {
        self.client.shutdown().await;

        Ok(())
    }
}

#[async_trait]
impl StoreBackend for MongoDbStore {
    async fn insert_documents(&self, documents: Vec<Bson>, collection: &str) -> DocumentStoreResult<()> {
        if documents.is_empty() {
            return Ok(());
        }

        let result = self.get_collection(collection)
            .insert_many(
                documents
                    .iter()
                    .map(|doc| self.prepare_document(doc))
                    .collect::<DocumentStoreResult<Vec<Document>>>()?,
            )
            .await
            .map_err(|e| DocumentStoreError::Backend(e.to_string()))?;

        tracing::trace!(collection = %collection, inserted = result.inserted_ids.len(), "mongodb insert");

        Ok(())
    }

    async fn query_documents(&self, query: Query, collection: &str) -> DocumentStoreResult<Vec<Bson>> {
        let mut options = FindOptions::default();

        if let Some(limit) = query.limit {
            options.limit = Some(i64::try_from(limit).unwrap_or(i64::MAX));
        }

        Ok(
            self.get_collection(collection)
                .find(
                    if let Some(expr) = &query.filter {
                        MongoQueryTranslator.visit_expr(expr)?
                    } else {
                        doc! {}
                    },
                )
                .with_options(options)
                .await
                .map_err(|e| DocumentStoreError::Backend(e.to_string()))?
                .try_collect::<Vec<Document>>()
                .await
                .map_err(|e| DocumentStoreError::Backend(e.to_string()))?
                .iter()
                .map(|doc| self.restore_document(doc))
                .collect()
        )
    }

    async fn drop_collection(&self, name: &str) -> DocumentStoreResult<()> {
        self.get_collection(name)
            .drop()
            .await
            .map_err(|e| DocumentStoreError::Backend(e.to_string()))?;

        Ok(())
    }

    async fn list_collections(&self) -> DocumentStoreResult<Vec<String>> {
        Ok(
            self.client
                .database(&self.database)
                .list_collection_names()
                .await
                .map_err(|e| DocumentStoreError::Backend(e.to_string()))?
                .iter()
                .map(|name| KeySanitizer::restore_string(name))
                .collect()
        )
    }

    async fn shutdown(self) -> DocumentStoreResult<()> {
        self.shutdown().await
    }
}

pub struct MongoDbStoreBuilder {
    dsn: String,
    database: String,
}

impl MongoDbStoreBuilder {
    pub fn new(dsn: &str, database: &str) -> Self {
        Self {
            dsn: dsn.to_string(),
            database: database.to_string(),
        }
    }
}

#[async_trait]
impl StoreBackendBuilder for MongoDbStoreBuilder {
    type Backend = MongoDbStore;

    async fn build(self) -> DocumentStoreResult<Self::Backend> {
        let client = Client::with_options(
            ClientOptions::parse(&self.dsn)
                .await
                .map_err(|e| DocumentStoreError::Initialization(e.to_string()))?,
        )
        .map_err(|e| DocumentStoreError::Initialization(e.to_string()))?;

        tracing::info!(database = %self.database, "configured mongodb client");

        Ok(MongoDbStore::new(client, self.database))
    }
}
