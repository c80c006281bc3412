use crate::config::{ServerConfig, StoreKind};
use crate::error::ServerResult;
use docgate::prelude::*;
use docgate::memory::InMemoryStore;
use std::sync::Arc;

/// The gateway as the server runs it: backend chosen from configuration at startup.
pub type SharedGateway = CollectionGateway<Box<dyn DynStoreBackend>>;

/// Shared application state
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Gateway instance (shared across requests)
    pub gateway: Arc<SharedGateway>,
}

impl ServerState {
    /// Connect the configured store and open the gateway over it.
    ///
    /// Opening runs the startup reset, so every non-reserved collection is gone
    /// once this returns.
    pub async fn open(config: ServerConfig) -> ServerResult<Self> {
        let backend = build_backend(&config).await?;
        Self::with_backend(config, backend).await
    }

    /// Open the gateway over an already constructed backend.
    pub async fn with_backend(config: ServerConfig, backend: Box<dyn DynStoreBackend>) -> ServerResult<Self> {
        let gateway = CollectionGateway::builder(backend)
            .namespaces(ReservedNamespaces::new(config.reserved_marker.clone()))
            .open()
            .await?;

        Ok(Self {
            config: Arc::new(config),
            gateway: Arc::new(gateway),
        })
    }
}

async fn build_backend(config: &ServerConfig) -> ServerResult<Box<dyn DynStoreBackend>> {
    match config.store.backend {
        StoreKind::Memory => Ok(Box::new(InMemoryStore::builder().build().await?)),
        #[cfg(feature = "mongodb")]
        StoreKind::MongoDb => {
            use docgate::mongodb::MongoDbStore;

            let store = MongoDbStore::builder(&config.store.mongodb_uri, &config.store.mongodb_database)
                .build()
                .await?;

            Ok(Box::new(store))
        }
        #[cfg(not(feature = "mongodb"))]
        StoreKind::MongoDb => Err(crate::error::ServerError::Config(
            "store backend `mongodb` requires the `mongodb` feature".to_string(),
        )),
    }
}
