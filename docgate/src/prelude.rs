//! Convenient re-exports of commonly used types from docgate.
//!
//! ```ignore
//! use docgate::prelude::*;
//! ```

pub use docgate_core::{
    backend::{StoreBackend, DynStoreBackend, StoreBackendBuilder},
    gateway::{CollectionGateway, CollectionGatewayBuilder},
    uid::{UidAllocator, InMemoryUidAllocator},
    namespace::ReservedNamespaces,
    query::{Query, QueryVisitor, Expr, QueryBuilder, Filter},
    error::{DocumentStoreError, DocumentStoreResult},
};
