//! API route handlers
//!
//! - `collections`: collection listing, document create, list and lookup
//! - `env`: plain-text dump of process properties and environment

pub mod collections;
pub mod env;

use crate::error::ServerError;

/// 404 Not Found handler
///
/// Returns a standardized error response for undefined routes.
pub async fn not_found() -> ServerError {
    ServerError::NotFound
}
