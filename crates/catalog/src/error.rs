//! Catalog error types.

use query::QueryError;
use thiserror::Error;

/// Errors that can occur when reading authors.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Sorting, paging or shaping failed.
    #[error("Query error: {0}")]
    Query(#[from] QueryError),
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
