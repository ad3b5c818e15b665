//! Catalog Client Errors
//!
//! Connection loss and query failure are the two transient shapes; the
//! runtime handles them by re-entering its connection check on the next
//! loop iteration rather than retrying in place.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("not connected to database")]
    NotConnected,

    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    #[error("query failed: {0}")]
    QueryFailed(String),

    #[error("unexpected result shape: {0}")]
    UnexpectedShape(String),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
