//! # Cache Error Types
//!
//! Error types for cache and data source operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  serde_json::Error / poisoned lock / failed fetch                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CacheError (this module) ← Adds the query key as context              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (in dashboard) ← Serialized for the frontend                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Writes never validate shape, so a bad write only shows up as
//! `CacheError::Decode` on the next typed read of that key.

use sales_core::CoreError;
use thiserror::Error;

/// Cache operation errors.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The value under a key did not deserialize into the requested type.
    #[error("Cached value for '{key}' has an unexpected shape: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A value could not be turned into a JSON document.
    #[error("Value for '{key}' could not be serialized: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A writer panicked while holding the cache lock.
    #[error("Query cache lock poisoned")]
    Poisoned,

    /// A data source fetch failed.
    ///
    /// The mock services never fail; real sources and test doubles may.
    #[error("{service} unavailable: {message}")]
    ServiceUnavailable { service: String, message: String },

    /// Domain error raised while mutating a cached collection.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl CacheError {
    /// Creates a ServiceUnavailable error.
    pub fn service(service: impl Into<String>, message: impl Into<String>) -> Self {
        CacheError::ServiceUnavailable {
            service: service.into(),
            message: message.into(),
        }
    }

    /// The human-readable part of a fetch failure, if this is one.
    pub fn fetch_message(&self) -> Option<&str> {
        match self {
            CacheError::ServiceUnavailable { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;
