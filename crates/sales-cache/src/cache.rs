//! # Sales Cache
//!
//! Construction of the shared cache and repository access.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          SalesCache                                     │
//! │                                                                         │
//! │  App Startup                                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CacheConfig::default().latency(..) ← Configure mock services          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SalesCache::new(config)                                               │
//! │       │                                                                 │
//! │       ├── sales()    → SaleRepository    ("ventas")                    │
//! │       ├── catalog()  → CatalogRepository ("usuarios", "productos-...") │
//! │       └── prefetch() → all three collections concurrently              │
//! │                                                                         │
//! │  Every clone shares one QueryCache, so a write made from one           │
//! │  command is visible to every other screen.                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::error::CacheResult;
use crate::repository::{CatalogRepository, SaleRepository};
use crate::services::{DataSource, MockDataSource, DEFAULT_LATENCY};
use crate::store::{QueryCache, DEFAULT_CHANNEL_CAPACITY};

// =============================================================================
// Configuration
// =============================================================================

/// Cache configuration.
///
/// ## Example
/// ```rust
/// use std::time::Duration;
/// use sales_cache::CacheConfig;
///
/// let config = CacheConfig::default().latency(Duration::from_millis(50));
/// assert_eq!(config.latency, Duration::from_millis(50));
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Artificial delay of every mock fetch.
    /// Default: 300 ms
    pub latency: Duration,

    /// Buffered change events per subscriber before it lags.
    /// Default: 64
    pub channel_capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            latency: DEFAULT_LATENCY,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl CacheConfig {
    /// Sets the mock service latency.
    pub fn latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Sets the change channel capacity.
    pub fn channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity;
        self
    }

    /// No latency (for testing).
    pub fn instant() -> Self {
        CacheConfig::default().latency(Duration::ZERO)
    }
}

// =============================================================================
// SalesCache
// =============================================================================

/// Main cache handle providing repository access.
#[derive(Debug)]
pub struct SalesCache<S = MockDataSource> {
    store: QueryCache,
    source: Arc<S>,
}

impl<S> Clone for SalesCache<S> {
    fn clone(&self) -> Self {
        SalesCache {
            store: self.store.clone(),
            source: Arc::clone(&self.source),
        }
    }
}

impl SalesCache<MockDataSource> {
    /// Creates a cache backed by the mock services.
    pub fn new(config: CacheConfig) -> Self {
        info!(
            latency_ms = config.latency.as_millis() as u64,
            "Sales cache created"
        );
        SalesCache::with_source(
            QueryCache::with_capacity(config.channel_capacity),
            MockDataSource::new(config.latency),
        )
    }
}

impl<S: DataSource> SalesCache<S> {
    /// Creates a cache over an arbitrary data source.
    pub fn with_source(store: QueryCache, source: S) -> Self {
        SalesCache {
            store,
            source: Arc::new(source),
        }
    }

    /// The underlying keyed store, for subscriptions and raw access.
    pub fn store(&self) -> &QueryCache {
        &self.store
    }

    /// Returns the sale repository.
    pub fn sales(&self) -> SaleRepository<S> {
        SaleRepository::new(self.store.clone(), Arc::clone(&self.source))
    }

    /// Returns the catalog repository.
    pub fn catalog(&self) -> CatalogRepository<S> {
        CatalogRepository::new(self.store.clone(), Arc::clone(&self.source))
    }

    /// Loads users, products and sales concurrently.
    pub async fn prefetch(&self) -> CacheResult<()> {
        let sales = self.sales();
        let catalog = self.catalog();
        let (users, products, sales) =
            tokio::join!(catalog.users(), catalog.products(), sales.list());
        let (users, products, sales) = (users?, products?, sales?);
        info!(
            users = users.len(),
            products = products.len(),
            sales = sales.len(),
            "Prefetch complete"
        );
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
