//! # Cache State
//!
//! Wraps the shared `SalesCache` for use in dashboard commands.
//!
//! ## Thread Safety
//! `SalesCache` is a handle over an `Arc`'d store guarded by an `RwLock`.
//! Commands can read and write concurrently without explicit locking; each
//! repository write is a single read-modify-write under the store's lock.
//!
//! ## Usage in Commands
//! ```rust,ignore
//! async fn list_sales(cache: &CacheState, ...) -> Result<Vec<SaleSummary>, ApiError> {
//!     let sales = cache.inner().sales().list().await?;
//!     ...
//! }
//! ```

use sales_cache::{DataSource, MockDataSource, SalesCache};

/// Wrapper around `SalesCache` for command state.
#[derive(Debug)]
pub struct CacheState<S = MockDataSource> {
    cache: SalesCache<S>,
}

impl<S: DataSource> CacheState<S> {
    pub fn new(cache: SalesCache<S>) -> Self {
        CacheState { cache }
    }

    /// Returns a reference to the inner SalesCache.
    pub fn inner(&self) -> &SalesCache<S> {
        &self.cache
    }
}
