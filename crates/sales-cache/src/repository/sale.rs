//! # Sale Repository
//!
//! Reads and writes of the cached sale collection (`"ventas"`).
//!
//! ## Sale Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sale Lifecycle                                    │
//! │                                                                         │
//! │  1. LOAD                                                               │
//! │     └── list() → fetch-through from the DataSource, newest first       │
//! │                                                                         │
//! │  2. COMPOSE                                                            │
//! │     └── prepend() → new sale at the head of the collection             │
//! │                                                                         │
//! │  3. EDIT                                                               │
//! │     └── upsert() → replace by id, prepend when absent                  │
//! │                                                                         │
//! │  4. DELETE                                                             │
//! │     └── delete() → remove by id, others keep their order               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Writes go through `update_query_data`, so a prepend, upsert or delete
//! cannot lose an update between its own read and write.

use std::sync::Arc;

use tracing::debug;

use sales_core::listing::{find_sale, prepend_sale, remove_sale, upsert_sale};
use sales_core::Sale;

use crate::error::CacheResult;
use crate::services::DataSource;
use crate::store::{QueryCache, QueryKey};

/// Repository for the cached sales.
#[derive(Debug)]
pub struct SaleRepository<S> {
    cache: QueryCache,
    source: Arc<S>,
}

impl<S> Clone for SaleRepository<S> {
    fn clone(&self) -> Self {
        SaleRepository {
            cache: self.cache.clone(),
            source: Arc::clone(&self.source),
        }
    }
}

impl<S: DataSource> SaleRepository<S> {
    pub fn new(cache: QueryCache, source: Arc<S>) -> Self {
        SaleRepository { cache, source }
    }

    /// The sale collection, fetched on first use.
    pub async fn list(&self) -> CacheResult<Vec<Sale>> {
        let source = Arc::clone(&self.source);
        self.cache
            .fetch_query(QueryKey::Sales, || async move { source.fetch_sales().await })
            .await
    }

    /// Whatever is cached right now, without fetching.
    pub fn cached(&self) -> CacheResult<Option<Vec<Sale>>> {
        self.cache.get_query_data(QueryKey::Sales)
    }

    /// Gets a sale by id from the collection.
    pub async fn get_by_id(&self, id: &str) -> CacheResult<Option<Sale>> {
        let sales = self.list().await?;
        Ok(find_sale(&sales, id).ok().cloned())
    }

    /// Adds a freshly composed sale at the head of the collection.
    ///
    /// A missing collection is treated as empty.
    pub fn prepend(&self, sale: Sale) -> CacheResult<usize> {
        debug!(sale_id = %sale.id, items = sale.line_items().len(), "Prepending sale");
        self.cache
            .update_query_data(QueryKey::Sales, |prev: Option<Vec<Sale>>| {
                let next = prepend_sale(prev.unwrap_or_default(), sale);
                let len = next.len();
                (next, len)
            })
    }

    /// Replaces the sale with the same id, or prepends it.
    pub fn upsert(&self, sale: Sale) -> CacheResult<()> {
        debug!(sale_id = %sale.id, total = %sale.total(), "Upserting sale");
        self.cache
            .update_query_data(QueryKey::Sales, |prev: Option<Vec<Sale>>| {
                (upsert_sale(prev.unwrap_or_default(), sale), ())
            })
    }

    /// Removes the sale with `id`. Returns whether it was present.
    ///
    /// An absent id, or a collection that was never loaded, leaves the
    /// cache untouched and notifies nobody.
    pub fn delete(&self, id: &str) -> CacheResult<bool> {
        let removed = self
            .cache
            .update_query_data_if(QueryKey::Sales, |prev: Option<Vec<Sale>>| match prev {
                Some(sales) => {
                    let (next, removed) = remove_sale(sales, id);
                    (removed.then_some(next), removed)
                }
                None => (None, false),
            })?;
        debug!(sale_id = %id, removed, "Deleted sale");
        Ok(removed)
    }
}
