//! # Catalog Repository
//!
//! Read-only reference data: users (`"usuarios"`) and products
//! (`"productos-catalogo"`). Each is fetched once and then served from
//! the cache.

use std::sync::Arc;

use sales_core::{Product, User};

use crate::error::CacheResult;
use crate::services::DataSource;
use crate::store::{QueryCache, QueryKey};

/// Repository for users and products.
#[derive(Debug)]
pub struct CatalogRepository<S> {
    cache: QueryCache,
    source: Arc<S>,
}

impl<S> Clone for CatalogRepository<S> {
    fn clone(&self) -> Self {
        CatalogRepository {
            cache: self.cache.clone(),
            source: Arc::clone(&self.source),
        }
    }
}

impl<S: DataSource> CatalogRepository<S> {
    pub fn new(cache: QueryCache, source: Arc<S>) -> Self {
        CatalogRepository { cache, source }
    }

    pub async fn users(&self) -> CacheResult<Vec<User>> {
        let source = Arc::clone(&self.source);
        self.cache
            .fetch_query(QueryKey::Users, || async move { source.fetch_users().await })
            .await
    }

    pub async fn products(&self) -> CacheResult<Vec<Product>> {
        let source = Arc::clone(&self.source);
        self.cache
            .fetch_query(QueryKey::Products, || async move { source.fetch_products().await })
            .await
    }

    /// Gets a product by catalog id.
    pub async fn product_by_id(&self, id: &str) -> CacheResult<Option<Product>> {
        let products = self.products().await?;
        Ok(products.into_iter().find(|p| p.id == id))
    }
}
