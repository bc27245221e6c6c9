//! # Data Services
//!
//! The only I/O boundary of the sales feature: three fetches returning the
//! users, the product catalog and the sales.
//!
//! [`MockDataSource`] serves fixed datasets after an artificial delay.
//! Sales are derived from the product fixture, so fetching them waits for
//! the product fetch first (two delays in total).

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use tracing::debug;

use sales_core::{LineItem, Money, Product, Sale, User};

use crate::error::CacheResult;

/// Artificial latency of the mock services.
pub const DEFAULT_LATENCY: Duration = Duration::from_millis(300);

/// User id stamped on every fixture sale.
pub const FIXTURE_SALE_USER: &str = "user-1";

// =============================================================================
// DataSource Trait
// =============================================================================

/// Source of the three reference/record collections.
pub trait DataSource: Send + Sync {
    fn fetch_users(&self) -> impl Future<Output = CacheResult<Vec<User>>> + Send;

    fn fetch_products(&self) -> impl Future<Output = CacheResult<Vec<Product>>> + Send;

    /// Sales, newest first.
    fn fetch_sales(&self) -> impl Future<Output = CacheResult<Vec<Sale>>> + Send;
}

// =============================================================================
// Mock Data Source
// =============================================================================

/// Fixed in-memory datasets served with a delay.
#[derive(Debug, Clone)]
pub struct MockDataSource {
    latency: Duration,
}

impl Default for MockDataSource {
    fn default() -> Self {
        MockDataSource::new(DEFAULT_LATENCY)
    }
}

impl MockDataSource {
    pub fn new(latency: Duration) -> Self {
        MockDataSource { latency }
    }

    /// No delay. Handy in tests.
    pub fn instant() -> Self {
        MockDataSource::new(Duration::ZERO)
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    async fn delay(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

impl DataSource for MockDataSource {
    async fn fetch_users(&self) -> CacheResult<Vec<User>> {
        self.delay().await;
        let users = fixture_users();
        debug!(count = users.len(), "Fetched users");
        Ok(users)
    }

    async fn fetch_products(&self) -> CacheResult<Vec<Product>> {
        self.delay().await;
        let products = fixture_products();
        debug!(count = products.len(), "Fetched products");
        Ok(products)
    }

    async fn fetch_sales(&self) -> CacheResult<Vec<Sale>> {
        let products = self.fetch_products().await?;
        self.delay().await;
        let sales = fixture_sales(&products);
        debug!(count = sales.len(), "Fetched sales");
        Ok(sales)
    }
}

// =============================================================================
// Fixtures
// =============================================================================

pub fn fixture_users() -> Vec<User> {
    [("u1", "María López"), ("u2", "Juan Pérez"), ("u3", "Ana García")]
        .into_iter()
        .map(|(id, name)| User {
            id: id.to_string(),
            name: name.to_string(),
        })
        .collect()
}

pub fn fixture_products() -> Vec<Product> {
    [
        ("p1", "Smartphone Pro", "Samsung", 1299, 12),
        ("p2", "Notebook Air 13\"", "Apple", 1899, 6),
        ("p3", "TV 55\"", "LG", 999, 20),
    ]
    .into_iter()
    .map(|(id, name, brand, price, stock)| Product {
        id: id.to_string(),
        name: name.to_string(),
        brand: Some(brand.to_string()),
        price_cents: Money::from_major(price).cents(),
        stock: Some(stock),
    })
    .collect()
}

/// One sale per product (up to three), newest first.
pub fn fixture_sales(products: &[Product]) -> Vec<Sale> {
    let dates = [(2024, 10, 14), (2024, 10, 12), (2024, 10, 8)];
    let stamp = fixture_timestamp();

    let mut sales: Vec<Sale> = products
        .iter()
        .zip(dates)
        .enumerate()
        .filter_map(|(i, (product, (y, m, d)))| {
            let date = NaiveDate::from_ymd_opt(y, m, d)?;
            let id = (i + 1).to_string();
            let quantity = if i == 0 { 2 } else { 1 };
            let item = LineItem::new(
                format!("d{id}"),
                id.clone(),
                product.name.clone(),
                product.brand.clone(),
                quantity,
                product.price(),
                stamp,
                stamp,
            );
            Some(Sale::new(id, date, FIXTURE_SALE_USER, stamp, stamp, vec![item]))
        })
        .collect();

    sales.sort_by(|a, b| b.date.cmp(&a.date));
    sales
}

fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 10, 1, 9, 0, 0)
        .single()
        .unwrap_or_default()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::CacheError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Source whose product fetch always fails.
    #[derive(Debug, Default, Clone)]
    pub(crate) struct FailingSource {
        pub calls: Arc<AtomicUsize>,
    }

    impl DataSource for FailingSource {
        async fn fetch_users(&self) -> CacheResult<Vec<User>> {
            Ok(fixture_users())
        }

        async fn fetch_products(&self) -> CacheResult<Vec<Product>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(CacheError::service("products", "connection refused"))
        }

        async fn fetch_sales(&self) -> CacheResult<Vec<Sale>> {
            let products = self.fetch_products().await?;
            Ok(fixture_sales(&products))
        }
    }

    #[test]
    fn test_fixture_products() {
        let products = fixture_products();
        let ids: Vec<&str> = products.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2", "p3"]);
        assert_eq!(products[2].name, "TV 55\"");
        assert_eq!(products[2].brand.as_deref(), Some("LG"));
        assert_eq!(products[2].price(), Money::from_major(999));
        assert_eq!(products[1].stock, Some(6));
    }

    #[test]
    fn test_fixture_sales_derived_from_products() {
        let sales = fixture_sales(&fixture_products());
        let ids: Vec<&str> = sales.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);

        let first = &sales[0];
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2024, 10, 14).unwrap());
        assert_eq!(first.user_id, FIXTURE_SALE_USER);
        assert_eq!(first.line_items().len(), 1);

        let item = first.first_line_item().unwrap();
        assert_eq!(item.id, "d1");
        assert_eq!(item.product, "Smartphone Pro");
        assert_eq!(item.quantity(), 2);
        assert_eq!(first.total(), Money::from_major(2598));

        assert_eq!(sales[2].first_line_item().unwrap().quantity(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_users_resolve_after_latency() {
        let source = MockDataSource::default();
        let start = tokio::time::Instant::now();

        let users = source.fetch_users().await.unwrap();

        assert_eq!(users.len(), 3);
        assert_eq!(users[0].name, "María López");
        assert!(start.elapsed() >= DEFAULT_LATENCY);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sales_wait_for_products() {
        let source = MockDataSource::new(Duration::from_millis(300));
        let start = tokio::time::Instant::now();

        let sales = source.fetch_sales().await.unwrap();

        assert_eq!(sales.len(), 3);
        assert!(start.elapsed() >= Duration::from_millis(600));
    }

    #[tokio::test]
    async fn test_failing_source_reports_message() {
        let source = FailingSource::default();
        let err = source.fetch_sales().await.unwrap_err();
        assert_eq!(err.fetch_message(), Some("connection refused"));
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }
}
