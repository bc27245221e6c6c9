//! # sales-cache: Query Cache for the Sales Manager
//!
//! This crate holds the process-wide cache every screen of the sales
//! feature reads from and writes to, plus the mock data services that fill
//! it on first use.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Sales Manager Data Flow                             │
//! │                                                                         │
//! │  Dashboard command (delete_sale)                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  sales-cache (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │  SalesCache   │    │ Repositories  │    │   Services   │  │   │
//! │  │   │  (cache.rs)   │    │ (sale.rs)     │    │ (mock data)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ QueryCache    │◄───│ SaleRepo      │◄───│ DataSource   │  │   │
//! │  │   │ broadcast     │    │ CatalogRepo   │    │ 300 ms delay │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - Keyed JSON store with change subscriptions
//! - [`cache`] - `SalesCache` construction and repository access
//! - [`repository`] - Sale and catalog repositories
//! - [`services`] - `DataSource` trait and the mock services
//! - [`error`] - Cache error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sales_cache::{CacheConfig, SalesCache};
//!
//! let cache = SalesCache::new(CacheConfig::default());
//! let sales = cache.sales().list().await?;
//! cache.sales().delete("2")?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cache;
pub mod error;
pub mod repository;
pub mod services;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use cache::{CacheConfig, SalesCache};
pub use error::{CacheError, CacheResult};
pub use services::{DataSource, MockDataSource};
pub use store::{CacheChange, QueryCache, QueryKey, Subscription};

// Repository re-exports for convenience
pub use repository::catalog::CatalogRepository;
pub use repository::sale::SaleRepository;
