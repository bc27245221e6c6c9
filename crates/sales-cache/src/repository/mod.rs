//! # Repository Module
//!
//! Typed access to the query cache, one repository per concern.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Dashboard Command                                                     │
//! │       │                                                                 │
//! │       │  cache.sales().delete("2")                                     │
//! │       ▼                                                                 │
//! │  SaleRepository                                                        │
//! │  ├── list(&self)             ─┐                                         │
//! │  ├── prepend(&self, sale)     │ fetch_query / update_query_data         │
//! │  ├── upsert(&self, sale)      │                                         │
//! │  └── delete(&self, id)       ─┘                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  QueryCache  ◄── DataSource (only on a cache miss)                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`SaleRepository`] - The sale collection
//! - [`CatalogRepository`] - Users and products

pub mod catalog;
pub mod sale;

pub use catalog::CatalogRepository;
pub use sale::SaleRepository;
