//! # sales-core: Pure Business Logic for the Sales Manager
//!
//! This crate is the **heart** of the sales feature. It contains the sale
//! composition, editing and listing rules as pure functions with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Sales Manager Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Dashboard (apps/dashboard)                   │   │
//! │  │    New Sale ──► Edit Sale ──► Sale List ──► Delete             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ sales-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   form    │  │  editor   │  │  listing  │  │   │
//! │  │   │  Product  │  │ SaleForm  │  │ stock cap │  │ DateRange │  │   │
//! │  │   │   Sale    │  │ composer  │  │ re-link   │  │ summaries │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO CACHE • NO NETWORK • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              sales-cache (Query cache + mock data)              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain records (Product, User, Sale, LineItem)
//! - [`money`] - Money type with integer arithmetic
//! - [`form`] - The editable sale form and its transitions
//! - [`composer`] - New sale submit
//! - [`editor`] - Product re-resolution, stock caps, update submit
//! - [`listing`] - Date filtering, ordering, summaries, deletion
//! - [`validation`] - Field rules
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use sales_core::listing::{list_view, DateRange};
//!
//! let d = |day| NaiveDate::from_ymd_opt(2024, 10, day).unwrap();
//! let view = list_view(&[], &DateRange::between(d(10), d(13)));
//! assert!(view.is_empty());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod composer;
pub mod editor;
pub mod error;
pub mod form;
pub mod listing;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use composer::compose_sale;
pub use editor::SaleEditor;
pub use error::{CoreError, CoreResult, ValidationError};
pub use form::{LineItemDraft, LineItemPatch, SaleForm};
pub use listing::{DateRange, SaleSummary};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Width sale ids are zero-padded to on summary cards (`"1"` → `"001"`).
pub const DEFAULT_ID_WIDTH: usize = 3;
