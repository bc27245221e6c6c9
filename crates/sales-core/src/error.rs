//! # Error Types
//!
//! Domain-specific error types for sales-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  sales-core errors (this file)                                         │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Form rule failures (submit blockers)           │
//! │                                                                         │
//! │  sales-cache errors (separate crate)                                   │
//! │  └── CacheError       - Decode / lock / data source failures           │
//! │                                                                         │
//! │  dashboard errors (in app)                                             │
//! │  └── ApiError         - What the frontend sees (serialized)            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → CacheError → ApiError → Frontend  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Validation failures are *submit blockers*: the UI disables the submit
//! control while `SaleForm::is_valid` is false, so a `ValidationError` only
//! surfaces when a caller submits anyway.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Sale not found in the collection.
    #[error("Sale not found: {0}")]
    SaleNotFound(String),

    /// A form transition addressed a line item row that does not exist.
    #[error("Line item {index} out of range (form has {len} items)")]
    LineItemIndex { index: usize, len: usize },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Form validation errors.
///
/// Row-level variants carry the zero-based row index so the UI can point
/// at the offending line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// The sale has no line items.
    #[error("a sale needs at least one line item")]
    Empty,

    /// A line item row has no selected product.
    #[error("line item {index}: product is required")]
    ProductRequired { index: usize },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g., a date that does not parse).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
