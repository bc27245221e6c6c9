//! # Validation Module
//!
//! Field-level rules shared by the sale composer and the sale editor.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Input constraints (frontend)                                 │
//! │  ├── quantity min=1, max=stock cap (soft, advisory)                    │
//! │  └── price min=0                                                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: SaleForm::validate (sales-core::form)                        │
//! │  └── THIS MODULE: per-field rules, first failure wins                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Submit control enabled only when every rule passes                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use sales_core::validation::{validate_quantity, validate_unit_price_cents};
//!
//! assert!(validate_quantity(2).is_ok());
//! assert!(validate_quantity(0).is_err());
//! assert!(validate_unit_price_cents(0).is_ok()); // free items are fine
//! ```

use chrono::NaiveDate;

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Largest quantity a single line item accepts.
pub const MAX_QUANTITY: i64 = 1_000_000;

/// Largest unit price a line item accepts, in cents.
///
/// With [`MAX_QUANTITY`] a subtotal stays below 10^16 cents, so totals of
/// any realistic sale fit in an `i64`.
pub const MAX_UNIT_PRICE_CENTS: i64 = 10_000_000_000;

// =============================================================================
// String Validators
// =============================================================================

/// Validates that a required selection (user id, product id) is present.
pub fn validate_required(field: &str, value: Option<&str>) -> ValidationResult<()> {
    match value {
        Some(v) if !v.is_empty() => Ok(()),
        _ => Err(ValidationError::Required {
            field: field.to_string(),
        }),
    }
}

/// Validates a line item's denormalized product name. Only emptiness is
/// rejected; the name is stored as typed.
///
/// ```rust
/// use sales_core::validation::validate_product_name;
///
/// assert!(validate_product_name("TV 55\"").is_ok());
/// assert!(validate_product_name("").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "product name".to_string(),
        });
    }
    Ok(())
}

/// Parses an ISO `YYYY-MM-DD` date as typed into a date input.
pub fn validate_iso_date(field: &str, value: &str) -> ValidationResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|e| {
        ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: e.to_string(),
        }
    })
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line item quantity (1 to [`MAX_QUANTITY`]).
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }
    if qty > MAX_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_QUANTITY,
        });
    }
    Ok(())
}

/// Validates a unit price in cents (0 to [`MAX_UNIT_PRICE_CENTS`]).
pub fn validate_unit_price_cents(cents: i64) -> ValidationResult<()> {
    if !(0..=MAX_UNIT_PRICE_CENTS).contains(&cents) {
        return Err(ValidationError::OutOfRange {
            field: "unit price".to_string(),
            min: 0,
            max: MAX_UNIT_PRICE_CENTS,
        });
    }
    Ok(())
}

/// Checks a quantity against a stock cap.
///
/// Advisory only: the cap mirrors the input's `max` attribute and never
/// blocks submission. `None` means no cap.
pub fn check_quantity_cap(qty: i64, cap: Option<i64>) -> ValidationResult<()> {
    match cap {
        Some(max) if qty > max => Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max,
        }),
        _ => Ok(()),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_required() {
        assert!(validate_required("user", Some("u1")).is_ok());
        assert!(validate_required("user", Some("")).is_err());
        assert!(validate_required("user", Some(" ")).is_ok());
        assert_eq!(
            validate_required("user", None),
            Err(ValidationError::Required {
                field: "user".to_string()
            })
        );
    }

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Smartphone Pro").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name("  ").is_ok());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(10_000).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(MAX_QUANTITY).is_ok());
        assert_eq!(
            validate_quantity(MAX_QUANTITY + 1),
            Err(ValidationError::OutOfRange {
                field: "quantity".to_string(),
                min: 1,
                max: MAX_QUANTITY
            })
        );
    }

    #[test]
    fn test_validate_unit_price_cents() {
        assert!(validate_unit_price_cents(0).is_ok());
        assert!(validate_unit_price_cents(99_900).is_ok());
        assert!(validate_unit_price_cents(-1).is_err());
        assert!(validate_unit_price_cents(MAX_UNIT_PRICE_CENTS).is_ok());
        assert!(validate_unit_price_cents(MAX_UNIT_PRICE_CENTS + 1).is_err());
    }

    #[test]
    fn test_check_quantity_cap() {
        assert!(check_quantity_cap(22, Some(22)).is_ok());
        assert!(check_quantity_cap(23, Some(22)).is_err());
        assert!(check_quantity_cap(1_000, None).is_ok());
    }

    #[test]
    fn test_validate_iso_date() {
        assert_eq!(
            validate_iso_date("start", "2024-10-10"),
            Ok(NaiveDate::from_ymd_opt(2024, 10, 10).unwrap())
        );
        assert!(validate_iso_date("start", "10/10/2024").is_err());
    }
}
