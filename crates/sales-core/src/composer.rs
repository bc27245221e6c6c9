//! # Sale Composer
//!
//! Turns a completed "new sale" form into a `Sale` record.
//!
//! ## Submit Flow
//! ```text
//! SaleForm ──validate()──► blocked? ──yes──► CoreError::Validation
//!                              │
//!                              no
//!                              ▼
//!          new sale id, new line item ids, every timestamp = now
//!                              │
//!                              ▼
//!          LineItem::new (subtotal derived) ──► Sale::new (total derived)
//! ```
//!
//! Writing the record into the cache (prepending it) is the caller's job;
//! see `sales-cache`'s `SaleRepository::prepend`.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::CoreResult;
use crate::form::{LineItemDraft, SaleForm};
use crate::types::{LineItem, Product, Sale};

/// Generates a fresh record identifier.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Quantity cap for a composer row: the selected product's stock.
///
/// `None` when nothing is selected, the product is not in the catalog, or
/// its stock is unknown.
pub fn quantity_cap(draft: &LineItemDraft, catalog: &[Product]) -> Option<i64> {
    let product_id = draft.product_id.as_deref()?;
    catalog
        .iter()
        .find(|p| p.id == product_id)
        .and_then(|p| p.stock)
}

/// Builds a new sale from a valid form.
///
/// ## Example
/// ```rust
/// use chrono::{NaiveDate, Utc};
/// use sales_core::{compose_sale, Product, SaleForm};
///
/// let catalog = vec![Product {
///     id: "p3".into(),
///     name: "TV 55\"".into(),
///     brand: Some("LG".into()),
///     price_cents: 99_900,
///     stock: Some(20),
/// }];
/// let form = SaleForm::new(NaiveDate::from_ymd_opt(2024, 10, 14).unwrap())
///     .with_user("u1")
///     .select_product(0, "p3", &catalog)
///     .unwrap();
///
/// let sale = compose_sale(&form, Utc::now()).unwrap();
/// assert_eq!(sale.total().cents(), 99_900);
/// ```
pub fn compose_sale(form: &SaleForm, now: DateTime<Utc>) -> CoreResult<Sale> {
    form.validate()?;

    let sale_id = new_id();
    let line_items = form
        .items
        .iter()
        .map(|draft| {
            LineItem::new(
                new_id(),
                sale_id.clone(),
                draft.product.clone(),
                draft.brand_opt(),
                draft.quantity,
                draft.unit_price(),
                now,
                now,
            )
            .with_product_id(draft.product_id.clone())
        })
        .collect();

    let user_id = form.user_id.clone().unwrap_or_default();
    Ok(Sale::new(sale_id, form.date, user_id, now, now, line_items))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CoreError, ValidationError};
    use crate::form::LineItemPatch;
    use crate::money::Money;
    use chrono::{NaiveDate, TimeZone};
    use std::collections::HashSet;

    fn catalog() -> Vec<Product> {
        vec![
            Product {
                id: "p1".into(),
                name: "Smartphone Pro".into(),
                brand: Some("Samsung".into()),
                price_cents: 129_900,
                stock: Some(12),
            },
            Product {
                id: "p2".into(),
                name: "Notebook Air 13\"".into(),
                brand: Some("Apple".into()),
                price_cents: 189_900,
                stock: None,
            },
        ]
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 10, 15, 12, 0, 0).unwrap()
    }

    fn two_row_form() -> SaleForm {
        SaleForm::new(NaiveDate::from_ymd_opt(2024, 10, 15).unwrap())
            .with_user("u2")
            .select_product(0, "p1", &catalog())
            .and_then(|f| f.update_item(0, LineItemPatch::default().quantity(2)))
            .and_then(|f| f.add_item().select_product(1, "p2", &catalog()))
            .unwrap()
    }

    #[test]
    fn test_compose_derives_amounts() {
        let sale = compose_sale(&two_row_form(), now()).unwrap();

        assert_eq!(sale.user_id, "u2");
        assert_eq!(sale.line_items().len(), 2);
        assert_eq!(sale.line_items()[0].subtotal(), Money::from_major(2598));
        assert_eq!(sale.line_items()[1].subtotal(), Money::from_major(1899));
        assert_eq!(sale.total(), Money::from_major(2598 + 1899));
    }

    #[test]
    fn test_compose_stamps_ids_and_timestamps() {
        let sale = compose_sale(&two_row_form(), now()).unwrap();

        assert!(!sale.id.is_empty());
        assert_eq!(sale.created_at, now());
        assert_eq!(sale.updated_at, now());

        let mut ids = HashSet::new();
        for li in sale.line_items() {
            assert_eq!(li.sale_id, sale.id);
            assert_eq!(li.created_at, now());
            assert_eq!(li.updated_at, now());
            assert!(ids.insert(li.id.clone()), "line item ids must be unique");
        }
        assert_eq!(sale.line_items()[0].product_id.as_deref(), Some("p1"));
        assert_eq!(sale.line_items()[0].brand.as_deref(), Some("Samsung"));
    }

    #[test]
    fn test_compose_rejects_invalid_form() {
        let form = SaleForm::new(NaiveDate::from_ymd_opt(2024, 10, 15).unwrap());
        let err = compose_sale(&form, now()).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_quantity_cap_is_raw_stock() {
        let form = two_row_form();
        assert_eq!(quantity_cap(form.item(0).unwrap(), &catalog()), Some(12));
        // stock unknown
        assert_eq!(quantity_cap(form.item(1).unwrap(), &catalog()), None);
        // nothing selected
        assert_eq!(quantity_cap(&LineItemDraft::blank(), &catalog()), None);
    }
}
