//! # Sale Editor
//!
//! Editing an existing sale: product re-resolution, stock-aware quantity
//! caps and the update submit.
//!
//! ## Editor Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SaleEditor::open(&sale)                                                │
//! │    └── one row per line item, product_id = None                         │
//! │           │                                                             │
//! │           ▼  (catalog finished loading)                                 │
//! │  resolve_products(&catalog)                                             │
//! │    └── match by exact name (+ brand when the row has one)               │
//! │           │                                                             │
//! │           ▼  (user edits through SaleForm transitions)                  │
//! │  max_quantity(i, &catalog)                                              │
//! │    └── stock + original qty while the row is the same product           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  submit(now) ──► Sale (same id, kept createdAt, new updatedAt)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::composer::new_id;
use crate::error::{CoreError, CoreResult};
use crate::form::{LineItemDraft, SaleForm};
use crate::types::{LineItem, Product, Sale};

// =============================================================================
// Original Line Item
// =============================================================================

/// What a line item looked like when the editor was opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginalLineItem {
    pub product: String,
    pub brand: Option<String>,
    pub quantity: i64,
    pub created_at: DateTime<Utc>,
}

impl OriginalLineItem {
    /// Whether `draft` still names the product this line was recorded for.
    ///
    /// A missing brand and an empty brand compare equal.
    pub fn is_same_product(&self, draft: &LineItemDraft) -> bool {
        self.product == draft.product && self.brand.as_deref().unwrap_or("") == draft.brand
    }
}

// =============================================================================
// Product Matching
// =============================================================================

/// Finds the catalog product a denormalized line refers to.
///
/// Exact name match; the brand only narrows the match when the line has one.
pub fn match_product<'a>(name: &str, brand: &str, catalog: &'a [Product]) -> Option<&'a Product> {
    catalog
        .iter()
        .find(|p| p.name == name && (brand.is_empty() || p.brand.as_deref() == Some(brand)))
}

/// Attaches product ids to every unresolved row that matches the catalog.
///
/// Rows that already have a product id are left untouched; rows without a
/// match stay unresolved but editable.
pub fn resolve_products(mut form: SaleForm, catalog: &[Product]) -> SaleForm {
    if catalog.is_empty() {
        return form;
    }
    for draft in form.items.iter_mut().filter(|d| d.product_id.is_none()) {
        if let Some(p) = match_product(&draft.product, &draft.brand, catalog) {
            draft.product_id = Some(p.id.clone());
        }
    }
    form
}

/// Stock-aware maximum quantity for one row.
///
/// ```text
/// no product selected / not in catalog / stock unknown ──► None
/// same product as originally recorded                  ──► stock + original qty
/// otherwise                                            ──► stock
/// ```
pub fn max_quantity(
    draft: &LineItemDraft,
    original: Option<&OriginalLineItem>,
    catalog: &[Product],
) -> Option<i64> {
    let product_id = draft.product_id.as_deref()?;
    let stock = catalog.iter().find(|p| p.id == product_id)?.stock?;
    match original {
        Some(orig) if orig.is_same_product(draft) => Some(stock + orig.quantity),
        _ => Some(stock),
    }
}

// =============================================================================
// Sale Editor
// =============================================================================

/// Editing session for one recorded sale.
#[derive(Debug, Clone)]
pub struct SaleEditor {
    sale: Sale,
    originals: HashMap<String, OriginalLineItem>,
    form: SaleForm,
}

impl SaleEditor {
    /// Opens an editor on `sale`. The sale itself is never mutated.
    pub fn open(sale: &Sale) -> Self {
        let originals = sale
            .line_items()
            .iter()
            .map(|li| {
                (
                    li.id.clone(),
                    OriginalLineItem {
                        product: li.product.clone(),
                        brand: li.brand.clone(),
                        quantity: li.quantity(),
                        created_at: li.created_at,
                    },
                )
            })
            .collect();

        let form = SaleForm {
            date: sale.date,
            user_id: Some(sale.user_id.clone()).filter(|u| !u.is_empty()),
            items: sale
                .line_items()
                .iter()
                .map(LineItemDraft::from_line_item)
                .collect(),
        };

        SaleEditor {
            sale: sale.clone(),
            originals,
            form,
        }
    }

    /// Id of the sale being edited.
    pub fn sale_id(&self) -> &str {
        &self.sale.id
    }

    pub fn form(&self) -> &SaleForm {
        &self.form
    }

    /// Original snapshot of a recorded line item.
    pub fn original(&self, line_item_id: &str) -> Option<&OriginalLineItem> {
        self.originals.get(line_item_id)
    }

    /// Applies a form transition.
    ///
    /// ```rust,ignore
    /// let editor = editor.apply(|f| f.update_item(0, LineItemPatch::default().quantity(3)))?;
    /// ```
    pub fn apply<F>(mut self, transition: F) -> CoreResult<Self>
    where
        F: FnOnce(SaleForm) -> CoreResult<SaleForm>,
    {
        self.form = transition(self.form)?;
        Ok(self)
    }

    /// Re-links unresolved rows to catalog products.
    pub fn resolve_products(mut self, catalog: &[Product]) -> Self {
        self.form = resolve_products(self.form, catalog);
        self
    }

    /// Stock-aware cap for row `index`.
    pub fn max_quantity(&self, index: usize, catalog: &[Product]) -> CoreResult<Option<i64>> {
        let draft = self.form.item(index)?;
        let original = draft
            .line_item_id
            .as_deref()
            .and_then(|id| self.originals.get(id));
        Ok(max_quantity(draft, original, catalog))
    }

    /// Builds the updated sale.
    ///
    /// Kept: sale id, sale `created_at`, each existing line item's id and
    /// `created_at`. Fresh: ids and `created_at` of new rows. Every
    /// `updated_at` becomes `now`.
    pub fn submit(&self, now: DateTime<Utc>) -> CoreResult<Sale> {
        self.form.validate().map_err(CoreError::from)?;

        let line_items = self
            .form
            .items
            .iter()
            .map(|draft| {
                let original = draft
                    .line_item_id
                    .as_deref()
                    .and_then(|id| self.originals.get(id));
                let id = draft.line_item_id.clone().unwrap_or_else(new_id);
                let created_at = original.map_or(now, |o| o.created_at);
                LineItem::new(
                    id,
                    self.sale.id.clone(),
                    draft.product.clone(),
                    draft.brand_opt(),
                    draft.quantity,
                    draft.unit_price(),
                    created_at,
                    now,
                )
                .with_product_id(draft.product_id.clone())
            })
            .collect();

        let user_id = self.form.user_id.clone().unwrap_or_default();
        Ok(Sale::new(
            self.sale.id.clone(),
            self.form.date,
            user_id,
            self.sale.created_at,
            now,
            line_items,
        ))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::LineItemPatch;
    use crate::money::Money;
    use chrono::{NaiveDate, TimeZone};

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
                id: "p3".into(),
                name: "TV 55\"".into(),
                brand: Some("LG".into()),
                price_cents: 99_900,
                stock: Some(20),
            },
        ]
    }

    fn recorded_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 10, 14, 8, 0, 0).unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 10, 20, 17, 45, 0).unwrap()
    }

    /// Sale "1": two TVs, brand recorded as LG.
    fn tv_sale(brand: Option<&str>) -> Sale {
        let item = LineItem::new(
            "d1",
            "1",
            "TV 55\"",
            brand.map(String::from),
            2,
            Money::from_major(999),
            recorded_at(),
            recorded_at(),
        );
        Sale::new(
            "1",
            NaiveDate::from_ymd_opt(2024, 10, 14).unwrap(),
            "user-1",
            recorded_at(),
            recorded_at(),
            vec![item],
        )
    }

    #[test]
    fn test_open_leaves_products_unresolved() {
        let editor = SaleEditor::open(&tv_sale(Some("LG")));
        let row = editor.form().item(0).unwrap();
        assert_eq!(row.line_item_id.as_deref(), Some("d1"));
        assert_eq!(row.product_id, None);
        assert_eq!(row.quantity, 2);
        assert_eq!(editor.form().user_id.as_deref(), Some("user-1"));
    }

    #[test]
    fn test_resolve_without_brand_matches_by_name() {
        let editor = SaleEditor::open(&tv_sale(None)).resolve_products(&catalog());
        assert_eq!(editor.form().item(0).unwrap().product_id.as_deref(), Some("p3"));
    }

    #[test]
    fn test_resolve_with_wrong_brand_stays_unresolved() {
        let editor = SaleEditor::open(&tv_sale(Some("Sony"))).resolve_products(&catalog());
        let row = editor.form().item(0).unwrap();
        assert_eq!(row.product_id, None);
        // still editable
        let editor = editor
            .apply(|f| f.update_item(0, LineItemPatch::default().quantity(5)))
            .unwrap();
        assert_eq!(editor.form().item(0).unwrap().quantity, 5);
    }

    #[test]
    fn test_resolve_keeps_existing_selection() {
        let editor = SaleEditor::open(&tv_sale(Some("LG")))
            .apply(|f| f.select_product(0, "p1", &catalog()))
            .unwrap()
            .resolve_products(&catalog());
        assert_eq!(editor.form().item(0).unwrap().product_id.as_deref(), Some("p1"));
    }

    #[test]
    fn test_resolve_on_empty_catalog_is_noop() {
        let editor = SaleEditor::open(&tv_sale(Some("LG"))).resolve_products(&[]);
        assert_eq!(editor.form().item(0).unwrap().product_id, None);
    }

    #[test]
    fn test_max_quantity_adds_back_original_quantity() {
        let editor = SaleEditor::open(&tv_sale(Some("LG"))).resolve_products(&catalog());
        assert_eq!(editor.max_quantity(0, &catalog()).unwrap(), Some(22));

        // brand recorded as absent, form brand empty: still the same product
        let editor = SaleEditor::open(&tv_sale(None)).resolve_products(&catalog());
        assert_eq!(editor.max_quantity(0, &catalog()).unwrap(), Some(22));
    }

    #[test]
    fn test_max_quantity_resets_when_product_changes() {
        let editor = SaleEditor::open(&tv_sale(Some("LG")))
            .resolve_products(&catalog())
            .apply(|f| f.select_product(0, "p1", &catalog()))
            .unwrap();
        assert_eq!(editor.max_quantity(0, &catalog()).unwrap(), Some(12));
    }

    #[test]
    fn test_max_quantity_for_new_rows_and_unknown_stock() {
        let editor = SaleEditor::open(&tv_sale(Some("LG")))
            .resolve_products(&catalog())
            .apply(|f| f.add_item().select_product(1, "p3", &catalog()))
            .unwrap();
        // new row, same product: raw stock only
        assert_eq!(editor.max_quantity(1, &catalog()).unwrap(), Some(20));

        let mut no_stock = catalog();
        for p in &mut no_stock {
            p.stock = None;
        }
        assert_eq!(editor.max_quantity(0, &no_stock).unwrap(), None);

        // unresolved row
        let unresolved = SaleEditor::open(&tv_sale(Some("LG")));
        assert_eq!(unresolved.max_quantity(0, &catalog()).unwrap(), None);

        assert!(editor.max_quantity(9, &catalog()).is_err());
    }

    #[test]
    fn test_submit_preserves_identity_and_creation_times() {
        let editor = SaleEditor::open(&tv_sale(Some("LG")))
            .resolve_products(&catalog())
            .apply(|f| f.update_item(0, LineItemPatch::default().quantity(3)))
            .and_then(|e| e.apply(|f| f.add_item().select_product(1, "p1", &catalog())))
            .unwrap();

        let updated = editor.submit(now()).unwrap();

        assert_eq!(updated.id, "1");
        assert_eq!(updated.created_at, recorded_at());
        assert_eq!(updated.updated_at, now());

        let kept = &updated.line_items()[0];
        assert_eq!(kept.id, "d1");
        assert_eq!(kept.created_at, recorded_at());
        assert_eq!(kept.updated_at, now());
        assert_eq!(kept.subtotal(), Money::from_major(2997));

        let added = &updated.line_items()[1];
        assert_ne!(added.id, "d1");
        assert!(!added.id.is_empty());
        assert_eq!(added.sale_id, "1");
        assert_eq!(added.created_at, now());
        assert_eq!(added.updated_at, now());

        assert_eq!(updated.total(), Money::from_major(2997 + 1299));
    }

    #[test]
    fn test_submit_requires_resolved_products() {
        // rows stay unresolved until the catalog arrives
        let editor = SaleEditor::open(&tv_sale(Some("LG")));
        assert!(matches!(
            editor.submit(now()),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn test_submit_changes_header_fields() {
        let editor = SaleEditor::open(&tv_sale(Some("LG")))
            .resolve_products(&catalog())
            .apply(|f| Ok(f.with_user("u3").with_date(NaiveDate::from_ymd_opt(2024, 10, 16).unwrap())))
            .unwrap();
        let updated = editor.submit(now()).unwrap();
        assert_eq!(updated.user_id, "u3");
        assert_eq!(updated.date, NaiveDate::from_ymd_opt(2024, 10, 16).unwrap());
    }
}
