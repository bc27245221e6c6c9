//! # Sale Form
//!
//! The editable state behind both the "new sale" and "edit sale" screens,
//! modelled as an immutable value with pure transitions.
//!
//! ## Transitions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  UI event                 Transition                  Result            │
//! │  ────────                 ──────────                  ──────            │
//! │  date input   ──────────► with_date(d)          ───► SaleForm           │
//! │  user select  ──────────► with_user(id)         ───► SaleForm           │
//! │  "+ Add item" ──────────► add_item()            ───► SaleForm           │
//! │  "Remove"     ──────────► remove_item(i)        ───► CoreResult<Form>   │
//! │  product sel. ──────────► select_product(i, …)  ───► CoreResult<Form>   │
//! │  qty / price  ──────────► update_item(i, patch) ───► CoreResult<Form>   │
//! │                                                                         │
//! │  Derived on read (never cached): subtotal(i), total(), is_valid()      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{LineItem, Product};
use crate::validation::{
    validate_product_name, validate_quantity, validate_required, validate_unit_price_cents,
    ValidationResult,
};

// =============================================================================
// Line Item Draft
// =============================================================================

/// One editable row of the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LineItemDraft {
    /// Id of the recorded line item this row edits. `None` for new rows.
    pub line_item_id: Option<String>,

    /// Selected catalog product (UI-only).
    pub product_id: Option<String>,

    /// Denormalized product name.
    pub product: String,

    /// Denormalized brand; empty when the product has none.
    pub brand: String,

    pub quantity: i64,

    pub unit_price_cents: i64,
}

impl LineItemDraft {
    /// A fresh row: nothing selected, quantity 1, price 0.
    pub fn blank() -> Self {
        LineItemDraft {
            line_item_id: None,
            product_id: None,
            product: String::new(),
            brand: String::new(),
            quantity: 1,
            unit_price_cents: 0,
        }
    }

    /// A row prefilled from a recorded line item.
    ///
    /// The product reference starts unresolved even when the record carries
    /// one; the editor re-links it against the live catalog.
    pub fn from_line_item(item: &LineItem) -> Self {
        LineItemDraft {
            line_item_id: Some(item.id.clone()),
            product_id: None,
            product: item.product.clone(),
            brand: item.brand.clone().unwrap_or_default(),
            quantity: item.quantity(),
            unit_price_cents: item.unit_price().cents(),
        }
    }

    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// quantity × unit price, recomputed on every read.
    #[inline]
    pub fn subtotal(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }

    /// Brand as stored on a record: empty text becomes `None`.
    pub fn brand_opt(&self) -> Option<String> {
        if self.brand.is_empty() {
            None
        } else {
            Some(self.brand.clone())
        }
    }

    /// Validates this row. `index` is only used for error context.
    pub fn validate(&self, index: usize) -> ValidationResult<()> {
        validate_required("product", self.product_id.as_deref())
            .map_err(|_| ValidationError::ProductRequired { index })?;
        validate_product_name(&self.product)?;
        validate_quantity(self.quantity)?;
        validate_unit_price_cents(self.unit_price_cents)?;
        Ok(())
    }
}

// =============================================================================
// Line Item Patch
// =============================================================================

/// A partial update of a row's free-text / numeric inputs.
///
/// ```rust
/// use sales_core::form::LineItemPatch;
///
/// let patch = LineItemPatch::default().quantity(3).unit_price_cents(150_00);
/// assert_eq!(patch.quantity, Some(3));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineItemPatch {
    pub product: Option<String>,
    pub brand: Option<String>,
    pub quantity: Option<i64>,
    pub unit_price_cents: Option<i64>,
}

impl LineItemPatch {
    pub fn quantity(mut self, quantity: i64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn unit_price_cents(mut self, cents: i64) -> Self {
        self.unit_price_cents = Some(cents);
        self
    }

    pub fn product(mut self, name: impl Into<String>) -> Self {
        self.product = Some(name.into());
        self
    }

    pub fn brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    fn apply(self, draft: &mut LineItemDraft) {
        if let Some(product) = self.product {
            draft.product = product;
        }
        if let Some(brand) = self.brand {
            draft.brand = brand;
        }
        if let Some(quantity) = self.quantity {
            draft.quantity = quantity;
        }
        if let Some(cents) = self.unit_price_cents {
            draft.unit_price_cents = cents;
        }
    }
}

// =============================================================================
// Sale Form
// =============================================================================

/// Whole-form state: header fields plus the ordered rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleForm {
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub user_id: Option<String>,
    pub items: Vec<LineItemDraft>,
}

impl SaleForm {
    /// A new-sale form dated `today` with a single blank row.
    pub fn new(today: NaiveDate) -> Self {
        SaleForm {
            date: today,
            user_id: None,
            items: vec![LineItemDraft::blank()],
        }
    }

    // -------------------------------------------------------------------------
    // Transitions
    // -------------------------------------------------------------------------

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    /// Selects a user. An empty id clears the selection.
    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        let user_id = user_id.into();
        self.user_id = if user_id.is_empty() { None } else { Some(user_id) };
        self
    }

    /// Appends a blank row.
    pub fn add_item(mut self) -> Self {
        self.items.push(LineItemDraft::blank());
        self
    }

    pub fn remove_item(mut self, index: usize) -> CoreResult<Self> {
        self.check_index(index)?;
        self.items.remove(index);
        Ok(self)
    }

    pub fn update_item(mut self, index: usize, patch: LineItemPatch) -> CoreResult<Self> {
        let draft = self.item_mut(index)?;
        patch.apply(draft);
        Ok(self)
    }

    /// Selects a catalog product for a row.
    ///
    /// Fills name, brand and unit price from the catalog entry. An id that
    /// is not in `catalog` is still recorded, with name and price cleared,
    /// which leaves the row invalid until a real product is picked.
    pub fn select_product(
        mut self,
        index: usize,
        product_id: &str,
        catalog: &[Product],
    ) -> CoreResult<Self> {
        let product = catalog.iter().find(|p| p.id == product_id);
        let draft = self.item_mut(index)?;
        draft.product_id = Some(product_id.to_string());
        match product {
            Some(p) => {
                draft.product = p.name.clone();
                draft.brand = p.brand.clone().unwrap_or_default();
                draft.unit_price_cents = p.price_cents;
            }
            None => {
                draft.product = String::new();
                draft.brand = String::new();
                draft.unit_price_cents = 0;
            }
        }
        Ok(self)
    }

    // -------------------------------------------------------------------------
    // Derived values
    // -------------------------------------------------------------------------

    pub fn subtotal(&self, index: usize) -> CoreResult<Money> {
        self.item(index).map(LineItemDraft::subtotal)
    }

    /// Σ row subtotals.
    pub fn total(&self) -> Money {
        self.items.iter().map(LineItemDraft::subtotal).sum()
    }

    /// First failing rule, in form order: user, non-empty, then each row.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_required("user", self.user_id.as_deref())?;
        if self.items.is_empty() {
            return Err(ValidationError::Empty);
        }
        self.items
            .iter()
            .enumerate()
            .try_for_each(|(i, draft)| draft.validate(i))
    }

    /// Whether the submit control is enabled.
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    // -------------------------------------------------------------------------
    // Row access
    // -------------------------------------------------------------------------

    pub fn item(&self, index: usize) -> CoreResult<&LineItemDraft> {
        self.items.get(index).ok_or(CoreError::LineItemIndex {
            index,
            len: self.items.len(),
        })
    }

    fn item_mut(&mut self, index: usize) -> CoreResult<&mut LineItemDraft> {
        let len = self.items.len();
        self.items
            .get_mut(index)
            .ok_or(CoreError::LineItemIndex { index, len })
    }

    fn check_index(&self, index: usize) -> CoreResult<()> {
        self.item(index).map(|_| ())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
