//! # Domain Types
//!
//! Core domain types used throughout the Sales Manager.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  Reference data (read-only, fetched once per session)                  │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │    Product      │   │      User       │                             │
//! │  │  id, name       │   │  id, name       │                             │
//! │  │  brand?         │   └─────────────────┘                             │
//! │  │  price_cents    │                                                    │
//! │  │  stock?         │                                                    │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  Records (the cached system of record)                                 │
//! │  ┌─────────────────┐  1..n ┌─────────────────────────────┐             │
//! │  │      Sale       │──────►│         LineItem            │             │
//! │  │  id, date       │       │  product / brand (snapshot) │             │
//! │  │  user_id        │       │  quantity × unit_price      │             │
//! │  │  total = Σ      │       │  = subtotal                 │             │
//! │  └─────────────────┘       │  product_id? (UI hint)      │             │
//! │                            └─────────────────────────────┘             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! A line item copies the product's name and brand at the time of sale.
//! `product_id` is only a hint for the UI; later catalog changes never
//! touch a recorded line item.
//!
//! ## Derived Amounts
//! `LineItem::subtotal` and `Sale::total` are serialized (the frontend reads
//! them) but can only be produced by the constructors and setters below,
//! which recompute them from their inputs. Deserialization goes through the
//! same constructors; serialized amounts are ignored on read.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    pub id: String,

    /// Display name, copied into line items on selection.
    pub name: String,

    pub brand: Option<String>,

    /// Catalog price in cents.
    pub price_cents: i64,

    /// Units in stock. `None` when the source does not report a number;
    /// quantity inputs are then uncapped.
    pub stock: Option<i64>,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Selector label, e.g. `TV 55" (LG) — $999.00 | stock: 20`.
    pub fn label(&self) -> String {
        let stock = self
            .stock
            .map_or_else(|| "?".to_string(), |s| s.to_string());
        format!(
            "{} ({}) — {} | stock: {}",
            self.name,
            self.brand.as_deref().unwrap_or("—"),
            self.price(),
            stock
        )
    }
}

// =============================================================================
// User
// =============================================================================

/// A user a sale can be recorded against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct User {
    pub id: String,
    pub name: String,
}

// =============================================================================
// Line Item
// =============================================================================

/// One product-quantity-price entry within a sale (a "detalle").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LineItem {
    pub id: String,
    pub sale_id: String,

    /// Product name at time of sale (frozen).
    pub product: String,

    /// Product brand at time of sale (frozen).
    pub brand: Option<String>,

    quantity: i64,
    unit_price_cents: i64,
    subtotal_cents: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,

    /// Catalog product this row was picked from. UI-only, not authoritative.
    pub product_id: Option<String>,
}

impl LineItem {
    /// Creates a line item, deriving its subtotal.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        sale_id: impl Into<String>,
        product: impl Into<String>,
        brand: Option<String>,
        quantity: i64,
        unit_price: Money,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        LineItem {
            id: id.into(),
            sale_id: sale_id.into(),
            product: product.into(),
            brand,
            quantity,
            unit_price_cents: unit_price.cents(),
            subtotal_cents: unit_price.multiply_quantity(quantity).cents(),
            created_at,
            updated_at,
            product_id: None,
        }
    }

    /// Attaches the UI-only product reference.
    pub fn with_product_id(mut self, product_id: Option<String>) -> Self {
        self.product_id = product_id;
        self
    }

    #[inline]
    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// quantity × unit price.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }

    pub fn set_quantity(&mut self, quantity: i64) {
        self.quantity = quantity;
        self.recompute();
    }

    pub fn set_unit_price(&mut self, unit_price: Money) {
        self.unit_price_cents = unit_price.cents();
        self.recompute();
    }

    fn recompute(&mut self) {
        self.subtotal_cents = self.unit_price().multiply_quantity(self.quantity).cents();
    }
}

/// Stored shape of a line item, minus its subtotal.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredLineItem {
    id: String,
    sale_id: String,
    product: String,
    brand: Option<String>,
    quantity: i64,
    unit_price_cents: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(default)]
    product_id: Option<String>,
}

impl<'de> Deserialize<'de> for LineItem {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let stored = StoredLineItem::deserialize(deserializer)?;
        Ok(LineItem::new(
            stored.id,
            stored.sale_id,
            stored.product,
            stored.brand,
            stored.quantity,
            Money::from_cents(stored.unit_price_cents),
            stored.created_at,
            stored.updated_at,
        )
        .with_product_id(stored.product_id))
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A recorded sale (a "venta"): one user, one date, one or more line items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Sale {
    pub id: String,

    #[ts(as = "String")]
    pub date: NaiveDate,

    pub user_id: String,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,

    line_items: Vec<LineItem>,
    total_cents: i64,
}

impl Sale {
    /// Creates a sale, deriving its total from the line items.
    pub fn new(
        id: impl Into<String>,
        date: NaiveDate,
        user_id: impl Into<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        line_items: Vec<LineItem>,
    ) -> Self {
        let mut sale = Sale {
            id: id.into(),
            date,
            user_id: user_id.into(),
            created_at,
            updated_at,
            line_items: Vec::new(),
            total_cents: 0,
        };
        sale.set_line_items(line_items);
        sale
    }

    #[inline]
    pub fn line_items(&self) -> &[LineItem] {
        &self.line_items
    }

    /// First line item; the list summary only shows this one.
    #[inline]
    pub fn first_line_item(&self) -> Option<&LineItem> {
        self.line_items.first()
    }

    /// Σ line item subtotals.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Replaces every line item and re-derives the total.
    pub fn set_line_items(&mut self, line_items: Vec<LineItem>) {
        self.total_cents = line_items.iter().map(LineItem::subtotal).sum::<Money>().cents();
        self.line_items = line_items;
    }

    /// Consumes the sale, returning its line items.
    pub fn into_line_items(self) -> Vec<LineItem> {
        self.line_items
    }
}

/// Stored shape of a sale, minus its total.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSale {
    id: String,
    date: NaiveDate,
    user_id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    line_items: Vec<LineItem>,
}

impl<'de> Deserialize<'de> for Sale {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let stored = StoredSale::deserialize(deserializer)?;
        Ok(Sale::new(
            stored.id,
            stored.date,
            stored.user_id,
            stored.created_at,
            stored.updated_at,
            stored.line_items,
        ))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 10, 14, 9, 30, 0).unwrap()
    }

    fn item(id: &str, qty: i64, price: i64) -> LineItem {
        LineItem::new(id, "1", "TV 55\"", Some("LG".into()), qty, Money::from_major(price), ts(), ts())
    }

    #[test]
    fn test_line_item_subtotal_is_derived() {
        let mut li = item("d1", 2, 999);
        assert_eq!(li.subtotal(), Money::from_major(1998));

        li.set_quantity(3);
        assert_eq!(li.subtotal(), Money::from_major(2997));

        li.set_unit_price(Money::from_major(500));
        assert_eq!(li.subtotal(), Money::from_major(1500));
    }

    #[test]
    fn test_sale_total_is_sum_of_subtotals() {
        let sale = Sale::new(
            "1",
            NaiveDate::from_ymd_opt(2024, 10, 14).unwrap(),
            "u1",
            ts(),
            ts(),
            vec![item("d1", 2, 999), item("d2", 1, 1299)],
        );
        assert_eq!(sale.total(), Money::from_major(3297));
        assert_eq!(sale.first_line_item().map(|li| li.id.as_str()), Some("d1"));
    }

    #[test]
    fn test_sale_total_follows_line_item_replacement() {
        let mut sale = Sale::new(
            "1",
            NaiveDate::from_ymd_opt(2024, 10, 14).unwrap(),
            "u1",
            ts(),
            ts(),
            vec![item("d1", 2, 999)],
        );
        sale.set_line_items(vec![item("d1", 1, 999)]);
        assert_eq!(sale.total(), Money::from_major(999));

        sale.set_line_items(Vec::new());
        assert!(sale.total().is_zero());
    }

    #[test]
    fn test_json_shape_is_camel_case() {
        let sale = Sale::new(
            "1",
            NaiveDate::from_ymd_opt(2024, 10, 14).unwrap(),
            "u1",
            ts(),
            ts(),
            vec![item("d1", 2, 999)],
        );
        let json = serde_json::to_value(&sale).unwrap();
        assert_eq!(json["date"], "2024-10-14");
        assert_eq!(json["userId"], "u1");
        assert_eq!(json["totalCents"], 199_800);
        assert_eq!(json["lineItems"][0]["unitPriceCents"], 99_900);
        assert_eq!(json["lineItems"][0]["subtotalCents"], 199_800);

        let back: Sale = serde_json::from_value(json).unwrap();
        assert_eq!(back, sale);
    }

    #[test]
    fn test_decoding_recomputes_amounts() {
        let sale = Sale::new(
            "1",
            NaiveDate::from_ymd_opt(2024, 10, 14).unwrap(),
            "u1",
            ts(),
            ts(),
            vec![item("d1", 2, 999)],
        );
        let mut json = serde_json::to_value(&sale).unwrap();
        json["totalCents"] = 1.into();
        json["lineItems"][0]["subtotalCents"] = 5.into();

        let back: Sale = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(back.line_items()[0].subtotal(), Money::from_major(1998));
        assert_eq!(back.total(), Money::from_major(1998));
        assert_eq!(back, sale);

        // derived amounts may be missing altogether
        json.as_object_mut().unwrap().remove("totalCents");
        json["lineItems"][0].as_object_mut().unwrap().remove("subtotalCents");
        let back: Sale = serde_json::from_value(json).unwrap();
        assert_eq!(back.total(), Money::from_major(1998));
    }

    #[test]
    fn test_product_label() {
        let p = Product {
            id: "p3".into(),
            name: "TV 55\"".into(),
            brand: Some("LG".into()),
            price_cents: 99_900,
            stock: Some(20),
        };
        assert_eq!(p.label(), "TV 55\" (LG) — $999.00 | stock: 20");

        let unbranded = Product { brand: None, stock: None, ..p };
        assert_eq!(unbranded.label(), "TV 55\" (—) — $999.00 | stock: ?");
    }
}
