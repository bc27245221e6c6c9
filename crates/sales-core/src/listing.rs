//! # Sale Listing
//!
//! Date-range filtering, ordering, summaries and local deletion for the
//! sale list.
//!
//! ## List Pipeline
//! ```text
//! cached Vec<Sale>
//!      │
//!      ▼  DateRange::contains   (inclusive; a missing bound is open)
//!      ▼  sort by date, newest first (stable)
//!      ▼  SaleSummary::from_sale (first line item only)
//! Vec<SaleSummary>
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::Sale;
use crate::DEFAULT_ID_WIDTH;

// =============================================================================
// Date Range
// =============================================================================

/// Inclusive date filter. A `None` bound is open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// No filtering.
    pub fn all() -> Self {
        DateRange::default()
    }

    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        DateRange { start, end }
    }

    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        DateRange::new(Some(start), Some(end))
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// `start <= date` (when present) and `date <= end` (when present).
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |s| date >= s) && self.end.map_or(true, |e| date <= e)
    }
}

// =============================================================================
// Filtering & Ordering
// =============================================================================

/// Sales inside `range`, newest first.
///
/// Sales sharing a date keep their collection order.
pub fn filter_and_sort<'a>(sales: &'a [Sale], range: &DateRange) -> Vec<&'a Sale> {
    let mut visible: Vec<&Sale> = sales.iter().filter(|s| range.contains(s.date)).collect();
    visible.sort_by(|a, b| b.date.cmp(&a.date));
    visible
}

/// Removes the sale with `id`, keeping the others in order.
///
/// Returns the new collection and whether anything was removed.
pub fn remove_sale(sales: Vec<Sale>, id: &str) -> (Vec<Sale>, bool) {
    let before = sales.len();
    let remaining: Vec<Sale> = sales.into_iter().filter(|s| s.id != id).collect();
    let removed = remaining.len() != before;
    (remaining, removed)
}

/// Replaces the sale with the same id, or prepends it when absent.
pub fn upsert_sale(mut sales: Vec<Sale>, sale: Sale) -> Vec<Sale> {
    match sales.iter_mut().find(|s| s.id == sale.id) {
        Some(slot) => *slot = sale,
        None => sales.insert(0, sale),
    }
    sales
}

/// Prepends a newly composed sale.
pub fn prepend_sale(mut sales: Vec<Sale>, sale: Sale) -> Vec<Sale> {
    sales.insert(0, sale);
    sales
}

/// Looks up the full record behind an "Edit" click.
pub fn find_sale<'a>(sales: &'a [Sale], id: &str) -> CoreResult<&'a Sale> {
    sales
        .iter()
        .find(|s| s.id == id)
        .ok_or_else(|| CoreError::SaleNotFound(id.to_string()))
}

// =============================================================================
// Summaries
// =============================================================================

/// Zero-padded display id: `"1"` → `"Sale #001"`. Longer ids are kept whole.
pub fn display_id(id: &str, width: usize) -> String {
    format!("Sale #{:0>width$}", id, width = width)
}

/// `14 October 2024`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d %B %Y").to_string()
}

/// The first line item as shown on a summary card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ItemSummary {
    pub product: String,
    pub brand: Option<String>,
    pub quantity: i64,
    pub unit_price: Money,
}

/// One card in the sale list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleSummary {
    pub sale_id: String,
    pub display_id: String,
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub formatted_date: String,
    /// Only the first line item; multi-item sales show one line.
    pub first_item: Option<ItemSummary>,
    pub total: Money,
}

impl SaleSummary {
    pub fn from_sale(sale: &Sale, id_width: usize) -> Self {
        SaleSummary {
            sale_id: sale.id.clone(),
            display_id: display_id(&sale.id, id_width),
            date: sale.date,
            formatted_date: format_date(sale.date),
            first_item: sale.first_line_item().map(|li| ItemSummary {
                product: li.product.clone(),
                brand: li.brand.clone(),
                quantity: li.quantity(),
                unit_price: li.unit_price(),
            }),
            total: sale.total(),
        }
    }
}

/// Filters, orders and summarizes a collection with the default id width.
pub fn list_view(sales: &[Sale], range: &DateRange) -> Vec<SaleSummary> {
    list_view_with_width(sales, range, DEFAULT_ID_WIDTH)
}

pub fn list_view_with_width(sales: &[Sale], range: &DateRange, id_width: usize) -> Vec<SaleSummary> {
    filter_and_sort(sales, range)
        .into_iter()
        .map(|s| SaleSummary::from_sale(s, id_width))
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
