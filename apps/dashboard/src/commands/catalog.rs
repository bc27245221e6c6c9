//! # Catalog Commands
//!
//! Reference data the composer needs before the user can start typing.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, warn};

use sales_cache::DataSource;
use sales_core::composer::quantity_cap;
use sales_core::validation::check_quantity_cap;
use sales_core::{Product, SaleForm, User};

use crate::error::ApiError;
use crate::state::CacheState;

/// One entry of a product selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductOption {
    pub id: String,
    pub label: String,
}

impl From<&Product> for ProductOption {
    fn from(product: &Product) -> Self {
        ProductOption {
            id: product.id.clone(),
            label: product.label(),
        }
    }
}

/// Everything the composer renders on open.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposerData {
    /// Blank form dated `today`, one empty row.
    pub form: SaleForm,
    pub users: Vec<User>,
    pub products: Vec<Product>,
    pub product_options: Vec<ProductOption>,
    /// Inline message shown in place of the product selectors.
    pub product_error: Option<String>,
}

/// Soft limit of one quantity input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantityHint {
    /// `max` of the input; `None` when stock is unknown.
    pub max: Option<i64>,
    /// The typed quantity is above `max`. Never blocks submission.
    pub exceeded: bool,
}

impl QuantityHint {
    pub fn new(quantity: i64, max: Option<i64>) -> Self {
        QuantityHint {
            max,
            exceeded: check_quantity_cap(quantity, max).is_err(),
        }
    }
}

/// Quantity hints for every composer row: the selected product's stock.
pub fn composer_quantity_hints(form: &SaleForm, products: &[Product]) -> Vec<QuantityHint> {
    form.items
        .iter()
        .map(|draft| QuantityHint::new(draft.quantity, quantity_cap(draft, products)))
        .collect()
}

/// Inline text for a failed product fetch.
pub fn product_error_message(message: Option<&str>) -> String {
    let message = message.filter(|m| !m.is_empty()).unwrap_or("unknown");
    format!("Error loading products: {}", message)
}

/// Loads users and products for a new sale.
///
/// A failed product fetch does not fail the command; it is reported in
/// `product_error` and the product list stays empty.
pub async fn load_composer<S: DataSource>(
    cache: &CacheState<S>,
    today: NaiveDate,
) -> Result<ComposerData, ApiError> {
    debug!(%today, "load_composer command");

    let catalog = cache.inner().catalog();
    let (users, products) = tokio::join!(catalog.users(), catalog.products());
    let users = users?;

    let (products, product_error) = match products {
        Ok(products) => (products, None),
        Err(e) => {
            warn!("Product fetch failed: {}", e);
            (Vec::new(), Some(product_error_message(e.fetch_message())))
        }
    };

    Ok(ComposerData {
        form: SaleForm::new(today),
        product_options: products.iter().map(ProductOption::from).collect(),
        users,
        products,
        product_error,
    })
}
