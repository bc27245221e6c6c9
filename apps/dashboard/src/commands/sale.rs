//! # Sale Commands

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use sales_cache::DataSource;
use sales_core::listing::list_view_with_width;
use sales_core::{compose_sale, DateRange, Money, Sale, SaleEditor, SaleForm, SaleSummary};

use crate::commands::catalog::QuantityHint;
use crate::confirm::Confirm;
use crate::error::ApiError;
use crate::state::{CacheState, ConfigState};

/// Question asked before a sale is removed.
pub const DELETE_PROMPT: &str = "Delete this sale?";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSaleResponse {
    pub sale_id: String,
    pub total: Money,
    pub item_count: usize,
}

/// What `delete_sale` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeleteOutcome {
    Deleted,
    /// The user declined; nothing changed.
    Cancelled,
    /// No sale with that id was cached; nothing changed.
    NotFound,
}

/// Composes a new sale from `form` and puts it at the head of the list.
pub async fn create_sale<S: DataSource>(
    cache: &CacheState<S>,
    form: &SaleForm,
) -> Result<CreateSaleResponse, ApiError> {
    debug!(items = form.items.len(), "create_sale command");

    let sale = compose_sale(form, Utc::now())?;
    let response = CreateSaleResponse {
        sale_id: sale.id.clone(),
        total: sale.total(),
        item_count: sale.line_items().len(),
    };

    cache.inner().sales().prepend(sale)?;

    info!(
        sale_id = %response.sale_id,
        total = %response.total,
        items = response.item_count,
        "Sale created"
    );
    Ok(response)
}

/// Opens an editor on a cached sale, with rows re-linked to the catalog.
///
/// If the catalog cannot be loaded the rows stay unresolved but editable.
pub async fn open_editor<S: DataSource>(
    cache: &CacheState<S>,
    sale_id: &str,
) -> Result<SaleEditor, ApiError> {
    debug!(sale_id = %sale_id, "open_editor command");

    let sale = cache
        .inner()
        .sales()
        .get_by_id(sale_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Sale", sale_id))?;

    let editor = SaleEditor::open(&sale);
    match cache.inner().catalog().products().await {
        Ok(products) => Ok(editor.resolve_products(&products)),
        Err(e) => {
            warn!(sale_id = %sale_id, "Editing without catalog: {}", e);
            Ok(editor)
        }
    }
}

/// Quantity hints for every editor row.
///
/// A row still on its recorded product may go up to stock plus the
/// quantity it already holds.
pub async fn editor_quantity_hints<S: DataSource>(
    cache: &CacheState<S>,
    editor: &SaleEditor,
) -> Result<Vec<QuantityHint>, ApiError> {
    let products = cache.inner().catalog().products().await?;
    editor
        .form()
        .items
        .iter()
        .enumerate()
        .map(|(i, draft)| -> Result<QuantityHint, ApiError> {
            let max = editor.max_quantity(i, &products)?;
            Ok(QuantityHint::new(draft.quantity, max))
        })
        .collect()
}

/// Submits an editor: replaces the sale by id (or prepends it), then
/// calls `on_close`.
///
/// `on_close` is not called when submission fails.
pub async fn update_sale<S, F>(
    cache: &CacheState<S>,
    editor: &SaleEditor,
    on_close: F,
) -> Result<Sale, ApiError>
where
    S: DataSource,
    F: FnOnce(&Sale),
{
    debug!(sale_id = %editor.sale_id(), "update_sale command");

    let sale = editor.submit(Utc::now())?;
    cache.inner().sales().upsert(sale.clone())?;

    info!(sale_id = %sale.id, total = %sale.total(), "Sale updated");
    on_close(&sale);
    Ok(sale)
}

/// Summaries for `range`, newest first.
///
/// `None` uses the configured default range.
pub async fn list_sales<S: DataSource>(
    cache: &CacheState<S>,
    config: &ConfigState,
    range: Option<DateRange>,
) -> Result<Vec<SaleSummary>, ApiError> {
    let range = range.unwrap_or_else(|| config.default_range());
    debug!(start = ?range.start, end = ?range.end, "list_sales command");

    let sales = cache.inner().sales().list().await?;
    Ok(list_view_with_width(&sales, &range, config.display.id_width))
}

/// Removes a sale after confirmation.
pub async fn delete_sale<S: DataSource>(
    cache: &CacheState<S>,
    sale_id: &str,
    confirm: &dyn Confirm,
) -> Result<DeleteOutcome, ApiError> {
    debug!(sale_id = %sale_id, "delete_sale command");

    if !confirm.confirm(DELETE_PROMPT) {
        debug!(sale_id = %sale_id, "Deletion cancelled");
        return Ok(DeleteOutcome::Cancelled);
    }

    if cache.inner().sales().delete(sale_id)? {
        info!(sale_id = %sale_id, "Sale deleted");
        Ok(DeleteOutcome::Deleted)
    } else {
        debug!(sale_id = %sale_id, "Sale not in cache, nothing deleted");
        Ok(DeleteOutcome::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confirm::AssumeYes;
    use chrono::NaiveDate;
    use sales_cache::{CacheConfig, QueryKey, SalesCache};
    use sales_core::{LineItemPatch, ValidationError};
    use std::cell::Cell;

    fn state() -> CacheState {
        CacheState::new(SalesCache::new(CacheConfig::instant()))
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 10, d).unwrap()
    }

    async fn ids(state: &CacheState) -> Vec<String> {
        state
            .inner()
            .sales()
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect()
    }

    #[tokio::test]
    async fn test_create_sale_prepends() {
        let state = state();
        let products = state.inner().catalog().products().await.unwrap();
        state.inner().sales().list().await.unwrap();

        let form = SaleForm::new(day(18))
            .with_user("u2")
            .select_product(0, "p3", &products)
            .unwrap()
            .update_item(0, LineItemPatch::default().quantity(2))
            .unwrap();

        let response = create_sale(&state, &form).await.unwrap();
        assert_eq!(response.total, Money::from_major(1998));
        assert_eq!(response.item_count, 1);

        let ids = ids(&state).await;
        assert_eq!(ids.len(), 4);
        assert_eq!(ids[0], response.sale_id);
    }

    #[tokio::test]
    async fn test_invalid_form_writes_nothing() {
        let state = state();
        state.inner().sales().list().await.unwrap();
        let version = state.inner().store().version();

        let err = create_sale(&state, &SaleForm::new(day(18))).await.unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::ValidationError);
        assert_eq!(state.inner().store().version(), version);
    }

    #[tokio::test]
    async fn test_open_editor_resolves_products() {
        let state = state();
        let editor = open_editor(&state, "3").await.unwrap();
        assert_eq!(editor.sale_id(), "3");
        assert_eq!(editor.form().items[0].product_id.as_deref(), Some("p3"));

        let err = open_editor(&state, "42").await.unwrap_err();
        assert_eq!(err.message, "Sale not found: 42");
    }

    #[tokio::test]
    async fn test_editor_hints_add_back_original_quantity() {
        let state = state();
        let products = state.inner().catalog().products().await.unwrap();
        let editor = open_editor(&state, "3")
            .await
            .unwrap()
            .apply(|f| f.update_item(0, LineItemPatch::default().quantity(2)))
            .unwrap();

        let hints = editor_quantity_hints(&state, &editor).await.unwrap();
        // recorded with quantity 1, p3 stock 20
        assert_eq!(hints[0].max, Some(21));

        let switched = editor.apply(|f| f.select_product(0, "p2", &products)).unwrap();
        let hints = editor_quantity_hints(&state, &switched).await.unwrap();
        assert_eq!(hints[0].max, Some(6));
    }

    #[tokio::test]
    async fn test_update_sale_replaces_in_place_and_closes() {
        let state = state();
        let editor = open_editor(&state, "2")
            .await
            .unwrap()
            .apply(|f| Ok(f.with_user("u3").with_date(day(13))))
            .unwrap();

        let closed = Cell::new(false);
        let sale = update_sale(&state, &editor, |_| closed.set(true)).await.unwrap();

        assert!(closed.get());
        assert_eq!(sale.user_id, "u3");
        assert_eq!(sale.first_line_item().unwrap().id, "d2");
        assert_eq!(ids(&state).await, vec!["1", "2", "3"]);

        let cached = state.inner().sales().get_by_id("2").await.unwrap().unwrap();
        assert_eq!(cached.date, day(13));
    }

    #[tokio::test]
    async fn test_update_sale_failure_keeps_editor_open() {
        let state = state();
        let editor = open_editor(&state, "1")
            .await
            .unwrap()
            .apply(|f| f.remove_item(0))
            .unwrap();

        let closed = Cell::new(false);
        let err = update_sale(&state, &editor, |_| closed.set(true)).await.unwrap_err();
        assert!(!closed.get());
        assert_eq!(err.message, ValidationError::Empty.to_string());
    }

    #[tokio::test]
    async fn test_list_sales_uses_range_or_default() {
        let state = state();
        let mut config = ConfigState::default();

        let all = list_sales(&state, &config, None).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].display_id, "Sale #001");

        let some = list_sales(&state, &config, Some(DateRange::between(day(10), day(13))))
            .await
            .unwrap();
        assert_eq!(some.len(), 1);
        assert_eq!(some[0].sale_id, "2");

        config.list.default_to = Some(day(12));
        config.display.id_width = 5;
        let until = list_sales(&state, &config, None).await.unwrap();
        let shown: Vec<&str> = until.iter().map(|s| s.display_id.as_str()).collect();
        assert_eq!(shown, vec!["Sale #00002", "Sale #00003"]);
    }

    #[tokio::test]
    async fn test_delete_sale() {
        let state = state();
        state.inner().sales().list().await.unwrap();

        let outcome = delete_sale(&state, "2", &AssumeYes).await.unwrap();
        assert_eq!(outcome, DeleteOutcome::Deleted);
        assert_eq!(ids(&state).await, vec!["1", "3"]);

        let outcome = delete_sale(&state, "2", &AssumeYes).await.unwrap();
        assert_eq!(outcome, DeleteOutcome::NotFound);
    }

    #[tokio::test]
    async fn test_delete_unknown_id_leaves_cache_alone() {
        let cold = state();
        let outcome = delete_sale(&cold, "42", &AssumeYes).await.unwrap();
        assert_eq!(outcome, DeleteOutcome::NotFound);
        assert_eq!(cold.inner().store().version(), 0);
        assert_eq!(ids(&cold).await, vec!["1", "2", "3"]);

        let version = cold.inner().store().version();
        let outcome = delete_sale(&cold, "42", &AssumeYes).await.unwrap();
        assert_eq!(outcome, DeleteOutcome::NotFound);
        assert_eq!(cold.inner().store().version(), version);
    }

    #[tokio::test]
    async fn test_declined_delete_is_noop() {
        let state = state();
        state.inner().sales().list().await.unwrap();
        let version = state.inner().store().version();

        let asked = Cell::new(None::<String>);
        let decline = |msg: &str| {
            asked.set(Some(msg.to_string()));
            false
        };
        let outcome = delete_sale(&state, "1", &decline).await.unwrap();

        assert_eq!(outcome, DeleteOutcome::Cancelled);
        assert_eq!(asked.take().as_deref(), Some(DELETE_PROMPT));
        assert_eq!(state.inner().store().version(), version);
        assert!(state.inner().store().contains(QueryKey::Sales).unwrap());
        assert_eq!(ids(&state).await, vec!["1", "2", "3"]);
    }
}
