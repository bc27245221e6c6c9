//! # Sales Dashboard Library
//!
//! Orchestration layer of the Sales Manager: state, commands and the
//! demo harness behind the `sales-dashboard` binary.
//!
//! ## Module Organization
//! ```text
//! sales_dashboard/
//! ├── lib.rs          ◄─── You are here (startup & run)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── cache.rs    ◄─── SalesCache wrapper
//! │   └── config.rs   ◄─── dashboard.toml + SALES_* overrides
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── catalog.rs  ◄─── Composer reference data
//! │   └── sale.rs     ◄─── Create / edit / list / delete
//! ├── confirm.rs      ◄─── Yes/no prompt policies
//! └── error.rs        ◄─── API error type for commands
//! ```

pub mod commands;
pub mod confirm;
pub mod error;
pub mod state;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;
use tracing::{info, Subscriber};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use sales_cache::{QueryKey, SalesCache};
use sales_core::{DateRange, SaleSummary};

use commands::sale::{delete_sale, list_sales, DeleteOutcome};
use confirm::{AssumeYes, Confirm, TerminalConfirm};
use error::ApiError;
use state::{CacheState, ConfigState, DashboardConfig};

/// Command line of the demo harness.
#[derive(Debug, Parser)]
#[command(name = "sales-dashboard", about = "Print the sale list", long_about = None)]
pub struct Cli {
    /// First day shown (inclusive, YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Last day shown (inclusive, YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Path to dashboard.toml; defaults to the platform config directory
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Delete this sale id before printing the list again
    #[arg(long)]
    pub delete: Option<String>,

    /// Do not ask before deleting
    #[arg(long, short = 'y')]
    pub yes: bool,
}

/// Log filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,sales=debug";

impl Cli {
    /// Loads configuration. An explicit `--config` must load cleanly; the
    /// platform default falls back to built-in settings with a warning.
    pub fn load_config(&self) -> Result<DashboardConfig, ApiError> {
        match &self.config {
            Some(path) => Ok(DashboardConfig::load(Some(path.clone()))?),
            None => Ok(DashboardConfig::load_or_default(None)),
        }
    }

    /// The list filter, falling back to the configured default when no
    /// bound is given on the command line.
    pub fn range(&self, config: &DashboardConfig) -> DateRange {
        if self.from.is_none() && self.to.is_none() {
            config.default_range()
        } else {
            DateRange::new(self.from, self.to)
        }
    }
}

/// Runs the dashboard demo.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Application Startup                               │
/// │                                                                         │
/// │  1. Load Configuration ───────────────────────────────────────────────► │
/// │     • defaults → dashboard.toml → SALES_* environment                   │
/// │                                                                         │
/// │  2. Build State ──────────────────────────────────────────────────────► │
/// │     • CacheState: SalesCache over the mock services                     │
/// │                                                                         │
/// │  3. Prefetch ─────────────────────────────────────────────────────────► │
/// │     • users, products, sales concurrently                               │
/// │                                                                         │
/// │  4. Print the sale list (optionally delete one and print again) ──────► │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run(cli: Cli) -> Result<(), ApiError> {
    info!("Starting Sales Dashboard");

    let config: ConfigState = cli.load_config()?;
    let cache = CacheState::new(SalesCache::new(config.cache_config()));

    cache.inner().prefetch().await?;

    let range = cli.range(&config);
    print_list(&list_sales(&cache, &config, Some(range)).await?, &config);

    if let Some(sale_id) = cli.delete.as_deref() {
        let mut changes = cache.inner().store().subscribe(QueryKey::Sales);
        let confirm: &dyn Confirm = if cli.yes || config.confirm.assume_yes {
            &AssumeYes
        } else {
            &TerminalConfirm
        };

        let outcome = delete_sale(&cache, sale_id, confirm).await?;
        println!("{}", describe_outcome(sale_id, outcome));

        if let Some(change) = changes.try_changed() {
            info!(version = change.version, "Sale list changed, re-rendering");
            print_list(&list_sales(&cache, &config, Some(range)).await?, &config);
        }
    }

    Ok(())
}

fn print_list(summaries: &[SaleSummary], config: &DashboardConfig) {
    if summaries.is_empty() {
        println!("No sales in range");
        return;
    }
    for summary in summaries {
        println!("{}", render_summary(summary, config));
    }
}

/// One line of the sale list.
///
/// `Sale #001 | 14 October 2024 | Smartphone Pro (Samsung) x2 @ $1299.00 | total $2598.00`
pub fn render_summary(summary: &SaleSummary, config: &DashboardConfig) -> String {
    let item = match &summary.first_item {
        Some(item) => {
            let brand = item
                .brand
                .as_deref()
                .filter(|b| !b.is_empty())
                .map(|b| format!(" ({})", b))
                .unwrap_or_default();
            format!(
                "{}{} x{} @ {}",
                item.product,
                brand,
                item.quantity,
                config.format_money(item.unit_price)
            )
        }
        None => "(no items)".to_string(),
    };

    format!(
        "{} | {} | {} | total {}",
        summary.display_id,
        summary.formatted_date,
        item,
        config.format_money(summary.total)
    )
}

fn describe_outcome(sale_id: &str, outcome: DeleteOutcome) -> String {
    match outcome {
        DeleteOutcome::Deleted => format!("Deleted sale {}", sale_id),
        DeleteOutcome::Cancelled => "Deletion cancelled".to_string(),
        DeleteOutcome::NotFound => format!("No sale {}", sale_id),
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=sales_cache=trace` - Show cache hits and change events
/// - Default: INFO, DEBUG for the sales crates
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    log_subscriber(filter).init();
}

fn log_subscriber(filter: EnvFilter) -> impl Subscriber + Send + Sync + 'static {
    tracing_subscriber::fmt().with_env_filter(filter).finish()
}
