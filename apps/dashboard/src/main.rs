//! # Sales Dashboard Entry Point
//!
//! Demonstration harness: loads configuration, warms the cache, prints the
//! sale list for an optional date range and exits.
//!
//! ```text
//! sales-dashboard --from 2024-10-10 --to 2024-10-13
//! Sale #002 | 12 October 2024 | Notebook Air 13" (Apple) x1 @ $1899.00 | total $1899.00
//! ```

use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use sales_dashboard::{init_tracing, run, Cli};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", e.message);
            ExitCode::FAILURE
        }
    }
}
