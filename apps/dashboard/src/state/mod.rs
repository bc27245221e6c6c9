//! # State Module
//!
//! Application state shared by the dashboard commands.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │          ┌──────────────────┬──────────────────┐                       │
//! │          ▼                  ▼                  ▼                        │
//! │  ┌──────────────┐  ┌──────────────────┐  ┌──────────────────┐          │
//! │  │  CacheState  │  │   ConfigState    │  │  dyn Confirm     │          │
//! │  │              │  │                  │  │  (per call)      │          │
//! │  │  SalesCache  │  │  DashboardConfig │  │                  │          │
//! │  │  (Arc'd      │  │  (read-only)     │  │                  │          │
//! │  │   store)     │  │                  │  │                  │          │
//! │  └──────────────┘  └──────────────────┘  └──────────────────┘          │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • CacheState: RwLock inside the store, never held across .await       │
//! │  • ConfigState: Read-only after initialization                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cache;
pub mod config;

pub use cache::CacheState;
pub use config::DashboardConfig;

/// Configuration is read-only once loaded.
pub type ConfigState = DashboardConfig;
