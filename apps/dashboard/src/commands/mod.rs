//! # Commands Module
//!
//! Every action the dashboard screens can trigger.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports)
//! ├── catalog.rs  ◄─── Users and products for the composer
//! └── sale.rs     ◄─── Create, edit, list, delete
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  Screen event (Save, Delete, date filter change)                        │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  async fn delete_sale(                                                  │
//! │      cache: &CacheState,      ◄── Shared state                          │
//! │      sale_id: &str,           ◄── From the event                        │
//! │      confirm: &dyn Confirm,   ◄── Prompt policy                         │
//! │  ) -> Result<DeleteOutcome, ApiError>                                   │
//! │         │                                                               │
//! │         │ (JSON serialization)                                          │
//! │         ▼                                                               │
//! │  Screen re-renders from the cache subscription                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each command declares only the state it needs.

pub mod catalog;
pub mod sale;
