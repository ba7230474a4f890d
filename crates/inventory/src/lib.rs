//! Inventory domain module.
//!
//! This crate contains business rules for the item catalog and the sales
//! ledger, implemented purely as deterministic domain logic (no IO, no HTTP,
//! no storage).

pub mod catalog;
pub mod item;
pub mod ledger;
pub mod reports;
pub mod sale;
pub mod sku;

pub use catalog::ItemCatalog;
pub use item::{Item, NewItem};
pub use ledger::SalesLedger;
pub use reports::{CategoryBreakdown, StockSummary, UNCATEGORIZED};
pub use sale::{SaleDraft, SaleRecord};
pub use sku::SkuAllocator;
