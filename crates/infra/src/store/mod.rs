//! Persistence gateway: the durable mirror of the catalog and the ledger.
//!
//! The engine depends only on [`InventoryStore`]; the in-memory store backs
//! tests and dev runs, the SQLite store backs real deployments.

pub mod in_memory;
pub mod sqlite;
pub mod r#trait;

pub use in_memory::{InMemoryInventoryStore, StoreOp};
pub use sqlite::SqliteInventoryStore;
pub use r#trait::{InventoryStore, StoreError};
