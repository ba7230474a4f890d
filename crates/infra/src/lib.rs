//! Infrastructure layer: durable stores, seeding, configuration, and the
//! inventory engine that ties the domain to a store.

pub mod bootstrap;
pub mod config;
pub mod engine;
pub mod seed;
pub mod store;


pub use bootstrap::{open_backend, InventoryBackend, SharedBackend};
pub use config::{ConfigError, SkuConfig, StoreConfig};
pub use engine::{InventoryEngine, InventorySnapshot, SaleOutcome};
pub use store::{InMemoryInventoryStore, InventoryStore, SqliteInventoryStore, StoreError, StoreOp};
