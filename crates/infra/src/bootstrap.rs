//! Pick and prepare the store described by [`StoreConfig`].

use std::sync::Arc;

use stockledger_auth::CredentialStore;

use crate::config::StoreConfig;
use crate::seed::{seed_if_empty, CredentialSeed};
use crate::store::{InMemoryInventoryStore, InventoryStore, SqliteInventoryStore, StoreError};

/// A store that also holds the credential rows.
pub trait InventoryBackend: InventoryStore + CredentialStore + CredentialSeed {}

impl<T> InventoryBackend for T where T: InventoryStore + CredentialStore + CredentialSeed {}

pub type SharedBackend = Arc<dyn InventoryBackend>;

/// Open the configured store and seed it if it has never been used.
pub fn open_backend(config: &StoreConfig) -> Result<SharedBackend, StoreError> {
    let backend: SharedBackend = match &config.database_url {
        Some(url) => Arc::new(SqliteInventoryStore::open(url, config.timeout)?),
        None => {
            tracing::warn!("no database configured; inventory will not survive a restart");
            Arc::new(InMemoryInventoryStore::new())
        }
    };

    seed_if_empty(&*backend)?;
    Ok(backend)
}
