//! Service wiring: store → engine, plus SKU allocation.
//!
//! The engine and the stores are synchronous (the SQLite store drives its own
//! runtime), so handlers reach them through [`blocking`].

use std::sync::Arc;

use anyhow::Context;

use stockledger_auth::{authorize, CredentialStore, Operation, Role};
use stockledger_core::{DomainResult, Sku};
use stockledger_infra::{open_backend, InventoryEngine, SharedBackend, SkuConfig, StoreConfig};
use stockledger_inventory::{Item, SkuAllocator};

use crate::app::dto::CreateItemRequest;
use crate::app::errors::ApiError;

pub struct AppServices {
    engine: InventoryEngine<SharedBackend>,
    skus: SkuAllocator,
}

impl std::fmt::Debug for AppServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppServices").field("skus", &self.skus).finish_non_exhaustive()
    }
}

impl AppServices {
    /// Load the engine from `backend` and continue SKU numbering after the
    /// highest stored SKU.
    pub fn open(backend: SharedBackend, sku: &SkuConfig) -> DomainResult<Self> {
        let engine = InventoryEngine::open(backend)?;
        let existing = engine.list_items()?;
        let skus = SkuAllocator::seeded_from(sku.prefix.clone(), sku.width, existing.iter().map(|i| &i.sku));
        Ok(Self { engine, skus })
    }

    pub fn engine(&self) -> &InventoryEngine<SharedBackend> {
        &self.engine
    }

    pub fn credentials(&self) -> Arc<dyn CredentialStore> {
        Arc::new(self.engine.store().clone())
    }

    /// Create an item, allocating a SKU when the request has none.
    pub fn create_item(&self, role: Role, req: CreateItemRequest) -> DomainResult<Item> {
        authorize(role, Operation::CreateItem)?;
        let sku = match req.requested_sku()? {
            Some(sku) => sku,
            None => self.skus.next_sku()?,
        };

        let item = self.engine.create_item(role, req.into_new_item(sku))?;
        self.skus.observe(&item.sku);
        Ok(item)
    }

    /// The SKU the next allocation would produce.
    pub fn next_sku(&self, role: Role) -> DomainResult<Sku> {
        authorize(role, Operation::CreateItem)?;
        self.skus.peek()
    }
}

/// Open the configured store and load the services. Blocks; call it off the
/// async workers.
pub fn bootstrap(store: &StoreConfig, sku: &SkuConfig) -> anyhow::Result<AppServices> {
    let backend = open_backend(store).context("failed to open inventory store")?;
    AppServices::open(backend, sku).context("failed to load inventory")
}

/// Run synchronous service work on the blocking pool.
pub async fn blocking<T, F>(services: &Arc<AppServices>, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&AppServices) -> DomainResult<T> + Send + 'static,
    T: Send + 'static,
{
    let services = services.clone();
    tokio::task::spawn_blocking(move || f(&services))
        .await
        .map_err(|e| ApiError::Internal(format!("blocking task failed: {e}")))?
        .map_err(ApiError::from)
}
