use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use stockledger_core::{DomainError, Sku};
use stockledger_inventory::{Item, SaleRecord};

/// Durable store operation error.
///
/// These are infrastructure failures (IO, timeouts, corrupt rows) as opposed
/// to business outcomes, which never reach the store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("store operation timed out after {0:?}")]
    Timeout(Duration),

    #[error("corrupt stored record: {0}")]
    Corrupt(String),

    #[error("sale sequence {0} is already recorded")]
    DuplicateSequence(u64),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The sale write failed and restoring the item afterwards failed too, so
    /// the store now holds the decremented quantity without its sale record.
    #[error("sale write failed ({cause}) and restoring item '{sku}' also failed ({restore})")]
    RollbackFailed {
        sku: Sku,
        cause: Box<StoreError>,
        restore: Box<StoreError>,
    },
}

impl From<StoreError> for DomainError {
    fn from(value: StoreError) -> Self {
        DomainError::persistence(value.to_string())
    }
}

/// Durable mirror of the catalog and the sales ledger.
///
/// Every call is synchronous and either fully succeeds or reports a failure;
/// the engine treats any failure as fatal for the operation in flight.
pub trait InventoryStore: Send + Sync {
    fn load_all_items(&self) -> Result<Vec<Item>, StoreError>;

    fn load_all_sales(&self) -> Result<Vec<SaleRecord>, StoreError>;

    /// Insert or replace the item stored under `item.sku`.
    fn upsert_item(&self, item: &Item) -> Result<(), StoreError>;

    /// Remove the item. Missing SKUs are not an error.
    fn delete_item(&self, sku: &Sku) -> Result<(), StoreError>;

    /// Append a sale record. A sequence number already present is rejected.
    fn append_sale(&self, sale: &SaleRecord) -> Result<(), StoreError>;

    /// Persist a sale together with the decremented item.
    ///
    /// Either both writes land or neither does. The default writes the item,
    /// then the sale, and puts `previous` back if the sale write fails.
    /// Stores with real transactions should override this.
    fn commit_sale(
        &self,
        previous: &Item,
        updated: &Item,
        sale: &SaleRecord,
    ) -> Result<(), StoreError> {
        self.upsert_item(updated)?;

        if let Err(cause) = self.append_sale(sale) {
            tracing::warn!(sku = %sale.sku, sequence = sale.sequence, error = %cause, "sale write failed; restoring item");
            return match self.upsert_item(previous) {
                Ok(()) => Err(cause),
                Err(restore) => {
                    tracing::error!(sku = %sale.sku, error = %restore, "failed to restore item after sale write failure");
                    Err(StoreError::RollbackFailed {
                        sku: sale.sku.clone(),
                        cause: Box::new(cause),
                        restore: Box::new(restore),
                    })
                }
            };
        }

        Ok(())
    }
}

impl<S> InventoryStore for Arc<S>
where
    S: InventoryStore + ?Sized,
{
    fn load_all_items(&self) -> Result<Vec<Item>, StoreError> {
        (**self).load_all_items()
    }

    fn load_all_sales(&self) -> Result<Vec<SaleRecord>, StoreError> {
        (**self).load_all_sales()
    }

    fn upsert_item(&self, item: &Item) -> Result<(), StoreError> {
        (**self).upsert_item(item)
    }

    fn delete_item(&self, sku: &Sku) -> Result<(), StoreError> {
        (**self).delete_item(sku)
    }

    fn append_sale(&self, sale: &SaleRecord) -> Result<(), StoreError> {
        (**self).append_sale(sale)
    }

    fn commit_sale(
        &self,
        previous: &Item,
        updated: &Item,
        sale: &SaleRecord,
    ) -> Result<(), StoreError> {
        (**self).commit_sale(previous, updated, sale)
    }
}
