//! Inventory engine: the only entry point that mutates inventory state.
//!
//! Every operation runs the same pipeline:
//!
//! ```text
//! (role, args)
//!   ↓
//! 1. Authorize against the role policy (denial touches nothing)
//!   ↓
//! 2. Take the per-SKU lock (mutations only)
//!   ↓
//! 3. Read + validate against the in-memory books
//!   ↓
//! 4. Persist through the store (failure aborts; memory untouched)
//!   ↓
//! 5. Apply to the in-memory books under a short write lock
//! ```
//!
//! Operations on different SKUs run in parallel; operations on the same SKU
//! are serialized for their whole read-validate-persist-apply sequence.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use stockledger_auth::{authorize, Operation, Role};
use stockledger_core::{DomainError, DomainResult, Sku};
use stockledger_inventory::reports::{self, CategoryBreakdown, StockSummary};
use stockledger_inventory::{Item, ItemCatalog, NewItem, SaleDraft, SaleRecord, SalesLedger};

use crate::store::{InventoryStore, StoreError};

/// Result of a successful sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleOutcome {
    pub remaining_quantity: i64,
    pub sale: SaleRecord,
}

/// Items and sales read under one lock: every recorded sale is already
/// reflected in the item quantities, and no quantity is decremented without
/// its record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySnapshot {
    pub items: Vec<Item>,
    pub sales: Vec<SaleRecord>,
}

#[derive(Debug, Default)]
struct Books {
    catalog: ItemCatalog,
    ledger: SalesLedger,
}

pub struct InventoryEngine<S> {
    store: S,
    books: RwLock<Books>,
    sku_locks: Mutex<HashMap<Sku, Arc<Mutex<()>>>>,
}

impl<S> std::fmt::Debug for InventoryEngine<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InventoryEngine").finish_non_exhaustive()
    }
}

fn poisoned<T>(what: &str) -> impl FnOnce(PoisonError<T>) -> DomainError + '_ {
    move |_| DomainError::persistence(format!("{what} lock poisoned"))
}

fn persisted<T>(op: &'static str, res: Result<T, StoreError>) -> DomainResult<T> {
    res.map_err(|err| {
        tracing::error!(op, error = %err, "store write failed; operation not applied");
        err.into()
    })
}

impl<S> InventoryEngine<S>
where
    S: InventoryStore,
{
    /// Load every item and sale from `store` and rebuild the books.
    #[instrument(skip_all)]
    pub fn open(store: S) -> DomainResult<Self> {
        let items = store.load_all_items()?;
        let sales = store.load_all_sales()?;

        let catalog = ItemCatalog::from_items(items)
            .map_err(|e| DomainError::persistence(format!("stored items are inconsistent: {e}")))?;
        let ledger = SalesLedger::from_records(sales)?;

        info!(items = catalog.len(), sales = ledger.len(), "inventory loaded");

        Ok(Self {
            store,
            books: RwLock::new(Books { catalog, ledger }),
            sku_locks: Mutex::new(HashMap::new()),
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn read(&self) -> DomainResult<RwLockReadGuard<'_, Books>> {
        self.books.read().map_err(poisoned("books"))
    }

    fn write(&self) -> DomainResult<RwLockWriteGuard<'_, Books>> {
        self.books.write().map_err(poisoned("books"))
    }

    fn sku_lock(&self, sku: &Sku) -> DomainResult<Arc<Mutex<()>>> {
        let mut locks = self.sku_locks.lock().map_err(poisoned("sku table"))?;
        Ok(locks.entry(sku.clone()).or_default().clone())
    }

    #[instrument(skip(self, new_item), fields(sku = %new_item.sku))]
    pub fn create_item(&self, role: Role, new_item: NewItem) -> DomainResult<Item> {
        authorize(role, Operation::CreateItem)?;

        let lock = self.sku_lock(&new_item.sku)?;
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let item = self.read()?.catalog.check_create(&new_item)?;
        persisted("create_item", self.store.upsert_item(&item))?;
        let created = self.write()?.catalog.create(new_item)?;

        info!(quantity = created.quantity, "item created");
        Ok(created)
    }

    /// Add `add_qty` units. Returns the new on-hand quantity.
    #[instrument(skip(self))]
    pub fn restock(&self, role: Role, sku: &Sku, add_qty: i64) -> DomainResult<i64> {
        authorize(role, Operation::Restock)?;
        if add_qty <= 0 {
            return Err(DomainError::invalid(
                "quantity",
                format!("restock amount must be positive (got {add_qty})"),
            ));
        }

        let lock = self.sku_lock(sku)?;
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let current = self.read()?.catalog.get(sku)?.clone();
        let quantity = current
            .quantity
            .checked_add(add_qty)
            .ok_or_else(|| DomainError::invalid("quantity", "restock would overflow"))?;
        let updated = current.with_quantity(quantity)?;

        persisted("restock", self.store.upsert_item(&updated))?;
        self.write()?.catalog.set_quantity(sku, quantity)?;

        info!(quantity, "item restocked");
        Ok(quantity)
    }

    /// Sell `qty` units at the item's current sell price.
    ///
    /// The decrement and the sale record are persisted as one unit through
    /// [`InventoryStore::commit_sale`]; on failure neither is applied.
    #[instrument(skip(self))]
    pub fn sell(
        &self,
        role: Role,
        sku: &Sku,
        qty: i64,
        now: DateTime<Utc>,
    ) -> DomainResult<SaleOutcome> {
        authorize(role, Operation::Sell)?;
        if qty <= 0 {
            return Err(DomainError::invalid(
                "quantity",
                format!("sale quantity must be positive (got {qty})"),
            ));
        }

        let lock = self.sku_lock(sku)?;
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let (current, record) = {
            let mut books = self.write()?;
            let current = books.catalog.get(sku)?.clone();
            if qty > current.quantity {
                warn!(requested = qty, available = current.quantity, "insufficient stock");
                return Err(DomainError::InsufficientStock {
                    sku: sku.clone(),
                    requested: qty,
                    available: current.quantity,
                });
            }
            let record = books
                .ledger
                .reserve(SaleDraft::for_item(&current, qty, now))?;
            (current, record)
        };

        let updated = current.with_quantity(current.quantity - qty)?;
        persisted("sell", self.store.commit_sale(&current, &updated, &record))?;

        {
            let mut books = self.write()?;
            books.catalog.set_quantity(sku, updated.quantity)?;
            books.ledger.commit(record.clone());
        }

        info!(sequence = record.sequence, remaining = updated.quantity, "sale recorded");
        Ok(SaleOutcome {
            remaining_quantity: updated.quantity,
            sale: record,
        })
    }

    /// Remove the item. Its sale records stay in the ledger.
    #[instrument(skip(self))]
    pub fn delete_item(&self, role: Role, sku: &Sku) -> DomainResult<()> {
        authorize(role, Operation::DeleteItem)?;

        let lock = self.sku_lock(sku)?;
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        self.read()?.catalog.get(sku)?;
        persisted("delete_item", self.store.delete_item(sku))?;
        self.write()?.catalog.remove(sku)?;

        info!("item deleted");
        Ok(())
    }

    pub fn get_item(&self, sku: &Sku) -> DomainResult<Item> {
        self.read()?.catalog.get(sku).cloned()
    }

    /// All items, ascending by SKU.
    pub fn list_items(&self) -> DomainResult<Vec<Item>> {
        Ok(self.read()?.catalog.list_all())
    }

    pub fn search_items(&self, query: &str) -> DomainResult<Vec<Item>> {
        Ok(self.read()?.catalog.search(query))
    }

    /// Items at or below their minimum stock, ascending by SKU.
    pub fn low_stock_items(&self) -> DomainResult<Vec<Item>> {
        Ok(reports::low_stock_items(&self.read()?.catalog))
    }

    #[instrument(skip(self))]
    pub fn stock_valuation(&self, role: Role) -> DomainResult<Decimal> {
        authorize(role, Operation::ViewReports)?;
        Ok(reports::stock_valuation(&self.read()?.catalog))
    }

    #[instrument(skip(self))]
    pub fn stock_summary(&self, role: Role) -> DomainResult<StockSummary> {
        authorize(role, Operation::ViewReports)?;
        Ok(StockSummary::from_catalog(&self.read()?.catalog))
    }

    #[instrument(skip(self))]
    pub fn category_breakdown(&self, role: Role) -> DomainResult<Vec<CategoryBreakdown>> {
        authorize(role, Operation::ViewReports)?;
        Ok(reports::category_breakdown(&self.read()?.catalog))
    }

    /// Every sale, most recent first.
    #[instrument(skip(self))]
    pub fn sales_history(&self, role: Role) -> DomainResult<Vec<SaleRecord>> {
        authorize(role, Operation::ViewReports)?;
        Ok(self.read()?.ledger.list_all())
    }

    /// Catalog and ledger together, from the same point in time.
    #[instrument(skip(self))]
    pub fn snapshot(&self, role: Role) -> DomainResult<InventorySnapshot> {
        authorize(role, Operation::ViewReports)?;
        let books = self.read()?;
        Ok(InventorySnapshot {
            items: books.catalog.list_all(),
            sales: books.ledger.list_all(),
        })
    }

    /// One SKU's sales, most recent first. Works for deleted items too.
    #[instrument(skip(self))]
    pub fn sales_for_sku(&self, role: Role, sku: &Sku) -> DomainResult<Vec<SaleRecord>> {
        authorize(role, Operation::ViewReports)?;
        Ok(self.read()?.ledger.for_sku(sku))
    }
}
