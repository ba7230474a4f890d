use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, RwLock};

use stockledger_auth::{verify_password, CredentialStore, Role, SeedCredential};
use stockledger_core::Sku;
use stockledger_inventory::{Item, SaleRecord};

use super::r#trait::{InventoryStore, StoreError};
use crate::seed::CredentialSeed;

/// Store operations that can be made to fail on purpose.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum StoreOp {
    LoadItems,
    LoadSales,
    UpsertItem,
    DeleteItem,
    AppendSale,
}

#[derive(Debug, Default)]
struct Tables {
    items: BTreeMap<Sku, Item>,
    sales: BTreeMap<u64, SaleRecord>,
}

/// In-memory inventory store.
///
/// Intended for tests/dev. Nothing survives the process. Failures can be
/// injected per operation to exercise the engine's error paths.
#[derive(Debug, Default)]
pub struct InMemoryInventoryStore {
    tables: RwLock<Tables>,
    credentials: RwLock<HashMap<String, (String, Role)>>,
    /// Remaining forced failures per operation (`u32::MAX` = always).
    failures: Mutex<HashMap<StoreOp, u32>>,
}

impl InMemoryInventoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next call of `op` fail.
    pub fn fail_next(&self, op: StoreOp) {
        self.fail_times(op, 1);
    }

    /// Make every call of `op` fail until [`heal`](Self::heal) is called.
    pub fn fail_always(&self, op: StoreOp) {
        self.fail_times(op, u32::MAX);
    }

    pub fn heal(&self) {
        if let Ok(mut failures) = self.failures.lock() {
            failures.clear();
        }
    }

    fn fail_times(&self, op: StoreOp, times: u32) {
        if let Ok(mut failures) = self.failures.lock() {
            failures.insert(op, times);
        }
    }

    fn check(&self, op: StoreOp) -> Result<(), StoreError> {
        let mut failures = self
            .failures
            .lock()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;

        match failures.get_mut(&op) {
            Some(0) | None => Ok(()),
            Some(remaining) => {
                if *remaining != u32::MAX {
                    *remaining -= 1;
                }
                Err(StoreError::Unavailable(format!("injected failure on {op:?}")))
            }
        }
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Tables>, StoreError> {
        self.tables
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Tables>, StoreError> {
        self.tables
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))
    }
}

impl InventoryStore for InMemoryInventoryStore {
    fn load_all_items(&self) -> Result<Vec<Item>, StoreError> {
        self.check(StoreOp::LoadItems)?;
        Ok(self.read()?.items.values().cloned().collect())
    }

    fn load_all_sales(&self) -> Result<Vec<SaleRecord>, StoreError> {
        self.check(StoreOp::LoadSales)?;
        Ok(self.read()?.sales.values().cloned().collect())
    }

    fn upsert_item(&self, item: &Item) -> Result<(), StoreError> {
        self.check(StoreOp::UpsertItem)?;
        self.write()?.items.insert(item.sku.clone(), item.clone());
        Ok(())
    }

    fn delete_item(&self, sku: &Sku) -> Result<(), StoreError> {
        self.check(StoreOp::DeleteItem)?;
        self.write()?.items.remove(sku);
        Ok(())
    }

    fn append_sale(&self, sale: &SaleRecord) -> Result<(), StoreError> {
        self.check(StoreOp::AppendSale)?;
        let mut tables = self.write()?;
        if tables.sales.contains_key(&sale.sequence) {
            return Err(StoreError::DuplicateSequence(sale.sequence));
        }
        tables.sales.insert(sale.sequence, sale.clone());
        Ok(())
    }
}

impl CredentialSeed for InMemoryInventoryStore {
    fn seed_credentials(&self, seeds: &[SeedCredential]) -> Result<bool, StoreError> {
        let mut credentials = self
            .credentials
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;
        if !credentials.is_empty() {
            return Ok(false);
        }
        for seed in seeds {
            credentials.insert(seed.username.to_string(), (seed.password_digest(), seed.role));
        }
        Ok(true)
    }
}

impl CredentialStore for InMemoryInventoryStore {
    fn authenticate(&self, username: &str, password: &str) -> Option<Role> {
        let credentials = self.credentials.read().ok()?;
        let (digest, role) = credentials.get(username)?;
        verify_password(password, digest).then_some(*role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use stockledger_inventory::NewItem;

    fn item(sku: &str, qty: i64) -> Item {
        NewItem::new(Sku::new(sku).unwrap(), "Widget", qty, Decimal::ONE, Decimal::TWO)
            .validate()
            .unwrap()
    }

    fn sale(sequence: u64, sku: &str) -> SaleRecord {
        SaleRecord {
            sequence,
            sku: Sku::new(sku).unwrap(),
            name: "Widget".to_string(),
            category: None,
            quantity: 1,
            unit_price: Decimal::TWO,
            sold_at: Utc::now(),
        }
    }

    #[test]
    fn upsert_replaces_and_loads_in_sku_order() {
        let store = InMemoryInventoryStore::new();
        store.upsert_item(&item("B", 1)).unwrap();
        store.upsert_item(&item("A", 1)).unwrap();
        store.upsert_item(&item("B", 7)).unwrap();

        let items = store.load_all_items().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].sku.as_str(), "A");
        assert_eq!(items[1].quantity, 7);
    }

    #[test]
    fn append_sale_rejects_reused_sequence() {
        let store = InMemoryInventoryStore::new();
        store.append_sale(&sale(1, "A")).unwrap();
        assert!(matches!(
            store.append_sale(&sale(1, "B")),
            Err(StoreError::DuplicateSequence(1))
        ));
        assert_eq!(store.load_all_sales().unwrap().len(), 1);
    }

    #[test]
    fn injected_failure_fires_once() {
        let store = InMemoryInventoryStore::new();
        store.fail_next(StoreOp::UpsertItem);
        assert!(store.upsert_item(&item("A", 1)).is_err());
        assert!(store.upsert_item(&item("A", 1)).is_ok());
    }

    #[test]
    fn default_commit_sale_restores_item_when_sale_write_fails() {
        let store = InMemoryInventoryStore::new();
        let before = item("A", 10);
        store.upsert_item(&before).unwrap();
        store.fail_next(StoreOp::AppendSale);

        let after = before.with_quantity(7).unwrap();
        assert!(store.commit_sale(&before, &after, &sale(1, "A")).is_err());

        assert_eq!(store.load_all_items().unwrap()[0].quantity, 10);
        assert!(store.load_all_sales().unwrap().is_empty());
    }

    /// Accepts the first item write, then fails everything.
    struct FailsAfterFirstUpsert {
        inner: InMemoryInventoryStore,
        upserts: std::sync::atomic::AtomicU32,
    }

    impl InventoryStore for FailsAfterFirstUpsert {
        fn load_all_items(&self) -> Result<Vec<Item>, StoreError> {
            self.inner.load_all_items()
        }
        fn load_all_sales(&self) -> Result<Vec<SaleRecord>, StoreError> {
            self.inner.load_all_sales()
        }
        fn upsert_item(&self, item: &Item) -> Result<(), StoreError> {
            if self.upserts.fetch_add(1, std::sync::atomic::Ordering::SeqCst) > 0 {
                return Err(StoreError::Unavailable("disk full".to_string()));
            }
            self.inner.upsert_item(item)
        }
        fn delete_item(&self, sku: &Sku) -> Result<(), StoreError> {
            self.inner.delete_item(sku)
        }
        fn append_sale(&self, _sale: &SaleRecord) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("disk full".to_string()))
        }
    }

    #[test]
    fn failed_restore_is_reported_as_rollback_failure() {
        let store = FailsAfterFirstUpsert {
            inner: InMemoryInventoryStore::new(),
            upserts: std::sync::atomic::AtomicU32::new(0),
        };
        let before = item("A", 10);
        let after = before.with_quantity(7).unwrap();

        let err = store.commit_sale(&before, &after, &sale(1, "A")).unwrap_err();
        assert!(matches!(err, StoreError::RollbackFailed { .. }));
        assert_eq!(store.load_all_items().unwrap()[0].quantity, 7);
    }

    #[test]
    fn credentials_seed_once_and_authenticate() {
        let store = InMemoryInventoryStore::new();
        assert!(store.seed_credentials(&SeedCredential::DEFAULTS).unwrap());
        assert!(!store.seed_credentials(&SeedCredential::DEFAULTS).unwrap());

        assert_eq!(store.authenticate("admin", "admin123"), Some(Role::Admin));
        assert_eq!(store.authenticate("staff", "staff123"), Some(Role::Staff));
        assert_eq!(store.authenticate("staff", "wrong"), None);
        assert_eq!(store.authenticate("nobody", "admin123"), None);
    }
}
