//! First-start sample data: three items and one account per role.

use rust_decimal::Decimal;

use stockledger_auth::SeedCredential;
use stockledger_core::{DomainResult, Sku};
use stockledger_inventory::{Item, NewItem};

use crate::store::{InventoryStore, StoreError};

/// Stores that keep credential rows next to the inventory.
pub trait CredentialSeed {
    /// Write `seeds` unless credentials already exist. Returns whether
    /// anything was written.
    fn seed_credentials(&self, seeds: &[SeedCredential]) -> Result<bool, StoreError>;
}

/// What [`seed_if_empty`] wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeedReport {
    pub items: bool,
    pub credentials: bool,
}

pub fn sample_items() -> DomainResult<Vec<Item>> {
    let rows = [
        ("UQ001", "USB Cable", 120, Decimal::new(15, 1), Decimal::new(35, 1), "Electronics", "Shelf 1", 10),
        ("UQ002", "T-Shirt", 30, Decimal::new(50, 1), Decimal::new(120, 1), "Clothing", "Shelf 2", 5),
        ("UQ003", "Chips", 200, Decimal::new(5, 1), Decimal::new(12, 1), "Food", "Warehouse A", 20),
    ];

    rows.into_iter()
        .map(|(sku, name, qty, cost, sell, category, location, min_stock)| {
            NewItem::new(Sku::new(sku)?, name, qty, cost, sell)
                .category(category)
                .location(location)
                .min_stock(min_stock)
                .validate()
        })
        .collect()
}

/// Seed a never-used store.
///
/// Items are written only when the store holds neither items nor sales, so a
/// store whose items were all deleted is not re-seeded. Credentials are
/// written only when none exist.
pub fn seed_if_empty<S>(store: &S) -> Result<SeedReport, StoreError>
where
    S: InventoryStore + CredentialSeed + ?Sized,
{
    let mut report = SeedReport::default();

    if store.load_all_items()?.is_empty() && store.load_all_sales()?.is_empty() {
        let items = sample_items().map_err(|e| StoreError::Corrupt(e.to_string()))?;
        for item in &items {
            store.upsert_item(item)?;
        }
        report.items = true;
    }

    report.credentials = store.seed_credentials(&SeedCredential::DEFAULTS)?;

    if report.items || report.credentials {
        tracing::info!(items = report.items, credentials = report.credentials, "seeded empty store");
    }
    Ok(report)
}
