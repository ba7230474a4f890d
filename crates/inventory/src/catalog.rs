//! Item catalog: SKU → item, with invariant checks on every mutation.

use std::collections::BTreeMap;

use stockledger_core::{DomainError, DomainResult, Sku};

use crate::item::{ensure_non_negative, Item, NewItem};

/// In-memory item catalog.
///
/// Backed by a `BTreeMap`, so every listing is in ascending SKU order. That
/// order is part of the contract (reports and UIs rely on it).
#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    items: BTreeMap<Sku, Item>,
}

impl ItemCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from stored items, re-checking every invariant.
    pub fn from_items(items: impl IntoIterator<Item = Item>) -> DomainResult<Self> {
        let mut catalog = Self::new();
        for item in items {
            let cmd = NewItem {
                sku: item.sku,
                name: item.name,
                quantity: item.quantity,
                cost_price: item.cost_price,
                sell_price: item.sell_price,
                category: item.category,
                location: item.location,
                min_stock: item.min_stock,
            };
            catalog.create(cmd)?;
        }
        Ok(catalog)
    }

    /// Everything `create` checks, without inserting.
    pub fn check_create(&self, cmd: &NewItem) -> DomainResult<Item> {
        let item = cmd.validate()?;
        if self.items.contains_key(&item.sku) {
            return Err(DomainError::DuplicateSku(item.sku));
        }
        Ok(item)
    }

    pub fn create(&mut self, cmd: NewItem) -> DomainResult<Item> {
        let item = self.check_create(&cmd)?;
        self.items.insert(item.sku.clone(), item.clone());
        Ok(item)
    }

    pub fn get(&self, sku: &Sku) -> DomainResult<&Item> {
        self.items
            .get(sku)
            .ok_or_else(|| DomainError::NotFound(sku.clone()))
    }

    pub fn contains(&self, sku: &Sku) -> bool {
        self.items.contains_key(sku)
    }

    /// All items, ascending by SKU.
    pub fn list_all(&self) -> Vec<Item> {
        self.items.values().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    pub fn set_quantity(&mut self, sku: &Sku, quantity: i64) -> DomainResult<()> {
        ensure_non_negative("quantity", quantity)?;
        let item = self
            .items
            .get_mut(sku)
            .ok_or_else(|| DomainError::NotFound(sku.clone()))?;
        item.quantity = quantity;
        Ok(())
    }

    pub fn remove(&mut self, sku: &Sku) -> DomainResult<Item> {
        self.items
            .remove(sku)
            .ok_or_else(|| DomainError::NotFound(sku.clone()))
    }

    /// Case-insensitive substring match on SKU, name or category.
    ///
    /// A blank query matches everything.
    pub fn search(&self, query: &str) -> Vec<Item> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.list_all();
        }

        self.items
            .values()
            .filter(|item| {
                item.sku.as_str().to_lowercase().contains(&needle)
                    || item.name.to_lowercase().contains(&needle)
                    || item
                        .category
                        .as_deref()
                        .is_some_and(|c| c.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn sku(s: &str) -> Sku {
        Sku::new(s).unwrap()
    }

    fn new_item(s: &str, qty: i64) -> NewItem {
        NewItem::new(sku(s), format!("Item {s}"), qty, Decimal::ONE, Decimal::TWO)
    }

    #[test]
    fn created_item_is_retrievable_with_exact_fields() {
        let mut catalog = ItemCatalog::new();
        let cmd = new_item("UQ002", 30)
            .category("Clothing")
            .location("Shelf 2")
            .min_stock(5);
        let created = catalog.create(cmd).unwrap();

        let fetched = catalog.get(&sku("UQ002")).unwrap();
        assert_eq!(fetched, &created);
        assert_eq!(fetched.quantity, 30);
        assert_eq!(fetched.category.as_deref(), Some("Clothing"));
        assert_eq!(fetched.min_stock, 5);
    }

    #[test]
    fn list_all_is_ordered_by_sku() {
        let mut catalog = ItemCatalog::new();
        for s in ["UQ003", "A-9", "UQ001", "UQ010"] {
            catalog.create(new_item(s, 1)).unwrap();
        }
        let skus: Vec<String> = catalog
            .list_all()
            .into_iter()
            .map(|i| i.sku.to_string())
            .collect();
        assert_eq!(skus, vec!["A-9", "UQ001", "UQ003", "UQ010"]);
    }

    #[test]
    fn duplicate_sku_leaves_catalog_unchanged() {
        let mut catalog = ItemCatalog::new();
        catalog.create(new_item("UQ001", 5)).unwrap();

        let err = catalog.create(new_item("UQ001", 99)).unwrap_err();
        assert_eq!(err, DomainError::DuplicateSku(sku("UQ001")));
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(&sku("UQ001")).unwrap().quantity, 5);
    }

    #[test]
    fn invalid_item_is_not_inserted() {
        let mut catalog = ItemCatalog::new();
        assert!(catalog.create(new_item("UQ001", -1)).is_err());
        assert!(catalog.is_empty());
    }

    #[test]
    fn duplicate_names_are_allowed() {
        let mut catalog = ItemCatalog::new();
        let mut a = new_item("UQ001", 1);
        let mut b = new_item("UQ002", 1);
        a.name = "Chips".to_string();
        b.name = "Chips".to_string();
        catalog.create(a).unwrap();
        catalog.create(b).unwrap();
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn set_quantity_validates_and_requires_presence() {
        let mut catalog = ItemCatalog::new();
        catalog.create(new_item("UQ001", 5)).unwrap();

        catalog.set_quantity(&sku("UQ001"), 0).unwrap();
        assert_eq!(catalog.get(&sku("UQ001")).unwrap().quantity, 0);

        assert!(matches!(
            catalog.set_quantity(&sku("UQ001"), -1).unwrap_err(),
            DomainError::InvalidField { field: "quantity", .. }
        ));
        assert_eq!(
            catalog.set_quantity(&sku("NOPE"), 1).unwrap_err(),
            DomainError::NotFound(sku("NOPE"))
        );
    }

    #[test]
    fn remove_then_get_is_not_found() {
        let mut catalog = ItemCatalog::new();
        catalog.create(new_item("UQ001", 5)).unwrap();
        let removed = catalog.remove(&sku("UQ001")).unwrap();
        assert_eq!(removed.sku, sku("UQ001"));
        assert_eq!(
            catalog.get(&sku("UQ001")).unwrap_err(),
            DomainError::NotFound(sku("UQ001"))
        );
        assert!(catalog.remove(&sku("UQ001")).is_err());
    }

    #[test]
    fn search_matches_sku_name_and_category() {
        let mut catalog = ItemCatalog::new();
        let mut cable = new_item("UQ001", 1).category("Electronics");
        cable.name = "USB Cable".to_string();
        let mut shirt = new_item("UQ002", 1).category("Clothing");
        shirt.name = "T-Shirt".to_string();
        catalog.create(cable).unwrap();
        catalog.create(shirt).unwrap();

        assert_eq!(catalog.search("usb").len(), 1);
        assert_eq!(catalog.search("CLOTH")[0].sku, sku("UQ002"));
        assert_eq!(catalog.search("uq00").len(), 2);
        assert_eq!(catalog.search("  ").len(), 2);
        assert!(catalog.search("banana").is_empty());
    }

    #[test]
    fn from_items_rejects_duplicates() {
        let item = new_item("UQ001", 1).validate().unwrap();
        assert!(ItemCatalog::from_items(vec![item.clone(), item]).is_err());
    }
}
