//! Read-only aggregates derived from the catalog.
//!
//! All functions are pure; callers are responsible for handing in a
//! consistent snapshot.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::ItemCatalog;
use crate::item::Item;

/// Bucket name for items without a category.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Σ quantity × cost price. Zero for an empty catalog.
pub fn stock_valuation(catalog: &ItemCatalog) -> Decimal {
    catalog
        .iter()
        .fold(Decimal::ZERO, |acc, item| acc.saturating_add(item.stock_value()))
}

/// Items with quantity ≤ min stock, ascending by SKU.
pub fn low_stock_items(catalog: &ItemCatalog) -> Vec<Item> {
    catalog.iter().filter(|i| i.is_low_stock()).cloned().collect()
}

/// The stock report: how many items, what they are worth, what is running low.
///
/// Unit and value totals saturate instead of overflowing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockSummary {
    pub total_items: usize,
    pub total_units: i64,
    pub total_value: Decimal,
    pub low_stock: Vec<Item>,
}

impl StockSummary {
    pub fn from_catalog(catalog: &ItemCatalog) -> Self {
        Self {
            total_items: catalog.len(),
            total_units: catalog
                .iter()
                .fold(0i64, |acc, item| acc.saturating_add(item.quantity)),
            total_value: stock_valuation(catalog),
            low_stock: low_stock_items(catalog),
        }
    }
}

/// Per-category totals (the dashboard's value and units charts).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub category: String,
    pub item_count: usize,
    pub units: i64,
    pub value: Decimal,
}

/// Totals grouped by category, ordered by category name.
pub fn category_breakdown(catalog: &ItemCatalog) -> Vec<CategoryBreakdown> {
    let mut groups: BTreeMap<&str, CategoryBreakdown> = BTreeMap::new();

    for item in catalog.iter() {
        let category = item.category_or(UNCATEGORIZED);
        let entry = groups.entry(category).or_insert_with(|| CategoryBreakdown {
            category: category.to_string(),
            item_count: 0,
            units: 0,
            value: Decimal::ZERO,
        });
        entry.item_count += 1;
        entry.units = entry.units.saturating_add(item.quantity);
        entry.value = entry.value.saturating_add(item.stock_value());
    }

    groups.into_values().collect()
}
