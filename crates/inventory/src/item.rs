use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockledger_core::{DomainError, DomainResult, Sku};

/// A stocked item, keyed by SKU.
///
/// Invariants (enforced by [`NewItem::validate`] and the catalog):
/// - `name` is non-empty
/// - `quantity`, `min_stock` are never negative
/// - `cost_price`, `sell_price` are never negative
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub sku: Sku,
    pub name: String,
    pub quantity: i64,
    pub cost_price: Decimal,
    pub sell_price: Decimal,
    pub category: Option<String>,
    pub location: Option<String>,
    pub min_stock: i64,
}

impl Item {
    /// Low stock: on-hand quantity at or below the threshold.
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.min_stock
    }

    /// `quantity × cost_price`.
    pub fn stock_value(&self) -> Decimal {
        Decimal::from(self.quantity).saturating_mul(self.cost_price)
    }

    pub fn category_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.category.as_deref().unwrap_or(fallback)
    }

    /// Copy of this item with a different on-hand quantity.
    pub fn with_quantity(&self, quantity: i64) -> DomainResult<Item> {
        ensure_non_negative("quantity", quantity)?;
        Ok(Item {
            quantity,
            ..self.clone()
        })
    }
}

/// Input for creating an item (the caller-supplied fields).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItem {
    pub sku: Sku,
    pub name: String,
    pub quantity: i64,
    pub cost_price: Decimal,
    pub sell_price: Decimal,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub min_stock: i64,
}

impl NewItem {
    /// Minimal constructor; optional fields default to empty / zero.
    pub fn new(
        sku: Sku,
        name: impl Into<String>,
        quantity: i64,
        cost_price: Decimal,
        sell_price: Decimal,
    ) -> Self {
        Self {
            sku,
            name: name.into(),
            quantity,
            cost_price,
            sell_price,
            category: None,
            location: None,
            min_stock: 0,
        }
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn min_stock(mut self, min_stock: i64) -> Self {
        self.min_stock = min_stock;
        self
    }

    /// Check every field constraint and produce the item record.
    ///
    /// Blank optional text is normalized to `None`; the name is trimmed.
    pub fn validate(&self) -> DomainResult<Item> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(DomainError::invalid("name", "cannot be empty"));
        }
        ensure_non_negative("quantity", self.quantity)?;
        ensure_non_negative_price("cost_price", self.cost_price)?;
        ensure_non_negative_price("sell_price", self.sell_price)?;
        ensure_non_negative("min_stock", self.min_stock)?;

        Ok(Item {
            sku: self.sku.clone(),
            name: name.to_string(),
            quantity: self.quantity,
            cost_price: self.cost_price,
            sell_price: self.sell_price,
            category: normalize_text(self.category.as_deref()),
            location: normalize_text(self.location.as_deref()),
            min_stock: self.min_stock,
        })
    }
}

pub(crate) fn ensure_non_negative(field: &'static str, value: i64) -> DomainResult<()> {
    if value < 0 {
        return Err(DomainError::invalid(field, format!("must not be negative (got {value})")));
    }
    Ok(())
}

pub(crate) fn ensure_non_negative_price(field: &'static str, value: Decimal) -> DomainResult<()> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(DomainError::invalid(field, format!("must not be negative (got {value})")));
    }
    Ok(())
}

fn normalize_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
