use chrono::{DateTime, SubsecRound, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockledger_core::{DomainError, DomainResult, Sku};

use crate::item::{ensure_non_negative_price, Item};

/// A sale that has not yet been given a ledger position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleDraft {
    pub sku: Sku,
    pub name: String,
    pub category: Option<String>,
    pub quantity: i64,
    pub unit_price: Decimal,
    pub sold_at: DateTime<Utc>,
}

impl SaleDraft {
    /// Snapshot the item's name, category and sell price at the time of sale.
    pub fn for_item(item: &Item, quantity: i64, sold_at: DateTime<Utc>) -> Self {
        Self {
            sku: item.sku.clone(),
            name: item.name.clone(),
            category: item.category.clone(),
            quantity,
            unit_price: item.sell_price,
            sold_at,
        }
    }

    pub(crate) fn validate(&self) -> DomainResult<()> {
        if self.quantity <= 0 {
            return Err(DomainError::invalid(
                "quantity",
                format!("must be positive (got {})", self.quantity),
            ));
        }
        ensure_non_negative_price("unit_price", self.unit_price)
    }

    pub(crate) fn into_record(self, sequence: u64) -> SaleRecord {
        SaleRecord {
            sequence,
            sku: self.sku,
            name: self.name,
            category: self.category,
            quantity: self.quantity,
            unit_price: self.unit_price,
            sold_at: self.sold_at.trunc_subsecs(0),
        }
    }
}

/// An immutable entry of the sales ledger.
///
/// `name` and `category` are snapshots and survive deletion of the item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleRecord {
    /// Strictly increasing, never reused.
    pub sequence: u64,
    pub sku: Sku,
    pub name: String,
    pub category: Option<String>,
    pub quantity: i64,
    pub unit_price: Decimal,
    /// Second precision.
    pub sold_at: DateTime<Utc>,
}

impl SaleRecord {
    pub fn line_total(&self) -> Decimal {
        Decimal::from(self.quantity).saturating_mul(self.unit_price)
    }
}
