use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockledger_auth::{Operation, Role};
use stockledger_core::{DomainResult, Sku};
use stockledger_inventory::NewItem;

// -------------------------
// Request DTOs
// -------------------------

/// Body of `POST /items`. Without a SKU the next allocated one is used.
#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    #[serde(default)]
    pub sku: Option<String>,
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

impl CreateItemRequest {
    /// Blank SKUs count as absent.
    pub fn requested_sku(&self) -> DomainResult<Option<Sku>> {
        match self.sku.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => Sku::new(raw).map(Some),
        }
    }

    pub fn into_new_item(self, sku: Sku) -> NewItem {
        NewItem {
            sku,
            name: self.name,
            quantity: self.quantity,
            cost_price: self.cost_price,
            sell_price: self.sell_price,
            category: self.category,
            location: self.location,
            min_stock: self.min_stock,
        }
    }
}

/// Body of `POST /items/:sku/restock` and `POST /items/:sku/sell`.
#[derive(Debug, Deserialize)]
pub struct QuantityRequest {
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: Option<String>,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct WhoAmIResponse {
    pub username: String,
    pub role: Role,
    pub permitted: Vec<Operation>,
}

#[derive(Debug, Serialize)]
pub struct RestockResponse {
    pub sku: Sku,
    pub quantity: i64,
}

#[derive(Debug, Serialize)]
pub struct ValuationResponse {
    pub total_value: Decimal,
}

#[derive(Debug, Serialize)]
pub struct NextSkuResponse {
    pub sku: Sku,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_defaults_optional_fields() {
        let req: CreateItemRequest = serde_json::from_value(serde_json::json!({
            "name": "Stapler",
            "quantity": 4,
            "cost_price": "2.50",
            "sell_price": "6.00"
        }))
        .unwrap();
        assert_eq!(req.requested_sku().unwrap(), None);
        assert_eq!(req.min_stock, 0);
        assert_eq!(req.cost_price, Decimal::new(250, 2));
    }

    #[test]
    fn blank_sku_is_absent() {
        let req: CreateItemRequest = serde_json::from_value(serde_json::json!({
            "sku": "  ",
            "name": "Stapler",
            "quantity": 4,
            "cost_price": 2.5,
            "sell_price": 6
        }))
        .unwrap();
        assert_eq!(req.requested_sku().unwrap(), None);
    }
}
