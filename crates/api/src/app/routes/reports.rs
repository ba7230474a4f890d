use std::sync::Arc;

use axum::{extract::Extension, routing::get, Json, Router};

use stockledger_infra::InventorySnapshot;
use stockledger_inventory::{CategoryBreakdown, Item, SaleRecord, StockSummary};

use crate::app::dto::ValuationResponse;
use crate::app::errors::ApiError;
use crate::app::services::{blocking, AppServices};
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/valuation", get(valuation))
        .route("/low-stock", get(low_stock))
        .route("/summary", get(summary))
        .route("/sales", get(sales_history))
        .route("/categories", get(categories))
        .route("/snapshot", get(snapshot))
}

pub async fn valuation(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> Result<Json<ValuationResponse>, ApiError> {
    let role = principal.role();
    let total_value = blocking(&services, move |s| s.engine().stock_valuation(role)).await?;
    Ok(Json(ValuationResponse { total_value }))
}

/// Not role-gated: every signed-in user sees low-stock alerts.
pub async fn low_stock(
    Extension(services): Extension<Arc<AppServices>>,
) -> Result<Json<Vec<Item>>, ApiError> {
    let items = blocking(&services, |s| s.engine().low_stock_items()).await?;
    Ok(Json(items))
}

pub async fn summary(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> Result<Json<StockSummary>, ApiError> {
    let role = principal.role();
    Ok(Json(blocking(&services, move |s| s.engine().stock_summary(role)).await?))
}

pub async fn sales_history(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> Result<Json<Vec<SaleRecord>>, ApiError> {
    let role = principal.role();
    Ok(Json(blocking(&services, move |s| s.engine().sales_history(role)).await?))
}

pub async fn categories(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> Result<Json<Vec<CategoryBreakdown>>, ApiError> {
    let role = principal.role();
    Ok(Json(blocking(&services, move |s| s.engine().category_breakdown(role)).await?))
}

/// Items and sales from one consistent read.
pub async fn snapshot(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> Result<Json<InventorySnapshot>, ApiError> {
    let role = principal.role();
    Ok(Json(blocking(&services, move |s| s.engine().snapshot(role)).await?))
}
