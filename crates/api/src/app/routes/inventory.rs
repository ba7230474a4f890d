use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;

use stockledger_core::{Sku, DomainError};
use stockledger_infra::SaleOutcome;
use stockledger_inventory::{Item, SaleRecord};

use crate::app::dto::{CreateItemRequest, QuantityRequest, RestockResponse, SearchQuery};
use crate::app::errors::ApiError;
use crate::app::services::{blocking, AppServices};
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_items).post(create_item))
        .route("/:sku", get(get_item).delete(delete_item))
        .route("/:sku/restock", post(restock))
        .route("/:sku/sell", post(sell))
        .route("/:sku/sales", get(item_sales))
}

fn parse_sku(raw: String) -> Result<Sku, ApiError> {
    Sku::new(raw).map_err(ApiError::from)
}

pub async fn list_items(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Item>>, ApiError> {
    let items = blocking(&services, move |s| match query.q {
        Some(q) => s.engine().search_items(&q),
        None => s.engine().list_items(),
    })
    .await?;
    Ok(Json(items))
}

pub async fn create_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<CreateItemRequest>,
) -> Result<(StatusCode, Json<Item>), ApiError> {
    let role = principal.role();
    let item = blocking(&services, move |s| s.create_item(role, body)).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn get_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(sku): Path<String>,
) -> Result<Json<Item>, ApiError> {
    let sku = parse_sku(sku)?;
    let item = blocking(&services, move |s| s.engine().get_item(&sku)).await?;
    Ok(Json(item))
}

pub async fn delete_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(sku): Path<String>,
) -> Result<StatusCode, ApiError> {
    let sku = parse_sku(sku)?;
    let role = principal.role();
    blocking(&services, move |s| s.engine().delete_item(role, &sku)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn restock(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(sku): Path<String>,
    Json(body): Json<QuantityRequest>,
) -> Result<Json<RestockResponse>, ApiError> {
    let sku = parse_sku(sku)?;
    let role = principal.role();
    let res = blocking(&services, move |s| {
        let quantity = s.engine().restock(role, &sku, body.quantity)?;
        Ok::<_, DomainError>(RestockResponse { sku, quantity })
    })
    .await?;
    Ok(Json(res))
}

pub async fn sell(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(sku): Path<String>,
    Json(body): Json<QuantityRequest>,
) -> Result<(StatusCode, Json<SaleOutcome>), ApiError> {
    let sku = parse_sku(sku)?;
    let role = principal.role();
    let outcome = blocking(&services, move |s| {
        s.engine().sell(role, &sku, body.quantity, Utc::now())
    })
    .await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

pub async fn item_sales(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(sku): Path<String>,
) -> Result<Json<Vec<SaleRecord>>, ApiError> {
    let sku = parse_sku(sku)?;
    let role = principal.role();
    let sales = blocking(&services, move |s| s.engine().sales_for_sku(role, &sku)).await?;
    Ok(Json(sales))
}
