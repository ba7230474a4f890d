use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, Json};

use stockledger_auth::PolicyRow;

use crate::app::dto::{NextSkuResponse, WhoAmIResponse};
use crate::app::errors::ApiError;
use crate::app::services::{blocking, AppServices};
use crate::context::PrincipalContext;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn whoami(Extension(principal): Extension<PrincipalContext>) -> Json<WhoAmIResponse> {
    let row = PolicyRow::for_role(principal.role());
    Json(WhoAmIResponse {
        username: principal.username().to_string(),
        role: row.role,
        permitted: row.permitted,
    })
}

pub async fn next_sku(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> Result<Json<NextSkuResponse>, ApiError> {
    let role = principal.role();
    let sku = blocking(&services, move |s| s.next_sku(role)).await?;
    Ok(Json(NextSkuResponse { sku }))
}
