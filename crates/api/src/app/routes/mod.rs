use axum::{routing::get, Router};

pub mod inventory;
pub mod reports;
pub mod system;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .route("/skus/next", get(system::next_sku))
        .nest("/items", inventory::router())
        .nest("/reports", reports::router())
}
