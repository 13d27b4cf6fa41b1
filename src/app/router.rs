use axum::{
    http::StatusCode,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::handlers::{payment_status, pix, webhook};
use crate::services::PixService;

pub fn build_router(service: Arc<PixService>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/gerar-pix", post(pix::create_pix))
        .route("/status-pagamento/", get(payment_status::missing_id))
        .route("/status-pagamento/:id", get(payment_status::get_status))
        .route("/webhook-pagamento", post(webhook::receive_webhook))
        .with_state(service)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

async fn health_handler() -> StatusCode {
    StatusCode::OK
}
