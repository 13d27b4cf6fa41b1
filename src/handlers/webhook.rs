use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

use crate::models::pix::WebhookEvent;
use crate::services::pix_service::INVALID_WEBHOOK;
use crate::services::{PixService, ServiceError};

pub const WEBHOOK_ACK: &str = "Webhook recebido com sucesso";

// Sempre responde 200 quando o evento é válido, mesmo se a Utmify falhar,
// para o gateway não reenviar o postback
pub async fn receive_webhook(
    State(service): State<Arc<PixService>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ServiceError> {
    let Json(payload) = payload.map_err(|e| {
        warn!("Unreadable webhook body: {}", e);
        ServiceError::Validation(INVALID_WEBHOOK)
    })?;
    let event: WebhookEvent = serde_json::from_value(payload).map_err(|e| {
        warn!("Invalid webhook payload: {}", e);
        ServiceError::Validation(INVALID_WEBHOOK)
    })?;

    service.handle_webhook(event).await?;

    Ok(Json(serde_json::json!({ "message": WEBHOOK_ACK })))
}
