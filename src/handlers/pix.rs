use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info};

use crate::handlers::client_ip::ClientIp;
use crate::models::pix::CreatePixRequest;
use crate::services::pix_service::MISSING_CREATE_FIELDS;
use crate::services::{PixService, ServiceError};

pub async fn create_pix(
    State(service): State<Arc<PixService>>,
    ClientIp(client_ip): ClientIp,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ServiceError> {
    let Json(payload) = payload.map_err(|e| {
        error!("Unreadable PIX request body: {}", e);
        ServiceError::Validation(MISSING_CREATE_FIELDS)
    })?;
    let request: CreatePixRequest = match serde_json::from_value(payload) {
        Ok(req) => req,
        Err(e) => {
            error!("Invalid PIX request: {}", e);
            return Err(ServiceError::Validation(MISSING_CREATE_FIELDS));
        }
    };

    info!("Received PIX request from {}", client_ip);

    let record = service.create_pix(request, client_ip).await?;

    Ok(Json(serde_json::json!({
        "statusCode": 200,
        "data": record
    })))
}
