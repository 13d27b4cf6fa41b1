use axum::{
    extract::{Path, State},
    response::Json,
};
use serde_json::Value;
use std::sync::Arc;

use crate::services::pix_service::MISSING_TRANSACTION_ID;
use crate::services::{PixService, ServiceError};

pub async fn get_status(
    State(service): State<Arc<PixService>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ServiceError> {
    let record = service.check_status(&id).await?;

    Ok(Json(serde_json::json!({
        "statusCode": 200,
        "data": record
    })))
}

/// `GET /status-pagamento/` with no id.
pub async fn missing_id() -> ServiceError {
    ServiceError::Validation(MISSING_TRANSACTION_ID)
}
