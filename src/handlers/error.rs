use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::{json, Value};

use crate::services::gateway_client::GatewayError;
use crate::services::ServiceError;

pub const GENERIC_ERROR: &str = "Erro interno no servidor";

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            ServiceError::Validation(message) => (StatusCode::BAD_REQUEST, json!(message)),
            // espelha status e corpo do gateway para o navegador
            ServiceError::Gateway(GatewayError::Upstream { status, body }) => (
                StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                if body.is_null() { json!(GENERIC_ERROR) } else { body },
            ),
            ServiceError::Gateway(_) => (StatusCode::INTERNAL_SERVER_ERROR, json!(GENERIC_ERROR)),
            ServiceError::Internal(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, Value::from(message))
            }
        };

        (status, Json(json!({ "error": error }))).into_response()
    }
}
