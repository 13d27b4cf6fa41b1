use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::transaction::{optional_string_or_number, Customer, Item};

// Payload vindo do navegador em POST /gerar-pix
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePixRequest {
    pub amount: Option<i64>,
    pub customer: Option<Customer>,
    pub items: Option<Vec<Item>>,
    pub pix_expires_in_days: Option<i64>,
    pub postback_url: Option<String>,
    pub metadata: Option<Value>,
    #[serde(rename = "utm_source")]
    pub utm_source: Option<String>,
    #[serde(rename = "utm_campaign")]
    pub utm_campaign: Option<String>,
    #[serde(rename = "utm_medium")]
    pub utm_medium: Option<String>,
    #[serde(rename = "utm_content")]
    pub utm_content: Option<String>,
}

impl CreatePixRequest {
    /// `utm_term` is only ever collected through the free-form metadata bag.
    pub fn metadata_utm_term(&self) -> Option<String> {
        self.metadata
            .as_ref()
            .and_then(|meta| meta.get("utm_term"))
            .and_then(Value::as_str)
            .filter(|term| !term.is_empty())
            .map(str::to_string)
    }
}

/// Request body for `POST /v1/transactions` on the gateway.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub amount: i64,
    pub payment_method: &'static str,
    pub customer: Customer,
    pub items: Vec<Item>,
    pub pix: PixOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postback_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PixOptions {
    pub expires_in_days: i64,
}

// Postback do gateway em POST /webhook-pagamento
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEvent {
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub paid_at: Option<String>,
}
