use serde::Serialize;

pub const PLATFORM: &str = "GlobalPay";
pub const PAYMENT_METHOD_PIX: &str = "pix";

/// UTM attribution captured when a PIX charge is created.
///
/// `utm_term` is not kept: it only travels with the creation notification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackingAttributes {
    pub utm_source: Option<String>,
    pub utm_campaign: Option<String>,
    pub utm_medium: Option<String>,
    pub utm_content: Option<String>,
}

/// Order schema accepted by the sales-tracking consumer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayload {
    pub order_id: String,
    pub platform: String,
    pub payment_method: String,
    pub status: String,
    pub created_at: String,
    pub approved_date: Option<String>,
    pub refunded_at: Option<String>,
    pub customer: OrderCustomer,
    pub products: Vec<OrderProduct>,
    pub tracking_parameters: TrackingParameters,
    pub commission: Commission,
    pub is_test: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderCustomer {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub document: String,
    pub country: String,
    pub ip: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderProduct {
    pub id: String,
    pub name: String,
    pub plan_id: Option<String>,
    pub plan_name: Option<String>,
    pub quantity: i64,
    pub price_in_cents: i64,
}

// As chaves utm_* seguem snake_case no schema da Utmify
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackingParameters {
    pub src: Option<String>,
    pub sck: Option<String>,
    pub utm_source: Option<String>,
    pub utm_campaign: Option<String>,
    pub utm_medium: Option<String>,
    pub utm_content: Option<String>,
    pub utm_term: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Commission {
    pub total_price_in_cents: i64,
    pub gateway_fee_in_cents: i64,
    pub user_commission_in_cents: i64,
}
