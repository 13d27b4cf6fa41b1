//! Builds the order notification sent to the sales-tracking consumer from a
//! gateway transaction.
//!
//! The same mapping runs at three points of a charge's life. What differs
//! between them is captured by [`NotificationSource`]:
//!
//! * at creation the gateway has not computed its fee yet, so the commission
//!   is estimated (3% + 100 cents) and the customer IP comes from the request;
//! * on a status check or webhook the fee reported by the gateway is used and
//!   the IP comes from the stored transaction.
//!
//! The two commission models do not add up the same way. That is how the
//! consumer has always been fed and is kept as is.

use rand::{distributions::Alphanumeric, Rng};
use thiserror::Error;

use crate::models::order::{
    Commission, OrderCustomer, OrderPayload, OrderProduct, TrackingAttributes, TrackingParameters,
    PAYMENT_METHOD_PIX, PLATFORM,
};
use crate::models::transaction::{Item, Transaction, STATUS_PAID, STATUS_WAITING_PAYMENT};
use crate::utils::money;
use crate::utils::time::to_order_timestamp;

pub const DEFAULT_COUNTRY: &str = "BR";
pub const UNKNOWN_IP: &str = "0.0.0.0";
const SYNTHETIC_PRODUCT_ID_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationSource {
    /// Charge just opened; reported as `waiting_payment`.
    Creation {
        client_ip: String,
        utm_term: Option<String>,
    },
    /// Browser poll observed `paid`.
    StatusCheck,
    /// Gateway postback reported `paid`. `paid_at` is the postback's own
    /// timestamp, used when the gateway record has none.
    Webhook { paid_at: Option<String> },
}

impl NotificationSource {
    pub fn status(&self) -> &'static str {
        match self {
            NotificationSource::Creation { .. } => STATUS_WAITING_PAYMENT,
            NotificationSource::StatusCheck | NotificationSource::Webhook { .. } => STATUS_PAID,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MappingError {
    #[error("transaction {order_id} has an unreadable {field}: {value:?}")]
    InvalidTimestamp {
        order_id: String,
        field: &'static str,
        value: String,
    },
}

pub fn build_payload(
    transaction: &Transaction,
    tracking: &TrackingAttributes,
    source: &NotificationSource,
) -> Result<OrderPayload, MappingError> {
    let created_at = reformat(transaction, "createdAt", &transaction.created_at)?;

    let approved_date = match source {
        NotificationSource::Creation { .. } => None,
        NotificationSource::StatusCheck => transaction.paid_at.as_deref().and_then(non_empty),
        NotificationSource::Webhook { paid_at } => transaction
            .paid_at
            .as_deref()
            .and_then(non_empty)
            .or_else(|| paid_at.as_deref().and_then(non_empty)),
    }
    .map(|raw| reformat(transaction, "paidAt", raw))
    .transpose()?;

    let (country, ip, utm_term) = match source {
        NotificationSource::Creation {
            client_ip,
            utm_term,
        } => (
            transaction
                .customer
                .country
                .as_deref()
                .and_then(non_empty)
                .unwrap_or(DEFAULT_COUNTRY),
            non_empty(client_ip).unwrap_or(UNKNOWN_IP).to_string(),
            utm_term.clone(),
        ),
        _ => (
            DEFAULT_COUNTRY,
            transaction
                .customer
                .ip
                .as_deref()
                .and_then(non_empty)
                .unwrap_or(UNKNOWN_IP)
                .to_string(),
            // utm_term só existe no metadata da criação
            None,
        ),
    };

    Ok(OrderPayload {
        order_id: transaction.id.clone(),
        platform: PLATFORM.to_string(),
        payment_method: PAYMENT_METHOD_PIX.to_string(),
        status: source.status().to_string(),
        created_at,
        approved_date,
        refunded_at: None,
        customer: OrderCustomer {
            name: transaction.customer.name.clone(),
            email: transaction.customer.email.clone(),
            phone: transaction
                .customer
                .phone
                .as_deref()
                .and_then(non_empty)
                .map(str::to_string),
            document: transaction.customer.document_number(),
            country: country.to_string(),
            ip,
        },
        products: transaction.items.iter().map(to_product).collect(),
        tracking_parameters: TrackingParameters {
            src: None,
            sck: None,
            utm_source: tracking.utm_source.clone(),
            utm_campaign: tracking.utm_campaign.clone(),
            utm_medium: tracking.utm_medium.clone(),
            utm_content: tracking.utm_content.clone(),
            utm_term,
        },
        commission: commission(transaction, source),
        is_test: false,
    })
}

fn commission(transaction: &Transaction, source: &NotificationSource) -> Commission {
    let amount = transaction.amount;
    let (gateway_fee, user_commission) = match source {
        NotificationSource::Creation { .. } => (
            money::estimated_gateway_fee(amount),
            money::estimated_user_commission(amount),
        ),
        _ => {
            let reported = transaction
                .fee
                .as_ref()
                .and_then(|fee| fee.fixed_amount)
                .unwrap_or(0);
            (reported, money::reported_user_commission(amount, reported))
        }
    };

    Commission {
        total_price_in_cents: amount,
        gateway_fee_in_cents: gateway_fee,
        user_commission_in_cents: user_commission,
    }
}

fn to_product(item: &Item) -> OrderProduct {
    OrderProduct {
        id: item
            .id
            .as_deref()
            .and_then(non_empty)
            .map(str::to_string)
            .unwrap_or_else(synthetic_product_id),
        name: item.title.clone(),
        plan_id: None,
        plan_name: None,
        quantity: item.quantity_count(),
        price_in_cents: item.unit_price_cents(),
    }
}

/// Display hint only; collisions are possible and tolerated downstream.
fn synthetic_product_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SYNTHETIC_PRODUCT_ID_LEN)
        .map(|c| char::from(c).to_ascii_lowercase())
        .collect()
}

fn reformat(
    transaction: &Transaction,
    field: &'static str,
    raw: &str,
) -> Result<String, MappingError> {
    to_order_timestamp(raw).ok_or_else(|| MappingError::InvalidTimestamp {
        order_id: transaction.id.clone(),
        field,
        value: raw.to_string(),
    })
}

fn non_empty(value: &str) -> Option<&str> {
    (!value.is_empty()).then_some(value)
}
