use crate::models::order::TrackingAttributes;
use crate::models::pix::{CreatePixRequest, NewTransaction, PixOptions, WebhookEvent};
use crate::models::transaction::{Transaction, STATUS_PAID};
use crate::services::gateway_client::{GatewayError, PaymentGateway};
use crate::services::order_mapper::{build_payload, NotificationSource};
use crate::services::order_notifier::OrderNotifier;
use crate::services::tracking_store::TrackingStore;
use crate::utils::money::format_currency;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

pub const MISSING_CREATE_FIELDS: &str =
    "Os campos amount, customer, items e pixExpiresInDays são obrigatórios.";
pub const MISSING_TRANSACTION_ID: &str = "O ID da transação é obrigatório.";
pub const INVALID_WEBHOOK: &str = "Dados inválidos no webhook";
pub const WEBHOOK_FAILURE: &str = "Erro interno ao processar webhook";

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(&'static str),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error("{0}")]
    Internal(&'static str),
}

/// Drives a PIX charge through creation, polling and the gateway postback,
/// mirroring each relevant step to the order consumer.
///
/// Notification failures never reach the caller.
pub struct PixService {
    gateway: Arc<dyn PaymentGateway>,
    notifier: Arc<dyn OrderNotifier>,
    tracking: Arc<dyn TrackingStore>,
}

impl PixService {
    pub fn new(
        gateway: Arc<dyn PaymentGateway>,
        notifier: Arc<dyn OrderNotifier>,
        tracking: Arc<dyn TrackingStore>,
    ) -> Self {
        Self {
            gateway,
            notifier,
            tracking,
        }
    }

    pub async fn create_pix(
        &self,
        request: CreatePixRequest,
        client_ip: String,
    ) -> Result<Value, ServiceError> {
        let utm_term = request.metadata_utm_term();
        let CreatePixRequest {
            amount: Some(amount),
            customer: Some(customer),
            items: Some(items),
            pix_expires_in_days: Some(expires_in_days),
            postback_url,
            metadata,
            utm_source,
            utm_campaign,
            utm_medium,
            utm_content,
        } = request
        else {
            return Err(ServiceError::Validation(MISSING_CREATE_FIELDS));
        };
        if amount == 0 || expires_in_days == 0 {
            return Err(ServiceError::Validation(MISSING_CREATE_FIELDS));
        }

        let new_transaction = NewTransaction {
            amount,
            payment_method: "pix",
            customer,
            items,
            pix: PixOptions { expires_in_days },
            postback_url,
            metadata,
        };

        let record = self
            .gateway
            .create_transaction(&new_transaction)
            .await
            .map_err(|e| {
                error!("Failed to create PIX transaction: {}", e);
                e
            })?;

        let Some(transaction_id) = record_id(&record) else {
            warn!("Gateway record has no id, skipping tracking and notification");
            return Ok(record);
        };
        info!(
            "PIX transaction {} created for {}",
            transaction_id,
            format_currency(amount)
        );

        let tracking = TrackingAttributes {
            utm_source: utm_source.filter(|s| !s.is_empty()),
            utm_campaign: utm_campaign.filter(|s| !s.is_empty()),
            utm_medium: utm_medium.filter(|s| !s.is_empty()),
            utm_content: utm_content.filter(|s| !s.is_empty()),
        };
        self.tracking.put(&transaction_id, tracking.clone()).await;

        // Pedido ainda não tem taxa real: usa os dados enviados pelo navegador
        let transaction = Transaction {
            id: transaction_id,
            amount,
            status: record
                .get("status")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            created_at: record
                .get("createdAt")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            paid_at: None,
            customer: new_transaction.customer,
            items: new_transaction.items,
            fee: None,
        };
        let source = NotificationSource::Creation {
            client_ip,
            utm_term,
        };
        self.notify(&transaction, &tracking, &source).await;

        Ok(record)
    }

    pub async fn check_status(&self, transaction_id: &str) -> Result<Value, ServiceError> {
        let transaction_id = transaction_id.trim();
        if transaction_id.is_empty() {
            return Err(ServiceError::Validation(MISSING_TRANSACTION_ID));
        }

        let record = self
            .gateway
            .get_transaction(transaction_id)
            .await
            .map_err(|e| {
                error!("Failed to fetch payment status for {}: {}", transaction_id, e);
                e
            })?;

        if record_status(&record) == Some(STATUS_PAID) {
            info!("Transaction {} observed as paid by status check", transaction_id);
            self.notify_paid(transaction_id, &record, NotificationSource::StatusCheck)
                .await;
        }

        Ok(record)
    }

    pub async fn handle_webhook(&self, event: WebhookEvent) -> Result<(), ServiceError> {
        let (Some(id), Some(status)) = (
            event
                .id
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty()),
            event.status.filter(|status| !status.is_empty()),
        ) else {
            return Err(ServiceError::Validation(INVALID_WEBHOOK));
        };

        info!("Received webhook for transaction {} with status {}", id, status);

        if status != STATUS_PAID {
            return Ok(());
        }

        let record = self.gateway.get_transaction(&id).await.map_err(|e| {
            error!("Failed to process webhook for {}: {}", id, e);
            ServiceError::Internal(WEBHOOK_FAILURE)
        })?;

        let source = NotificationSource::Webhook {
            paid_at: event.paid_at,
        };
        self.notify_paid(&id, &record, source).await;

        Ok(())
    }

    async fn notify_paid(&self, transaction_id: &str, record: &Value, source: NotificationSource) {
        let transaction: Transaction = match serde_json::from_value(record.clone()) {
            Ok(transaction) => transaction,
            Err(e) => {
                error!(
                    "Could not read gateway record {} for order notification: {}",
                    transaction_id, e
                );
                return;
            }
        };

        if !transaction.is_paid() {
            warn!(
                "Transaction {} reported as paid but gateway record says {:?}",
                transaction_id, transaction.status
            );
        }

        let tracking = self.tracking.get(transaction_id).await;
        self.notify(&transaction, &tracking, &source).await;
    }

    async fn notify(
        &self,
        transaction: &Transaction,
        tracking: &TrackingAttributes,
        source: &NotificationSource,
    ) {
        let payload = match build_payload(transaction, tracking, source) {
            Ok(payload) => payload,
            Err(e) => {
                error!("Failed to build order notification: {}", e);
                return;
            }
        };

        if let Err(e) = self.notifier.send_order(&payload).await {
            error!(
                "Failed to send order {} to Utmify: {}",
                payload.order_id, e
            );
        }
    }
}

fn record_id(record: &Value) -> Option<String> {
    match record.get("id")? {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

fn record_status(record: &Value) -> Option<&str> {
    record.get("status").and_then(Value::as_str)
}
