use crate::app::config::Config;
use crate::models::order::OrderPayload;
use async_trait::async_trait;
use reqwest::{header, Client};
use std::time::Duration;
use thiserror::Error;
use tracing::info;
use url::Url;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("order consumer answered HTTP {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("order notification failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid order consumer url: {0}")]
    Url(#[from] url::ParseError),
}

/// Downstream sales-tracking consumer.
#[async_trait]
pub trait OrderNotifier: Send + Sync {
    async fn send_order(&self, payload: &OrderPayload) -> Result<(), NotifyError>;
}

pub struct UtmifyClient {
    client: Client,
    orders_url: Url,
    api_token: String,
}

impl UtmifyClient {
    pub fn new(config: &Config) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            orders_url: config.utmify_base_url.join("/api-credentials/orders")?,
            api_token: config.utmify_api_token.clone(),
        })
    }
}

#[async_trait]
impl OrderNotifier for UtmifyClient {
    async fn send_order(&self, payload: &OrderPayload) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(self.orders_url.clone())
            .header("x-api-token", &self.api_token)
            .header(header::CONTENT_TYPE, "application/json")
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        info!(
            "Order {} ({}) sent to Utmify: {}",
            payload.order_id, payload.status, body
        );
        Ok(())
    }
}
