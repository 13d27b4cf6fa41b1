use crate::app::config::Config;
use crate::models::pix::NewTransaction;
use async_trait::async_trait;
use reqwest::{header, Client, Response};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info};
use url::Url;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("gateway answered HTTP {status}")]
    Upstream { status: u16, body: Value },
    #[error("gateway request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid gateway url: {0}")]
    Url(#[from] url::ParseError),
}

/// Operations the relay needs from the PIX gateway. Both return the raw
/// transaction record so it can be echoed to the browser unchanged.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_transaction(&self, request: &NewTransaction) -> Result<Value, GatewayError>;
    async fn get_transaction(&self, id: &str) -> Result<Value, GatewayError>;
}

pub struct GatewayClient {
    client: Client,
    base_url: Url,
    auth_header: String,
}

impl GatewayClient {
    pub fn new(config: &Config) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.gateway_base_url.clone(),
            auth_header: format!("Basic {}", config.gateway_basic_auth),
        })
    }

    fn transactions_url(&self, id: Option<&str>) -> Result<Url, GatewayError> {
        let mut url = self.base_url.join("/v1/transactions")?;
        if let Some(id) = id {
            // push escapa o id, evita path traversal com ids vindos da URL
            url.path_segments_mut()
                .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
                .push(id);
        }
        Ok(url)
    }

    async fn read_record(response: Response) -> Result<Value, GatewayError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<Value>().await?);
        }

        let text = response.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(if text.is_empty() {
            Value::Null
        } else {
            Value::String(text)
        });
        error!("Gateway returned {}: {}", status, body);

        Err(GatewayError::Upstream {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl PaymentGateway for GatewayClient {
    async fn create_transaction(&self, request: &NewTransaction) -> Result<Value, GatewayError> {
        let response = self
            .client
            .post(self.transactions_url(None)?)
            .header(header::AUTHORIZATION, &self.auth_header)
            .header(header::CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .await?;

        let record = Self::read_record(response).await?;
        info!("Gateway opened PIX transaction {}", record["id"]);
        Ok(record)
    }

    async fn get_transaction(&self, id: &str) -> Result<Value, GatewayError> {
        let response = self
            .client
            .get(self.transactions_url(Some(id))?)
            .header(header::AUTHORIZATION, &self.auth_header)
            .header(header::CONTENT_TYPE, "application/json")
            .send()
            .await?;

        Self::read_record(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> GatewayClient {
        GatewayClient {
            client: Client::new(),
            base_url: Url::parse(base).unwrap(),
            auth_header: "Basic dGVzdDp0ZXN0".to_string(),
        }
    }

    #[test]
    fn test_transactions_url() {
        let gateway = client("https://api.bynetglobal.com.br");
        assert_eq!(
            gateway.transactions_url(None).unwrap().as_str(),
            "https://api.bynetglobal.com.br/v1/transactions"
        );
        assert_eq!(
            gateway.transactions_url(Some("abc-123")).unwrap().as_str(),
            "https://api.bynetglobal.com.br/v1/transactions/abc-123"
        );
    }

    #[test]
    fn test_transaction_id_is_escaped() {
        let gateway = client("http://localhost:8080");
        let url = gateway.transactions_url(Some("../admin")).unwrap();
        assert_eq!(url.path(), "/v1/transactions/..%2Fadmin");
    }
}
