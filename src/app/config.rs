use std::env;
use thiserror::Error;
use tracing::warn;
use url::Url;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {name}: {source}")]
    InvalidUrl {
        name: &'static str,
        #[source]
        source: url::ParseError,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub gateway_basic_auth: String,
    pub utmify_api_token: String,
    pub gateway_base_url: Url,
    pub utmify_base_url: Url,
    pub http_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let gateway_basic_auth = env::var("BYNET_BASIC_AUTH")
            .or_else(|_| env::var("GATEWAY_BASIC_AUTH"))
            .unwrap_or_else(|_| {
                warn!("BYNET_BASIC_AUTH is not set, gateway calls will be rejected");
                String::new()
            });
        let utmify_api_token = env::var("UTMIFY_API_TOKEN").unwrap_or_else(|_| {
            warn!("UTMIFY_API_TOKEN is not set, order notifications will be rejected");
            String::new()
        });

        Ok(Self {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .unwrap_or(5000),
            gateway_basic_auth,
            utmify_api_token,
            gateway_base_url: parse_url(
                "GATEWAY_BASE_URL",
                env::var("GATEWAY_BASE_URL")
                    .unwrap_or_else(|_| "https://api.bynetglobal.com.br".to_string()),
            )?,
            utmify_base_url: parse_url(
                "UTMIFY_BASE_URL",
                env::var("UTMIFY_BASE_URL")
                    .unwrap_or_else(|_| "https://api.utmify.com.br".to_string()),
            )?,
            http_timeout_secs: env::var("HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap_or(30),
        })
    }
}

fn parse_url(name: &'static str, raw: String) -> Result<Url, ConfigError> {
    Url::parse(&raw).map_err(|source| ConfigError::InvalidUrl { name, source })
}
