use crate::config::{RelayConfig, DEFAULT_RESEND_ENDPOINT};
use crate::domain::{EmailSender, OutboundEmail, SendReceipt};
use crate::utils::error::{RelayError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Map, Value};

/// Resend `POST /emails` client. No timeout or retry beyond reqwest's defaults.
#[derive(Clone)]
pub struct ResendSender {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl ResendSender {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: DEFAULT_RESEND_ENDPOINT.to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// `None` when the configuration carries no API key.
    pub fn from_config(config: &RelayConfig) -> Option<Self> {
        config
            .api_key
            .as_ref()
            .map(|key| Self::new(key.clone()).with_endpoint(config.endpoint.clone()))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl std::fmt::Debug for ResendSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResendSender")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl EmailSender for ResendSender {
    async fn send(&self, email: &OutboundEmail) -> Result<SendReceipt> {
        tracing::debug!("Making Resend request to: {}", self.endpoint);
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(email)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Resend response status: {}", status);

        // 回應不是 JSON 時以空物件代替
        let text = response.text().await?;
        let data: Value =
            serde_json::from_str(&text).unwrap_or_else(|_| Value::Object(Map::new()));

        if !status.is_success() {
            return Err(RelayError::Upstream {
                status: status.as_u16(),
                details: data,
            });
        }

        let id = data.get("id").and_then(Value::as_str).map(str::to_string);
        Ok(SendReceipt { id })
    }
}
