use crate::config::{ConfigPolicy, RelayConfig};
use crate::core::compose::{compose_email, preview, MESSAGE_PREVIEW_CHARS};
use crate::domain::{DemoRequest, EmailSender, SendReceipt};
use crate::utils::error::{RelayError, Result};
use chrono::Utc;
use http::header::{HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS};
use http::header::{ACCESS_CONTROL_ALLOW_ORIGIN, ALLOW, CONTENT_TYPE};
use http::{Method, Response, StatusCode};
use serde_json::{json, Map, Value};

pub const ALLOWED_METHODS: &str = "POST, OPTIONS";

/// Body as it reaches the handler from the hosting runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// No body at all; treated as `{}`.
    Empty,
    /// Undecoded text, parsed as JSON.
    Raw(String),
    /// Already decoded by the host. A JSON string value is parsed once more.
    Parsed(Value),
}

#[derive(Debug, Clone, PartialEq)]
pub struct InboundRequest {
    pub method: Method,
    pub body: RequestBody,
}

impl InboundRequest {
    pub fn new(method: Method, body: RequestBody) -> Self {
        Self { method, body }
    }

    pub fn post_json(body: Value) -> Self {
        Self::new(Method::POST, RequestBody::Parsed(body))
    }
}

/// Stateless demo-request endpoint: validate, compose, send once, map the outcome.
pub struct DemoRequestHandler<S: EmailSender> {
    config: RelayConfig,
    sender: Option<S>,
}

impl<S: EmailSender> DemoRequestHandler<S> {
    /// `sender` may be `None` when no API key is configured; the handler then
    /// only logs submissions.
    pub fn new(config: RelayConfig, sender: Option<S>) -> Self {
        Self { config, sender }
    }

    pub async fn handle(&self, request: InboundRequest) -> Response<String> {
        if request.method == Method::OPTIONS {
            tracing::debug!("CORS preflight");
            return build_response(StatusCode::NO_CONTENT, String::new());
        }

        let method = request.method.clone();
        match self.process(request).await {
            Ok(receipt) => {
                tracing::info!(id = ?receipt.id, "✅ Demo request handled");
                json_response(StatusCode::OK, &json!({ "ok": true, "id": receipt.id }))
            }
            Err(err) => {
                let status = err.status_code();
                if status.is_server_error() {
                    tracing::error!(status = status.as_u16(), error = %err, "❌ Demo request failed");
                } else {
                    tracing::warn!(status = status.as_u16(), %method, error = %err, "Demo request rejected");
                }

                let mut response = json_response(status, &err.to_payload());
                if status == StatusCode::METHOD_NOT_ALLOWED {
                    response
                        .headers_mut()
                        .insert(ALLOW, HeaderValue::from_static(ALLOWED_METHODS));
                }
                response
            }
        }
    }

    async fn process(&self, request: InboundRequest) -> Result<SendReceipt> {
        if request.method != Method::POST {
            return Err(RelayError::MethodNotAllowed);
        }

        // strict 模式下，設定不完整就不讀 body
        let missing = self.config.missing();
        if self.config.policy == ConfigPolicy::Strict && missing.any() {
            return Err(RelayError::MissingConfig(missing));
        }

        let body = parse_body(request.body)?;
        let lead = DemoRequest::from_json(&body);

        if !lead.missing_required(self.config.require_phone).is_empty() {
            return Err(RelayError::MissingFields {
                required: self.config.required_fields(),
            });
        }

        // 先記錄，寄信失敗時仍可人工補寄
        log_submission(&lead);

        let email = compose_email(&lead, &self.config, Utc::now());

        let sender = match (&self.config.api_key, &self.sender) {
            (Some(_), Some(sender)) => sender,
            _ => {
                tracing::warn!(
                    company = %lead.company,
                    "⚠️ RESEND_API_KEY not configured, submission logged only"
                );
                return Ok(SendReceipt::default());
            }
        };

        tracing::debug!(to = ?email.to, subject = %email.subject, "Sending demo request email");
        sender.send(&email).await
    }
}

fn parse_body(body: RequestBody) -> Result<Value> {
    match body {
        RequestBody::Empty | RequestBody::Parsed(Value::Null) => Ok(Value::Object(Map::new())),
        RequestBody::Raw(text) | RequestBody::Parsed(Value::String(text)) => {
            serde_json::from_str(&text).map_err(RelayError::InvalidJson)
        }
        RequestBody::Parsed(value) => Ok(value),
    }
}

fn log_submission(lead: &DemoRequest) {
    tracing::info!(
        company = %lead.company,
        name = %lead.name,
        email = %lead.email,
        phone = %lead.phone,
        primary_service = %lead.primary_service,
        crm = %lead.crm,
        lead_volume = %lead.lead_volume,
        address = %lead.address,
        start_with = %lead.start_with,
        message_preview = %preview(&lead.message, MESSAGE_PREVIEW_CHARS),
        "📨 Demo request received"
    );
}

fn build_response(status: StatusCode, body: String) -> Response<String> {
    let mut response = Response::new(body);
    *response.status_mut() = status;

    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    response
}

fn json_response(status: StatusCode, payload: &Value) -> Response<String> {
    let mut response = build_response(status, payload.to_string());
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_body_variants() {
        assert_eq!(parse_body(RequestBody::Empty).unwrap(), json!({}));
        assert_eq!(parse_body(RequestBody::Parsed(Value::Null)).unwrap(), json!({}));
        assert_eq!(
            parse_body(RequestBody::Raw(r#"{"company":"Acme"}"#.to_string())).unwrap(),
            json!({ "company": "Acme" })
        );
        assert_eq!(
            parse_body(RequestBody::Parsed(json!(r#"{"name":"Jo"}"#))).unwrap(),
            json!({ "name": "Jo" })
        );
        assert!(matches!(
            parse_body(RequestBody::Raw("{not json".to_string())),
            Err(RelayError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_every_response_carries_cors_headers() {
        let response = json_response(StatusCode::BAD_REQUEST, &json!({ "error": "x" }));
        let headers = response.headers();

        assert_eq!(headers[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_METHODS], "POST, OPTIONS");
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_HEADERS], "Content-Type");
        assert_eq!(headers[CONTENT_TYPE], "application/json");
    }
}
