use crate::core::{InboundRequest, RequestBody};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use http::{Method, Response};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// API Gateway proxy event; covers REST (`httpMethod`) and HTTP API v2
/// (`requestContext.http.method`) payloads.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiGatewayRequest {
    pub http_method: Option<String>,
    #[serde(default)]
    pub request_context: RequestContext,
    pub body: Option<String>,
    #[serde(default)]
    pub is_base64_encoded: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestContext {
    pub http: Option<HttpContext>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpContext {
    pub method: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiGatewayResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
    pub is_base64_encoded: bool,
}

impl ApiGatewayRequest {
    pub fn method(&self) -> Method {
        let raw = self
            .http_method
            .as_deref()
            .or_else(|| self.request_context.http.as_ref().map(|h| h.method.as_str()))
            .unwrap_or_default();

        // 無法辨識的方法一律視為 GET，後續回 405
        Method::from_bytes(raw.to_ascii_uppercase().as_bytes()).unwrap_or(Method::GET)
    }

    pub fn into_inbound(self) -> InboundRequest {
        let method = self.method();
        let body = match self.body {
            None => RequestBody::Empty,
            Some(body) if self.is_base64_encoded => match STANDARD.decode(body.as_bytes()) {
                Ok(bytes) => RequestBody::Raw(String::from_utf8_lossy(&bytes).into_owned()),
                Err(e) => {
                    tracing::warn!("Failed to decode base64 body: {}", e);
                    RequestBody::Raw(body)
                }
            },
            Some(body) => RequestBody::Raw(body),
        };
        InboundRequest::new(method, body)
    }
}

impl From<Response<String>> for ApiGatewayResponse {
    fn from(response: Response<String>) -> Self {
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        Self {
            status_code: response.status().as_u16(),
            headers,
            body: response.into_body(),
            is_base64_encoded: false,
        }
    }
}
