use http::StatusCode;
use serde_json::{json, Value};
use thiserror::Error;

/// 設定缺漏旗標，對應 `missing` 回應欄位
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MissingSettings {
    pub api_key: bool,
    pub from_email: bool,
    pub to_email: bool,
}

impl MissingSettings {
    pub fn any(&self) -> bool {
        self.api_key || self.from_email || self.to_email
    }
}

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Invalid JSON body")]
    InvalidJson(#[source] serde_json::Error),

    #[error("Missing required fields: {}", .required.join(", "))]
    MissingFields { required: Vec<&'static str> },

    #[error("Method Not Allowed")]
    MethodNotAllowed,

    #[error("Missing server configuration")]
    MissingConfig(MissingSettings),

    #[error("Resend send failed with status {status}")]
    Upstream { status: u16, details: Value },

    #[error("Server error sending email: {message}")]
    Transport { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for {field}: {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for RelayError {
    fn from(err: reqwest::Error) -> Self {
        RelayError::Transport {
            message: err.to_string(),
        }
    }
}

impl RelayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::InvalidJson(_) | RelayError::MissingFields { .. } => {
                StatusCode::BAD_REQUEST
            }
            RelayError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 轉成回給瀏覽器的 JSON 錯誤內容
    pub fn to_payload(&self) -> Value {
        match self {
            RelayError::InvalidJson(_) => json!({ "error": "Invalid JSON body" }),
            RelayError::MissingFields { required } => json!({
                "error": "Missing required fields",
                "required": required,
            }),
            RelayError::MethodNotAllowed => json!({ "error": "Method Not Allowed" }),
            RelayError::MissingConfig(missing) => json!({
                "error": "Missing server configuration",
                "missing": {
                    "RESEND_API_KEY": missing.api_key,
                    "DEMO_FROM_EMAIL": missing.from_email,
                    "DEMO_TO_EMAIL": missing.to_email,
                },
            }),
            RelayError::Upstream { status, details } => json!({
                "error": "Resend send failed",
                "status": status,
                "details": details,
            }),
            RelayError::Transport { message } => json!({
                "error": "Server error sending email",
                "message": message,
            }),
            other => json!({ "error": other.to_string() }),
        }
    }
}

pub type Result<T> = std::result::Result<T, RelayError>;
