use crate::utils::error::{RelayError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(RelayError::InvalidConfigValue {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(RelayError::InvalidConfigValue {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(RelayError::InvalidConfigValue {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(RelayError::InvalidConfigValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// 只檢查基本形狀 (`local@domain`)，詳細驗證交給 Resend
pub fn validate_mailbox(field_name: &str, value: &str) -> Result<()> {
    validate_non_empty_string(field_name, value)?;

    // 允許 "Name <addr@domain>" 形式
    let address = match (value.rfind('<'), value.rfind('>')) {
        (Some(start), Some(end)) if start < end => &value[start + 1..end],
        _ => value,
    };

    match address.split_once('@') {
        Some((local, domain)) if !local.trim().is_empty() && !domain.trim().is_empty() => Ok(()),
        _ => Err(RelayError::InvalidConfigValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Expected an email address such as demo@example.com".to_string(),
        }),
    }
}
