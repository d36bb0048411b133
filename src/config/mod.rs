#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, Command};
pub use toml_config::TomlConfig;

use crate::utils::error::{MissingSettings, RelayError, Result};
use crate::utils::validation::{validate_mailbox, validate_url, Validate};
use std::str::FromStr;

pub const RESEND_API_KEY: &str = "RESEND_API_KEY";
pub const DEMO_FROM_EMAIL: &str = "DEMO_FROM_EMAIL";
pub const DEMO_TO_EMAIL: &str = "DEMO_TO_EMAIL";
pub const RESEND_API_URL: &str = "RESEND_API_URL";
pub const DEMO_CONFIG_POLICY: &str = "DEMO_CONFIG_POLICY";
pub const DEMO_REQUIRE_PHONE: &str = "DEMO_REQUIRE_PHONE";

/// Resend 的共用測試寄件地址，正式環境請設定 `DEMO_FROM_EMAIL`
pub const DEFAULT_FROM_EMAIL: &str = "Demo Requests <onboarding@resend.dev>";
pub const DEFAULT_TO_EMAIL: &str = "demo-requests@example.com";
pub const DEFAULT_RESEND_ENDPOINT: &str = "https://api.resend.com/emails";

/// How the handler reacts to missing settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigPolicy {
    /// Addresses fall back to the defaults; a missing API key only logs the lead.
    #[default]
    Lenient,
    /// Any missing setting is a 500 before the body is read.
    Strict,
}

impl FromStr for ConfigPolicy {
    type Err = RelayError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lenient" => Ok(ConfigPolicy::Lenient),
            "strict" => Ok(ConfigPolicy::Strict),
            other => Err(RelayError::InvalidConfigValue {
                field: DEMO_CONFIG_POLICY.to_string(),
                value: other.to_string(),
                reason: "Expected \"strict\" or \"lenient\"".to_string(),
            }),
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct RelayConfig {
    pub api_key: Option<String>,
    pub from_email: Option<String>,
    pub to_email: Option<String>,
    pub endpoint: String,
    pub policy: ConfigPolicy,
    pub require_phone: bool,
}

// API key 不可出現在日誌
impl std::fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("from_email", &self.from_email)
            .field("to_email", &self.to_email)
            .field("endpoint", &self.endpoint)
            .field("policy", &self.policy)
            .field("require_phone", &self.require_phone)
            .finish()
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            from_email: None,
            to_email: None,
            endpoint: DEFAULT_RESEND_ENDPOINT.to_string(),
            policy: ConfigPolicy::default(),
            require_phone: false,
        }
    }
}

impl RelayConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads every setting through `lookup`; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        config.apply_lookup(lookup)?;
        Ok(config)
    }

    /// 先讀 TOML，再讓環境變數覆蓋
    pub fn from_sources<F>(file: Option<&TomlConfig>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match file {
            Some(toml) => toml.to_relay_config()?,
            None => Self::default(),
        };
        config.apply_lookup(lookup)?;
        Ok(config)
    }

    fn apply_lookup<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| non_blank(lookup(key));

        if let Some(key) = get(RESEND_API_KEY) {
            self.api_key = Some(key);
        }
        if let Some(from) = get(DEMO_FROM_EMAIL) {
            self.from_email = Some(from);
        }
        if let Some(to) = get(DEMO_TO_EMAIL) {
            self.to_email = Some(to);
        }
        if let Some(endpoint) = get(RESEND_API_URL) {
            self.endpoint = endpoint;
        }
        if let Some(policy) = get(DEMO_CONFIG_POLICY) {
            self.policy = policy.parse()?;
        }
        if let Some(flag) = get(DEMO_REQUIRE_PHONE) {
            self.require_phone = parse_flag(DEMO_REQUIRE_PHONE, &flag)?;
        }
        Ok(())
    }

    pub fn sender_address(&self) -> &str {
        self.from_email.as_deref().unwrap_or(DEFAULT_FROM_EMAIL)
    }

    pub fn recipient_address(&self) -> &str {
        self.to_email.as_deref().unwrap_or(DEFAULT_TO_EMAIL)
    }

    pub fn missing(&self) -> MissingSettings {
        MissingSettings {
            api_key: self.api_key.is_none(),
            from_email: self.from_email.is_none(),
            to_email: self.to_email.is_none(),
        }
    }

    pub fn required_fields(&self) -> Vec<&'static str> {
        let mut fields = vec!["company", "name", "email"];
        if self.require_phone {
            fields.push("phone");
        }
        fields
    }
}

impl Validate for RelayConfig {
    fn validate(&self) -> Result<()> {
        validate_url("endpoint", &self.endpoint)?;
        validate_mailbox("from_email", self.sender_address())?;
        validate_mailbox("to_email", self.recipient_address())?;

        // 缺漏設定不阻止啟動：strict 模式由 handler 逐次回 500 `missing`
        let missing = self.missing();
        if self.policy == ConfigPolicy::Strict && missing.any() {
            tracing::warn!(
                api_key = missing.api_key,
                from_email = missing.from_email,
                to_email = missing.to_email,
                "⚠️ Strict policy with missing settings: every demo request will answer 500"
            );
        } else if missing.api_key {
            tracing::warn!("⚠️ RESEND_API_KEY not set: demo requests will be logged but not emailed");
        }

        tracing::debug!("✅ Relay configuration validation passed");
        Ok(())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_flag(field: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(RelayError::InvalidConfigValue {
            field: field.to_string(),
            value: other.to_string(),
            reason: "Expected a boolean (true/false)".to_string(),
        }),
    }
}
