use crate::config::{ConfigPolicy, RelayConfig};
use crate::utils::error::{RelayError, Result};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub email: EmailSection,
    #[serde(default)]
    pub policy: PolicySection,
    #[serde(default)]
    pub server: ServerSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmailSection {
    pub api_key: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicySection {
    pub mode: Option<String>,
    pub require_phone: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerSection {
    pub bind: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| RelayError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${RESEND_API_KEY})；未設定的變數替換成空字串
    fn substitute_env_vars(content: &str) -> String {
        static ENV_VAR: OnceLock<Regex> = OnceLock::new();
        let re = ENV_VAR.get_or_init(|| {
            Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("env var pattern is valid")
        });

        re.replace_all(content, |caps: &Captures| {
            std::env::var(&caps[1]).unwrap_or_default()
        })
        .into_owned()
    }

    pub fn bind_address(&self) -> Option<&str> {
        self.server.bind.as_deref().filter(|b| !b.trim().is_empty())
    }

    pub fn to_relay_config(&self) -> Result<RelayConfig> {
        let text = |value: &Option<String>| {
            value
                .as_ref()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let defaults = RelayConfig::default();
        Ok(RelayConfig {
            api_key: text(&self.email.api_key),
            from_email: text(&self.email.from),
            to_email: text(&self.email.to),
            endpoint: text(&self.email.endpoint).unwrap_or(defaults.endpoint),
            policy: match text(&self.policy.mode) {
                Some(mode) => mode.parse::<ConfigPolicy>()?,
                None => defaults.policy,
            },
            require_phone: self.policy.require_phone.unwrap_or(defaults.require_phone),
        })
    }
}
