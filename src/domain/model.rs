use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 一筆 demo 申請 (lead)，所有欄位皆已 trim
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DemoRequest {
    pub company: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub primary_service: String,
    pub crm: String,
    pub lead_volume: String,
    pub message: String,
    pub address: String,
    pub start_with: String,
}

impl DemoRequest {
    /// Builds a request from a decoded form body.
    ///
    /// Anything other than a JSON object is treated as an empty form, so the
    /// required-field check rejects it.
    pub fn from_json(body: &Value) -> Self {
        let field = |keys: &[&str]| {
            keys.iter()
                .map(|key| coerce_field(body.get(*key)))
                .find(|value| !value.is_empty())
                .unwrap_or_default()
        };

        if !body.is_object() {
            return Self::default();
        }

        Self {
            company: field(&["company"]),
            name: field(&["name"]),
            email: field(&["email"]),
            phone: field(&["phone"]),
            primary_service: field(&["primaryService", "service"]),
            crm: field(&["crm"]),
            lead_volume: field(&["leadVolume"]),
            message: field(&["message", "questions"]),
            address: field(&["address"]),
            start_with: field(&["startWith"]),
        }
    }

    /// Required fields that are empty, in payload order.
    pub fn missing_required(&self, require_phone: bool) -> Vec<&'static str> {
        let mut checks = vec![
            ("company", &self.company),
            ("name", &self.name),
            ("email", &self.email),
        ];
        if require_phone {
            checks.push(("phone", &self.phone));
        }

        checks
            .into_iter()
            .filter(|(_, value)| value.is_empty())
            .map(|(key, _)| key)
            .collect()
    }
}

/// 欄位轉字串：字串/數字/true 保留，其它 (null、false、陣列、物件) 視為空白
fn coerce_field(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(true)) => "true".to_string(),
        _ => String::new(),
    }
}

/// Provider 請求本體，欄位名稱直接對應 Resend API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundEmail {
    pub from: String,
    pub to: Vec<String>,
    pub reply_to: String,
    pub subject: String,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendReceipt {
    pub id: Option<String>,
}
