use crate::config::RelayConfig;
use crate::domain::{DemoRequest, OutboundEmail};
use chrono::{DateTime, SecondsFormat, Utc};

pub const MESSAGE_PREVIEW_CHARS: usize = 200;

pub fn subject(request: &DemoRequest) -> String {
    format!("Demo Request — {} ({})", request.company, request.name)
}

/// Plain-text notification body, one field per line with no spacer lines.
/// Optional fields without a value get no line.
pub fn body(request: &DemoRequest, submitted_at: DateTime<Utc>) -> String {
    let optional = [
        ("Phone", &request.phone),
        ("Address", &request.address),
        ("Primary service", &request.primary_service),
        ("CRM", &request.crm),
        ("Monthly lead volume", &request.lead_volume),
        ("Start with", &request.start_with),
        ("Message", &request.message),
    ];

    let mut lines = vec![
        "New demo request received:".to_string(),
        format!("Company: {}", request.company),
        format!("Name: {}", request.name),
        format!("Email: {}", request.email),
    ];
    lines.extend(
        optional
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(label, value)| format!("{}: {}", label, value)),
    );
    lines.push(format!(
        "Submitted at: {}",
        submitted_at.to_rfc3339_opts(SecondsFormat::Millis, true)
    ));

    lines.join("\n")
}

pub fn compose_email(
    request: &DemoRequest,
    config: &RelayConfig,
    submitted_at: DateTime<Utc>,
) -> OutboundEmail {
    OutboundEmail {
        from: config.sender_address().to_string(),
        to: vec![config.recipient_address().to_string()],
        // 回信直接寄給客戶
        reply_to: request.email.clone(),
        subject: subject(request),
        text: body(request, submitted_at),
    }
}

/// 截斷長文字供日誌使用 (以字元計算，不切斷 UTF-8)
pub fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    // 省略號也算一個字元
    let kept: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn submitted_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 14, 30, 0).unwrap()
    }

    fn acme() -> DemoRequest {
        DemoRequest::from_json(&json!({
            "company": "Acme",
            "name": "Jo",
            "email": "jo@acme.com",
        }))
    }

    #[test]
    fn test_subject_mentions_company_and_name() {
        assert_eq!(subject(&acme()), "Demo Request — Acme (Jo)");
    }

    #[test]
    fn test_body_with_required_fields_only() {
        let text = body(&acme(), submitted_at());

        assert_eq!(
            text,
            "New demo request received:\n\
             Company: Acme\n\
             Name: Jo\n\
             Email: jo@acme.com\n\
             Submitted at: 2024-05-01T14:30:00.000Z"
        );
    }

    #[test]
    fn test_body_includes_phone_only_when_present() {
        let mut request = acme();
        request.phone = "555-1234".to_string();

        let with_phone = body(&request, submitted_at());
        assert!(with_phone.contains("\nPhone: 555-1234\n"));

        let without_phone = body(&acme(), submitted_at());
        assert!(!without_phone.contains("Phone"));
        assert!(without_phone.lines().all(|line| !line.is_empty()));
    }

    #[test]
    fn test_body_orders_optional_fields() {
        let request = DemoRequest::from_json(&json!({
            "company": "Acme",
            "name": "Jo",
            "email": "jo@acme.com",
            "message": "Call after 5",
            "crm": "HubSpot",
            "primaryService": "Roofing",
            "leadVolume": "100-250",
        }));

        let text = body(&request, submitted_at());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            &lines[4..8],
            &[
                "Primary service: Roofing",
                "CRM: HubSpot",
                "Monthly lead volume: 100-250",
                "Message: Call after 5",
            ]
        );
    }

    #[test]
    fn test_compose_email_routes_replies_to_lead() {
        let config = RelayConfig {
            from_email: Some("demo@example.com".to_string()),
            to_email: Some("sales@example.com".to_string()),
            ..RelayConfig::default()
        };

        let email = compose_email(&acme(), &config, submitted_at());

        assert_eq!(email.from, "demo@example.com");
        assert_eq!(email.to, vec!["sales@example.com".to_string()]);
        assert_eq!(email.reply_to, "jo@acme.com");
        assert_eq!(email.subject, "Demo Request — Acme (Jo)");
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        assert_eq!(preview("short", 200), "short");
        assert_eq!(preview("héllo wörld", 6), "héllo…");
        assert_eq!(preview("exactly", 7), "exactly");
        assert_eq!(preview(&"x".repeat(250), MESSAGE_PREVIEW_CHARS).chars().count(), 200);
    }
}
