#![cfg(feature = "cli")]

use demo_relay::adapters::server::serve;
use demo_relay::{DemoRequestHandler, RelayConfig, ResendSender};
use httpmock::prelude::*;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

struct RunningServer {
    addr: SocketAddr,
    stop: oneshot::Sender<()>,
    task: JoinHandle<demo_relay::Result<()>>,
}

impl RunningServer {
    fn url(&self) -> String {
        format!("http://{}/api/demo", self.addr)
    }

    async fn shutdown(self) {
        let _ = self.stop.send(());
        self.task.await.unwrap().unwrap();
    }
}

async fn start(config: RelayConfig) -> RunningServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop, stopped) = oneshot::channel::<()>();

    let sender = ResendSender::from_config(&config);
    let handler = Arc::new(DemoRequestHandler::new(config, sender));
    let task = tokio::spawn(serve(listener, handler, async move {
        let _ = stopped.await;
    }));

    RunningServer { addr, stop, task }
}

#[tokio::test]
async fn test_preflight_and_method_checks_over_http() {
    let server = start(RelayConfig::default()).await;
    let client = reqwest::Client::new();

    let preflight = client
        .request(reqwest::Method::OPTIONS, server.url())
        .send()
        .await
        .unwrap();
    assert_eq!(preflight.status(), 204);
    assert_eq!(
        preflight.headers()["access-control-allow-methods"],
        "POST, OPTIONS"
    );
    assert!(preflight.text().await.unwrap().is_empty());

    let get = client.get(server.url()).send().await.unwrap();
    assert_eq!(get.status(), 405);
    assert_eq!(get.headers()["allow"], "POST, OPTIONS");

    server.shutdown().await;
}

#[tokio::test]
async fn test_invalid_and_empty_bodies_over_http() {
    let server = start(RelayConfig::default()).await;
    let client = reqwest::Client::new();

    let invalid = client
        .post(server.url())
        .header("Content-Type", "application/json")
        .body("{oops")
        .send()
        .await
        .unwrap();
    assert_eq!(invalid.status(), 400);
    let payload: Value = invalid.json().await.unwrap();
    assert_eq!(payload["error"], "Invalid JSON body");

    let empty = client.post(server.url()).send().await.unwrap();
    assert_eq!(empty.status(), 400);
    let payload: Value = empty.json().await.unwrap();
    assert_eq!(payload["required"], json!(["company", "name", "email"]));

    server.shutdown().await;
}

#[tokio::test]
async fn test_post_relays_to_provider_over_http() {
    let provider = MockServer::start_async().await;
    let resend_mock = provider
        .mock_async(|when, then| {
            when.method(POST)
                .path("/emails")
                .json_body_partial(r#"{ "reply_to": "jo@acme.com" }"#);
            then.status(200).json_body(json!({ "id": "abc123" }));
        })
        .await;

    let server = start(RelayConfig {
        api_key: Some("re_test_key".to_string()),
        endpoint: provider.url("/emails"),
        ..RelayConfig::default()
    })
    .await;

    let response = reqwest::Client::new()
        .post(server.url())
        .json(&json!({ "company": "Acme", "name": "Jo", "email": "jo@acme.com" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
    let payload: Value = response.json().await.unwrap();
    assert_eq!(payload, json!({ "ok": true, "id": "abc123" }));
    resend_mock.assert_async().await;

    server.shutdown().await;
}

#[tokio::test]
async fn test_strict_host_starts_and_answers_missing_config_per_request() {
    use demo_relay::utils::validation::Validate;
    use demo_relay::ConfigPolicy;

    let config = RelayConfig {
        policy: ConfigPolicy::Strict,
        to_email: Some("sales@example.com".to_string()),
        ..RelayConfig::default()
    };
    // 啟動前的驗證不因缺漏設定失敗
    config.validate().unwrap();

    let server = start(config).await;

    let response = reqwest::Client::new()
        .post(server.url())
        .json(&json!({ "company": "Acme", "name": "Jo", "email": "jo@acme.com" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 500);
    let payload: Value = response.json().await.unwrap();
    assert_eq!(
        payload["missing"],
        json!({ "RESEND_API_KEY": true, "DEMO_FROM_EMAIL": true, "DEMO_TO_EMAIL": false })
    );

    server.shutdown().await;
}
