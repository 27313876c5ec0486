use serde_json::json;
use std::sync::Arc;

use casa_bonita_leads::integrations::proxy::ProxyClient;
use casa_bonita_leads::AppConfig;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ProxyClient {
    ProxyClient::new(Arc::new(AppConfig {
        api_base_url: server.uri(),
        ..AppConfig::default()
    }))
}

#[tokio::test]
async fn health_probe_accepts_healthy_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "healthy",
            "token_cache": { "status": "valid" }
        })))
        .mount(&server)
        .await;

    assert_eq!(client_for(&server).probe_health().await, Ok(true));
}

#[tokio::test]
async fn health_probe_reports_unhealthy_answers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({ "status": "degraded" })))
        .mount(&server)
        .await;

    assert_eq!(client_for(&server).probe_health().await, Ok(false));
}

#[tokio::test]
async fn health_probe_errors_when_proxy_is_down() {
    let client = ProxyClient::new(Arc::new(AppConfig {
        api_base_url: "http://127.0.0.1:1".to_string(),
        ..AppConfig::default()
    }));

    let err = client.probe_health().await.expect_err("unreachable");
    assert!(err.contains("Is the proxy running?"));
}

#[tokio::test]
async fn fallback_returns_status_without_inspecting_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/mantra/contact"))
        .respond_with(ResponseTemplate::new(422).set_body_string("not json"))
        .mount(&server)
        .await;

    let contact = casa_bonita_leads::integrations::ContactPayload {
        name: "Ana".to_string(),
        phone: "987654321".to_string(),
        country_code: "51".to_string(),
        custom_1: "marker".to_string(),
        email: None,
    };
    let status = client_for(&server)
        .send_contact(&contact)
        .await
        .expect("request completes");
    assert_eq!(status.as_u16(), 422);
}
