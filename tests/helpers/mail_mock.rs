//! Mock email provider server for testing
//!
//! This module provides a mock HTTP server that simulates the
//! transactional email provider's API. It uses wiremock to create
//! configurable mock responses.

use serde_json::{json, Value};
use wiremock::matchers::{header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mock email provider server for testing
pub struct MailMockServer {
    pub server: MockServer,
}

/// Configuration for mock responses
#[derive(Debug, Clone)]
pub struct MockResponseConfig {
    pub success: bool,
    pub delay_ms: Option<u64>,
    pub custom_response: Option<Value>,
}

impl Default for MockResponseConfig {
    fn default() -> Self {
        Self {
            success: true,
            delay_ms: None,
            custom_response: None,
        }
    }
}

impl MailMockServer {
    /// Create a new mock provider server
    pub async fn new() -> Self {
        let server = MockServer::start().await;
        Self { server }
    }

    /// The send-endpoint URL to point the mailer configuration at
    pub fn send_url(&self) -> String {
        format!("{}/v1/send", self.server.uri())
    }

    /// Setup the mock for the send endpoint
    pub async fn mock_send(&self, config: MockResponseConfig) {
        let response_body = config.custom_response.unwrap_or_else(|| {
            if config.success {
                json!({
                    "ok": true,
                    "id": "msg_test_123",
                    "error": null,
                })
            } else {
                json!({
                    "ok": false,
                    "id": null,
                    "error": "recipient rejected",
                })
            }
        });

        let mut template = ResponseTemplate::new(200).set_body_json(response_body);
        if let Some(delay_ms) = config.delay_ms {
            template = template.set_delay(std::time::Duration::from_millis(delay_ms));
        }

        Mock::given(method("POST"))
            .and(path("/v1/send"))
            .and(header_exists("authorization"))
            .respond_with(template)
            .mount(&self.server)
            .await;
    }

    /// Setup the mock to answer with an HTTP error status
    pub async fn mock_send_http_error(&self, status: u16) {
        Mock::given(method("POST"))
            .and(path("/v1/send"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }

    /// Number of send requests the mock has received
    pub async fn send_request_count(&self) -> usize {
        self.server
            .received_requests()
            .await
            .map(|requests| requests.len())
            .unwrap_or(0)
    }
}
