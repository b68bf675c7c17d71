//! Transactional email service implementation
//!
//! This service handles delivery of OTP and welcome mail through the
//! external email provider's HTTP API, including client setup, message
//! templating, response parsing, and error handling. With delivery
//! disabled the rendered mail is logged instead of sent, which keeps
//! local development free of provider credentials.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::config::settings::Settings;
use crate::utils::errors::{AppError, MailError, Result};

/// Mail template structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailTemplate {
    pub key: String,
    pub subject: String,
    pub body: String,
}

/// Outgoing mail request
#[derive(Debug, Clone)]
pub struct MailRequest {
    pub recipient: String,
    pub template_key: String,
    pub parameters: HashMap<String, String>,
}

/// Provider API request payload
#[derive(Debug, Serialize)]
struct ProviderPayload<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    body: &'a str,
}

/// Provider API response structure
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderResponse {
    pub ok: bool,
    pub id: Option<String>,
    pub error: Option<String>,
}

/// Delivery statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailStats {
    pub total_sent: u64,
    pub total_failed: u64,
}

/// Mailer service for OTP and notification delivery
#[derive(Clone)]
pub struct MailerService {
    client: Client,
    settings: Settings,
    templates: HashMap<String, MailTemplate>,
    sent: Arc<AtomicU64>,
    failed: Arc<AtomicU64>,
}

impl MailerService {
    /// Create a new MailerService instance
    pub fn new(settings: Settings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.mailer.timeout_seconds))
            .user_agent("CS-Rippers/1.0")
            .build()
            .map_err(AppError::Http)?;

        Ok(Self {
            client,
            settings,
            templates: Self::load_default_templates(),
            sent: Arc::new(AtomicU64::new(0)),
            failed: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Send a mail using a template
    pub async fn send(&self, request: MailRequest) -> Result<()> {
        debug!(recipient = %request.recipient, template_key = %request.template_key, "Sending mail");

        let (subject, body) =
            self.format_message(&request.template_key, &request.parameters)?;

        if !self.is_enabled() {
            info!(
                recipient = %request.recipient,
                template_key = %request.template_key,
                subject = %subject,
                body = %body,
                "Email delivery disabled, logging mail instead of sending"
            );
            return Ok(());
        }

        match self.deliver(&request.recipient, &subject, &body).await {
            Ok(()) => {
                self.sent.fetch_add(1, Ordering::Relaxed);
                crate::utils::logging::log_mail_delivery(
                    &request.recipient,
                    &request.template_key,
                    true,
                );
                Ok(())
            }
            Err(e) => {
                self.failed.fetch_add(1, Ordering::Relaxed);
                crate::utils::logging::log_mail_delivery(
                    &request.recipient,
                    &request.template_key,
                    false,
                );
                error!(recipient = %request.recipient, error = %e, "Failed to send mail");
                Err(AppError::Mail(e))
            }
        }
    }

    /// Send the OTP code for a login or registration flow
    pub async fn send_otp(
        &self,
        recipient: &str,
        name: &str,
        code: &str,
        purpose: crate::state::VerificationPurpose,
    ) -> Result<()> {
        let template_key = match purpose {
            crate::state::VerificationPurpose::Registration => "otp_registration",
            crate::state::VerificationPurpose::Login => "otp_login",
        };

        let mut parameters = HashMap::new();
        parameters.insert("name".to_string(), name.to_string());
        parameters.insert("code".to_string(), code.to_string());
        parameters.insert(
            "minutes".to_string(),
            (self.settings.auth.otp_ttl_seconds / 60).max(1).to_string(),
        );

        self.send(MailRequest {
            recipient: recipient.to_string(),
            template_key: template_key.to_string(),
            parameters,
        })
        .await
    }

    /// Send the welcome mail after a verified registration
    pub async fn send_welcome(&self, recipient: &str, name: &str) -> Result<()> {
        let mut parameters = HashMap::new();
        parameters.insert("name".to_string(), name.to_string());

        self.send(MailRequest {
            recipient: recipient.to_string(),
            template_key: "welcome".to_string(),
            parameters,
        })
        .await
    }

    /// Make the actual provider API request
    async fn deliver(&self, recipient: &str, subject: &str, body: &str) -> MailResultUnit {
        let payload = ProviderPayload {
            from: &self.settings.mailer.sender,
            to: recipient,
            subject,
            body,
        };

        let response = self
            .client
            .post(&self.settings.mailer.api_url)
            .bearer_auth(&self.settings.mailer.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    MailError::Timeout
                } else if e.is_connect() {
                    MailError::ServiceUnavailable
                } else {
                    MailError::RequestFailed(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(MailError::RequestFailed(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let provider_response: ProviderResponse = response
            .json()
            .await
            .map_err(|e| MailError::InvalidResponse(e.to_string()))?;

        if !provider_response.ok {
            return Err(MailError::RequestFailed(
                provider_response
                    .error
                    .unwrap_or_else(|| "provider returned ok: false".to_string()),
            ));
        }

        debug!(message_id = ?provider_response.id, "Provider accepted mail");
        Ok(())
    }

    /// Render subject and body for a template
    fn format_message(
        &self,
        template_key: &str,
        parameters: &HashMap<String, String>,
    ) -> Result<(String, String)> {
        let template = self
            .templates
            .get(template_key)
            .ok_or_else(|| AppError::Mail(MailError::UnknownTemplate(template_key.to_string())))?;

        let mut subject = template.subject.clone();
        let mut body = template.body.clone();

        for (key, value) in parameters {
            let placeholder = format!("{{{}}}", key);
            subject = subject.replace(&placeholder, value);
            body = body.replace(&placeholder, value);
        }

        Ok((subject, body))
    }

    /// Built-in templates
    fn load_default_templates() -> HashMap<String, MailTemplate> {
        let mut templates = HashMap::new();

        templates.insert(
            "otp_registration".to_string(),
            MailTemplate {
                key: "otp_registration".to_string(),
                subject: "Your CS Rippers verification code".to_string(),
                body: "Hi {name},\n\nYour verification code is {code}. It expires in {minutes} minutes.\n\nIf you did not sign up for CS Rippers, you can ignore this mail.".to_string(),
            },
        );

        templates.insert(
            "otp_login".to_string(),
            MailTemplate {
                key: "otp_login".to_string(),
                subject: "Your CS Rippers login code".to_string(),
                body: "Hi {name},\n\nYour login code is {code}. It expires in {minutes} minutes.\n\nIf this wasn't you, please reset your password.".to_string(),
            },
        );

        templates.insert(
            "welcome".to_string(),
            MailTemplate {
                key: "welcome".to_string(),
                subject: "Welcome to CS Rippers".to_string(),
                body: "Hi {name},\n\nYour account is verified. See you on the leaderboard!".to_string(),
            },
        );

        templates
    }

    /// Check if mail delivery is enabled
    pub fn is_enabled(&self) -> bool {
        self.settings.features.email_delivery
    }

    /// Get delivery statistics
    pub fn stats(&self) -> MailStats {
        MailStats {
            total_sent: self.sent.load(Ordering::Relaxed),
            total_failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

type MailResultUnit = std::result::Result<(), MailError>;

impl std::fmt::Debug for MailerService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailerService")
            .field("api_url", &self.settings.mailer.api_url)
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn disabled_mailer() -> MailerService {
        let mut settings = Settings::default();
        settings.features.email_delivery = false;
        MailerService::new(settings).unwrap()
    }

    #[test]
    fn test_format_message() {
        let mailer = disabled_mailer();
        let mut parameters = HashMap::new();
        parameters.insert("name".to_string(), "Dev".to_string());
        parameters.insert("code".to_string(), "482913".to_string());
        parameters.insert("minutes".to_string(), "5".to_string());

        let (subject, body) = mailer.format_message("otp_login", &parameters).unwrap();
        assert!(subject.contains("login code"));
        assert!(body.contains("Hi Dev"));
        assert!(body.contains("482913"));
        assert!(body.contains("5 minutes"));
    }

    #[test]
    fn test_unknown_template() {
        let mailer = disabled_mailer();
        let result = mailer.format_message("nonexistent", &HashMap::new());
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_disabled_delivery_succeeds() {
        let mailer = disabled_mailer();
        let result = mailer.send_otp(
            "dev@csrippers.com",
            "Dev",
            "123456",
            crate::state::VerificationPurpose::Login,
        );
        assert!(result.await.is_ok());
        assert_eq!(mailer.stats().total_sent, 0);
        assert_eq!(mailer.stats().total_failed, 0);
    }

    #[test]
    fn test_provider_response_deserialization() {
        let json = r#"{"ok": true, "id": "msg_123", "error": null}"#;
        let response: ProviderResponse = serde_json::from_str(json).unwrap();
        assert!(response.ok);
        assert_eq!(response.id.as_deref(), Some("msg_123"));
    }
}
