//! Mailer service tests against a mock email provider

mod helpers;

use helpers::*;
use serial_test::serial;

use cs_rippers::services::MailerService;
use cs_rippers::state::VerificationPurpose;
use cs_rippers::utils::errors::AppError;

#[tokio::test]
#[serial]
async fn test_otp_mail_delivered() {
    let mock = MailMockServer::new().await;
    mock.mock_send(MockResponseConfig::default()).await;

    let settings = test_settings_with_mailer(&mock.send_url());
    let mailer = MailerService::new(settings).unwrap();

    let result = mailer
        .send_otp("dev@csrippers.com", "Dev", "482913", VerificationPurpose::Login)
        .await;

    assert!(result.is_ok());
    assert_eq!(mock.send_request_count().await, 1);
    assert_eq!(mailer.stats().total_sent, 1);
    assert_eq!(mailer.stats().total_failed, 0);
}

#[tokio::test]
#[serial]
async fn test_provider_rejection_surfaces_as_error() {
    let mock = MailMockServer::new().await;
    mock.mock_send(MockResponseConfig {
        success: false,
        ..Default::default()
    })
    .await;

    let settings = test_settings_with_mailer(&mock.send_url());
    let mailer = MailerService::new(settings).unwrap();

    let result = mailer.send_welcome("dev@csrippers.com", "Dev").await;

    assert!(matches!(result, Err(AppError::Mail(_))));
    assert_eq!(mailer.stats().total_failed, 1);
}

#[tokio::test]
#[serial]
async fn test_provider_http_error_surfaces_as_error() {
    let mock = MailMockServer::new().await;
    mock.mock_send_http_error(500).await;

    let settings = test_settings_with_mailer(&mock.send_url());
    let mailer = MailerService::new(settings).unwrap();

    let result = mailer
        .send_otp(
            "dev@csrippers.com",
            "Dev",
            "482913",
            VerificationPurpose::Registration,
        )
        .await;

    assert!(matches!(result, Err(AppError::Mail(_))));
}

#[tokio::test]
#[serial]
async fn test_provider_timeout_surfaces_as_error() {
    let mock = MailMockServer::new().await;
    mock.mock_send(MockResponseConfig {
        delay_ms: Some(3_000),
        ..Default::default()
    })
    .await;

    let mut settings = test_settings_with_mailer(&mock.send_url());
    settings.mailer.timeout_seconds = 1;
    let mailer = MailerService::new(settings).unwrap();

    let result = mailer.send_welcome("dev@csrippers.com", "Dev").await;

    assert!(matches!(result, Err(AppError::Mail(_))));
}

#[tokio::test]
#[serial]
async fn test_disabled_delivery_never_calls_provider() {
    let mock = MailMockServer::new().await;
    mock.mock_send(MockResponseConfig::default()).await;

    let mut settings = test_settings_with_mailer(&mock.send_url());
    settings.features.email_delivery = false;
    let mailer = MailerService::new(settings).unwrap();

    let result = mailer
        .send_otp("dev@csrippers.com", "Dev", "482913", VerificationPurpose::Login)
        .await;

    assert!(result.is_ok());
    assert_eq!(mock.send_request_count().await, 0);
}
