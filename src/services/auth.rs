//! Authentication service implementation
//!
//! This service handles the two-step login and registration flows
//! (password check, OTP issue and verification), password hashing,
//! bearer-token issue/validation, and admin panel authentication.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::settings::Settings;
use crate::database::repositories::UserRepository;
use crate::models::user::{CreateUserRequest, User, UserRole};
use crate::services::mailer::MailerService;
use crate::services::redis::RedisService;
use crate::state::{
    VerificationContext, VerificationOutcome, VerificationPurpose, VerificationStore,
};
use crate::utils::errors::{AppError, Result};
use crate::utils::helpers;

/// Bearer token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: i64,
    pub email: String,
    pub role: UserRole,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// Registration request payload
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub mobile: Option<String>,
    pub password: String,
}

/// Authentication service for the two-step flows and token handling
#[derive(Clone)]
pub struct AuthService {
    user_repository: UserRepository,
    verification_store: VerificationStore,
    mailer: MailerService,
    redis_service: RedisService,
    settings: Settings,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(
        user_repository: UserRepository,
        verification_store: VerificationStore,
        mailer: MailerService,
        redis_service: RedisService,
        settings: Settings,
    ) -> Self {
        Self {
            user_repository,
            verification_store,
            mailer,
            redis_service,
            settings,
        }
    }

    /// Hash a password with Argon2id
    pub fn hash_password(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::PasswordHash(e.to_string()))?;

        Ok(hash.to_string())
    }

    /// Verify a password against a stored hash
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> Result<bool> {
        let parsed = PasswordHash::new(stored_hash)
            .map_err(|e| AppError::PasswordHash(e.to_string()))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }

    /// Issue a signed bearer token for a user
    pub fn issue_token(&self, user: &User) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            role: user.role,
            iat: now.timestamp(),
            exp: (now + chrono::Duration::hours(self.settings.auth.token_ttl_hours)).timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.settings.auth.jwt_secret.as_bytes()),
        )?;

        Ok(token)
    }

    /// Validate a bearer token and return its claims
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.settings.auth.jwt_secret.as_bytes()),
            &Validation::default(),
        )?;

        Ok(data.claims)
    }

    /// Start a registration flow: create the unverified account and email a code
    pub async fn begin_registration(&self, request: RegisterRequest) -> Result<()> {
        if !self.settings.features.registration_open {
            return Err(AppError::ServiceUnavailable(
                "Registration is currently closed".to_string(),
            ));
        }

        let email = helpers::normalize_email(&request.email);
        self.check_rate_limit(&email).await?;

        if !helpers::is_valid_email(&email) {
            return Err(AppError::InvalidInput("Invalid email address".to_string()));
        }
        if request.name.trim().len() < 2 {
            return Err(AppError::InvalidInput(
                "Name must be at least 2 characters".to_string(),
            ));
        }
        if request.password.len() < 8 {
            return Err(AppError::InvalidInput(
                "Password must be at least 8 characters".to_string(),
            ));
        }
        if let Some(ref mobile) = request.mobile {
            if !helpers::is_valid_mobile(mobile) {
                return Err(AppError::InvalidInput("Invalid mobile number".to_string()));
            }
        }

        let password_hash = self.hash_password(&request.password)?;

        let user = match self.user_repository.find_by_email(&email).await? {
            Some(existing) if existing.is_verified => {
                warn!(email = %email, "Registration attempt for existing verified account");
                return Err(AppError::InvalidInput(
                    "An account with this email already exists".to_string(),
                ));
            }
            // An unverified account restarts its flow with fresh credentials.
            Some(existing) => {
                self.user_repository
                    .set_password_hash(existing.id, &password_hash)
                    .await?;
                existing
            }
            None => {
                self.user_repository
                    .create(CreateUserRequest {
                        email: email.clone(),
                        name: request.name.trim().to_string(),
                        mobile: request.mobile,
                        password_hash,
                        role: None,
                    })
                    .await?
            }
        };

        self.issue_otp(&user, VerificationPurpose::Registration).await?;
        crate::utils::logging::log_auth_event(&email, "registration_started", true);

        Ok(())
    }

    /// Start a login flow: check the password and email a code
    pub async fn begin_login(&self, email: &str, password: &str) -> Result<()> {
        let email = helpers::normalize_email(email);
        self.check_rate_limit(&email).await?;

        let user = match self.user_repository.find_by_email(&email).await? {
            Some(user) => user,
            None => {
                crate::utils::logging::log_auth_event(&email, "login_password", false);
                return Err(AppError::InvalidCredentials);
            }
        };

        if !user.is_active {
            warn!(user_id = user.id, "Login attempt on disabled account");
            return Err(AppError::AccountDisabled);
        }

        if !self.verify_password(password, &user.password_hash)? {
            crate::utils::logging::log_auth_event(&email, "login_password", false);
            return Err(AppError::InvalidCredentials);
        }

        self.issue_otp(&user, VerificationPurpose::Login).await?;
        crate::utils::logging::log_auth_event(&email, "login_password", true);

        Ok(())
    }

    /// Complete a flow by checking the submitted code.
    ///
    /// A matching code deletes the pending context and returns the user
    /// with a fresh token. A mismatch consumes one attempt; the final
    /// mismatch clears the pending state entirely, reverting the flow.
    pub async fn verify_otp(
        &self,
        email: &str,
        code: &str,
        purpose: VerificationPurpose,
    ) -> Result<(User, String)> {
        let email = helpers::normalize_email(email);

        let mut context = self
            .verification_store
            .load(purpose, &email)
            .await?
            .ok_or(AppError::OtpExpired)?;

        match context.check_code(code) {
            VerificationOutcome::Verified => {
                self.verification_store.delete(purpose, &email).await?;

                let mut user = self
                    .user_repository
                    .find_by_id(context.user_id)
                    .await?
                    .ok_or(AppError::UserNotFound {
                        user_id: context.user_id,
                    })?;

                // A completed code round-trip proves email ownership
                // regardless of which flow issued it.
                if !user.is_verified {
                    user = self.user_repository.mark_verified(user.id).await?;

                    if purpose == VerificationPurpose::Registration {
                        // Welcome mail failures must not fail the verification.
                        if let Err(e) = self.mailer.send_welcome(&user.email, &user.name).await {
                            warn!(email = %email, error = %e, "Failed to send welcome mail");
                        }
                    }
                }

                let token = self.issue_token(&user)?;
                info!(user_id = user.id, purpose = %purpose, "OTP verified, session issued");
                crate::utils::logging::log_auth_event(&email, "otp_verify", true);

                Ok((user, token))
            }
            VerificationOutcome::Mismatch { attempts_remaining } => {
                self.verification_store.save(&context).await?;
                crate::utils::logging::log_auth_event(&email, "otp_verify", false);
                Err(AppError::OtpMismatch { attempts_remaining })
            }
            VerificationOutcome::Exhausted => {
                self.verification_store.delete(purpose, &email).await?;
                warn!(email = %email, purpose = %purpose, "OTP attempts exhausted, pending flow cleared");
                crate::utils::logging::log_auth_event(&email, "otp_verify", false);
                Err(AppError::OtpMismatch {
                    attempts_remaining: 0,
                })
            }
        }
    }

    /// Complete a flow when the client did not state its purpose
    pub async fn verify_otp_any(&self, email: &str, code: &str) -> Result<(User, String)> {
        let normalized = helpers::normalize_email(email);

        let purpose = if self
            .verification_store
            .exists(VerificationPurpose::Registration, &normalized)
            .await?
        {
            VerificationPurpose::Registration
        } else {
            VerificationPurpose::Login
        };

        self.verify_otp(email, code, purpose).await
    }

    /// Admin panel login: password-only, restricted to the admin role
    pub async fn admin_login(&self, email: &str, password: &str) -> Result<(User, String)> {
        let email = helpers::normalize_email(email);
        self.check_rate_limit(&email).await?;

        let user = self
            .user_repository
            .find_by_email(&email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if user.role != UserRole::Admin {
            warn!(user_id = user.id, "Admin login attempt by non-admin account");
            return Err(AppError::PermissionDenied(
                "Admin privileges required".to_string(),
            ));
        }

        if !user.is_active {
            return Err(AppError::AccountDisabled);
        }

        if !self.verify_password(password, &user.password_hash)? {
            crate::utils::logging::log_auth_event(&email, "admin_login", false);
            return Err(AppError::InvalidCredentials);
        }

        let token = self.issue_token(&user)?;
        crate::utils::logging::log_auth_event(&email, "admin_login", true);

        Ok((user, token))
    }

    /// Generate, persist and deliver a fresh OTP, replacing any pending one
    async fn issue_otp(&self, user: &User, purpose: VerificationPurpose) -> Result<()> {
        let code = helpers::generate_otp_code(self.settings.auth.otp_length);

        let context = VerificationContext::new(
            &user.email,
            user.id,
            purpose,
            code.clone(),
            self.settings.auth.otp_ttl_seconds,
            self.settings.auth.otp_max_attempts,
        );

        self.verification_store.save(&context).await?;
        self.mailer
            .send_otp(&user.email, &user.name, &code, purpose)
            .await?;

        debug!(user_id = user.id, purpose = %purpose, "OTP issued");
        Ok(())
    }

    /// Reject callers that exceed the per-identifier request budget
    async fn check_rate_limit(&self, identifier: &str) -> Result<()> {
        let allowed = self
            .redis_service
            .check_rate_limit(
                identifier,
                self.settings.auth.rate_limit_max_requests,
                self.settings.auth.rate_limit_window_seconds,
            )
            .await?;

        if !allowed {
            warn!(identifier = %identifier, "Rate limit exceeded on auth endpoint");
            return Err(AppError::RateLimitExceeded);
        }

        Ok(())
    }
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn test_settings() -> Settings {
        let mut settings = Settings::default();
        settings.auth.jwt_secret = "0123456789abcdef0123456789abcdef".to_string();
        settings.features.email_delivery = false;
        settings
    }

    async fn test_service(settings: Settings) -> Option<AuthService> {
        // Requires a local Redis; skipped silently where unavailable.
        let store = VerificationStore::new(settings.redis.clone()).await.ok()?;
        let pool = sqlx::PgPool::connect_lazy("postgresql://localhost/test").ok()?;
        let repo = UserRepository::new(pool);
        let mailer = MailerService::new(settings.clone()).ok()?;
        let redis_service = RedisService::new(settings.clone()).ok()?;
        Some(AuthService::new(repo, store, mailer, redis_service, settings))
    }

    fn sample_user(password_hash: String) -> User {
        User {
            id: 7,
            email: "dev@csrippers.com".to_string(),
            name: "Dev".to_string(),
            mobile: None,
            role: UserRole::User,
            password_hash,
            is_verified: true,
            is_active: true,
            photo_url: None,
            bio: None,
            location: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_password_hash_roundtrip() {
        let settings = test_settings();
        let Some(service) = test_service(settings).await else {
            return;
        };

        let hash = service.hash_password("hunter2hunter2").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(service.verify_password("hunter2hunter2", &hash).unwrap());
        assert!(!service.verify_password("wrong-password", &hash).unwrap());
    }

    #[tokio::test]
    async fn test_token_roundtrip() {
        let settings = test_settings();
        let Some(service) = test_service(settings.clone()).await else {
            return;
        };

        let hash = service.hash_password("hunter2hunter2").unwrap();
        let user = sample_user(hash);

        let token = service.issue_token(&user).unwrap();
        let claims = service.verify_token(&token).unwrap();

        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.email, user.email);
        assert!(!claims.is_admin());
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[tokio::test]
    async fn test_token_with_wrong_secret_rejected() {
        let settings = test_settings();
        let Some(service) = test_service(settings.clone()).await else {
            return;
        };

        let mut other_settings = settings.clone();
        other_settings.auth.jwt_secret = "ffffffffffffffffffffffffffffffff".to_string();
        let Some(other_service) = test_service(other_settings).await else {
            return;
        };

        let hash = service.hash_password("hunter2hunter2").unwrap();
        let user = sample_user(hash);
        let token = service.issue_token(&user).unwrap();

        assert!(other_service.verify_token(&token).is_err());
    }

    #[tokio::test]
    async fn test_expired_token_rejected() {
        let mut settings = test_settings();
        settings.auth.token_ttl_hours = 1;
        let Some(service) = test_service(settings.clone()).await else {
            return;
        };

        let now = Utc::now() - Duration::hours(3);
        let claims = Claims {
            sub: 7,
            email: "dev@csrippers.com".to_string(),
            role: UserRole::User,
            iat: now.timestamp(),
            exp: (now + Duration::hours(1)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(settings.auth.jwt_secret.as_bytes()),
        )
        .unwrap();

        assert!(service.verify_token(&token).is_err());
    }
}
