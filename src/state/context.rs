//! Verification flow context management
//!
//! This module models the pending side of the two-step login and
//! registration flows: the code that was emailed, how many attempts are
//! left, and when the whole flow expires.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Why a verification code was issued
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationPurpose {
    Registration,
    Login,
}

impl std::fmt::Display for VerificationPurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerificationPurpose::Registration => write!(f, "registration"),
            VerificationPurpose::Login => write!(f, "login"),
        }
    }
}

/// Outcome of checking a submitted code against the pending context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationOutcome {
    /// Code matched, flow is complete
    Verified,
    /// Code did not match, attempts remain
    Mismatch { attempts_remaining: u32 },
    /// Code did not match and the attempt budget is spent
    Exhausted,
}

/// Pending OTP verification state for one email address
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationContext {
    /// Normalized email the code was sent to
    pub email: String,
    /// User the flow belongs to
    pub user_id: i64,
    /// Whether this flow completes a registration or a login
    pub purpose: VerificationPurpose,
    /// The emailed code
    pub code: String,
    /// Wrong submissions still allowed
    pub attempts_remaining: u32,
    /// When this flow expires
    pub expires_at: DateTime<Utc>,
    /// When this flow was started
    pub created_at: DateTime<Utc>,
}

impl VerificationContext {
    /// Create a new pending verification
    pub fn new(
        email: &str,
        user_id: i64,
        purpose: VerificationPurpose,
        code: String,
        ttl_seconds: u64,
        max_attempts: u32,
    ) -> Self {
        let now = Utc::now();
        Self {
            email: email.to_string(),
            user_id,
            purpose,
            code,
            attempts_remaining: max_attempts,
            expires_at: now + Duration::seconds(ttl_seconds as i64),
            created_at: now,
        }
    }

    /// Check if the flow has expired
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// Seconds until expiry, clamped to zero
    pub fn remaining_seconds(&self) -> u64 {
        (self.expires_at - Utc::now()).num_seconds().max(0) as u64
    }

    /// Check a submitted code, consuming one attempt on mismatch
    pub fn check_code(&mut self, submitted: &str) -> VerificationOutcome {
        if submitted == self.code {
            return VerificationOutcome::Verified;
        }

        self.attempts_remaining = self.attempts_remaining.saturating_sub(1);
        if self.attempts_remaining == 0 {
            VerificationOutcome::Exhausted
        } else {
            VerificationOutcome::Mismatch {
                attempts_remaining: self.attempts_remaining,
            }
        }
    }

    /// Create a summary of the context for logging
    pub fn summary(&self) -> ContextSummary {
        ContextSummary {
            email: self.email.clone(),
            user_id: self.user_id,
            purpose: self.purpose,
            attempts_remaining: self.attempts_remaining,
            expires_at: self.expires_at,
        }
    }
}

/// Context summary for logging and debugging, without the code itself
#[derive(Debug, Clone, Serialize)]
pub struct ContextSummary {
    pub email: String,
    pub user_id: i64,
    pub purpose: VerificationPurpose,
    pub attempts_remaining: u32,
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending_login() -> VerificationContext {
        VerificationContext::new(
            "dev@csrippers.com",
            42,
            VerificationPurpose::Login,
            "123456".to_string(),
            300,
            3,
        )
    }

    #[test]
    fn test_new_context() {
        let context = pending_login();
        assert_eq!(context.user_id, 42);
        assert_eq!(context.attempts_remaining, 3);
        assert!(!context.is_expired());
        assert!(context.remaining_seconds() > 0);
    }

    #[test]
    fn test_correct_code_verifies() {
        let mut context = pending_login();
        assert_eq!(context.check_code("123456"), VerificationOutcome::Verified);
        // A successful check does not consume an attempt.
        assert_eq!(context.attempts_remaining, 3);
    }

    #[test]
    fn test_wrong_code_consumes_attempts() {
        let mut context = pending_login();

        assert_eq!(
            context.check_code("000000"),
            VerificationOutcome::Mismatch { attempts_remaining: 2 }
        );
        assert_eq!(
            context.check_code("111111"),
            VerificationOutcome::Mismatch { attempts_remaining: 1 }
        );
        assert_eq!(context.check_code("222222"), VerificationOutcome::Exhausted);
    }

    #[test]
    fn test_correct_code_after_failures() {
        let mut context = pending_login();
        context.check_code("000000");
        assert_eq!(context.check_code("123456"), VerificationOutcome::Verified);
    }

    #[test]
    fn test_expiry() {
        let mut context = pending_login();
        context.expires_at = Utc::now() - Duration::hours(1);
        assert!(context.is_expired());
        assert_eq!(context.remaining_seconds(), 0);
    }

    #[test]
    fn test_summary_hides_code() {
        let context = pending_login();
        let summary = serde_json::to_string(&context.summary()).unwrap();
        assert!(!summary.contains("123456"));
    }
}
