//! Verification state storage implementation
//!
//! This module handles persistence of pending OTP verification contexts
//! using Redis, including serialization, expiration, and cleanup.

use redis::AsyncCommands;
use tracing::{debug, error, warn};

use super::context::{VerificationContext, VerificationPurpose};
use crate::config::RedisConfig;
use crate::utils::errors::Result;

/// Redis-based storage for pending verification contexts
#[derive(Clone)]
pub struct VerificationStore {
    /// Redis connection manager
    connection_manager: redis::aio::ConnectionManager,
    /// Redis configuration
    config: RedisConfig,
}

impl VerificationStore {
    /// Create a new verification store
    pub async fn new(config: RedisConfig) -> Result<Self> {
        let client = redis::Client::open(config.url.as_str())?;
        let connection_manager = redis::aio::ConnectionManager::new(client).await?;

        Ok(Self {
            connection_manager,
            config,
        })
    }

    /// Save a pending verification context, bounded by its own expiry
    pub async fn save(&self, context: &VerificationContext) -> Result<()> {
        let key = self.context_key(context.purpose, &context.email);
        debug!(email = %context.email, purpose = %context.purpose, key = %key,
               "Saving verification context");

        let serialized = match serde_json::to_string(context) {
            Ok(data) => data,
            Err(e) => {
                error!(email = %context.email, error = %e, "Failed to serialize verification context");
                return Err(e.into());
            }
        };

        let mut conn = self.connection_manager.clone();

        // Redis TTL follows the context's expiry, never shorter than a minute
        // so a context written near its deadline can still be cleaned up.
        let ttl_seconds = context.remaining_seconds().max(60);

        match conn.set_ex::<_, _, ()>(&key, serialized, ttl_seconds).await {
            Ok(_) => {
                debug!(email = %context.email, ttl_seconds = ttl_seconds, "Verification context saved");
                Ok(())
            }
            Err(e) => {
                error!(email = %context.email, error = %e, "Failed to save verification context");
                Err(e.into())
            }
        }
    }

    /// Load the pending context for an email, dropping it if expired
    pub async fn load(
        &self,
        purpose: VerificationPurpose,
        email: &str,
    ) -> Result<Option<VerificationContext>> {
        let key = self.context_key(purpose, email);
        let mut conn = self.connection_manager.clone();

        let serialized: Option<String> = match conn.get::<&str, Option<String>>(&key).await {
            Ok(data) => data,
            Err(e) => {
                error!(email = %email, error = %e, "Failed to get verification context from Redis");
                return Err(e.into());
            }
        };

        match serialized {
            Some(data) => {
                let context: VerificationContext = match serde_json::from_str(&data) {
                    Ok(ctx) => ctx,
                    Err(e) => {
                        error!(email = %email, error = %e, "Failed to deserialize verification context");
                        self.delete(purpose, email).await?;
                        return Ok(None);
                    }
                };

                if context.is_expired() {
                    warn!(email = %email, purpose = %purpose, "Verification context has expired, removing");
                    self.delete(purpose, email).await?;
                    return Ok(None);
                }

                debug!(email = %email, purpose = %purpose,
                       attempts_remaining = context.attempts_remaining,
                       "Verification context loaded");
                Ok(Some(context))
            }
            None => {
                debug!(email = %email, purpose = %purpose, "No verification context found");
                Ok(None)
            }
        }
    }

    /// Delete the pending context for an email
    pub async fn delete(&self, purpose: VerificationPurpose, email: &str) -> Result<()> {
        let key = self.context_key(purpose, email);
        let mut conn = self.connection_manager.clone();

        let deleted: u32 = conn.del(&key).await?;

        if deleted > 0 {
            debug!(email = %email, purpose = %purpose, "Deleted verification context");
        }

        Ok(())
    }

    /// Check if a pending context exists for an email
    pub async fn exists(&self, purpose: VerificationPurpose, email: &str) -> Result<bool> {
        let key = self.context_key(purpose, email);
        let mut conn = self.connection_manager.clone();

        let exists: bool = conn.exists(&key).await?;
        Ok(exists)
    }

    /// Count pending contexts (for monitoring)
    pub async fn pending_count(&self) -> Result<usize> {
        let pattern = format!("{}otp:*", self.config.prefix);
        let mut conn = self.connection_manager.clone();

        let keys: Vec<String> = conn.keys(&pattern).await?;
        Ok(keys.len())
    }

    /// Test Redis connection
    pub async fn test_connection(&self) -> Result<()> {
        let mut conn = self.connection_manager.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }

    /// Get the Redis key for a pending verification
    fn context_key(&self, purpose: VerificationPurpose, email: &str) -> String {
        format!("{}otp:{}:{}", self.config.prefix, purpose, email)
    }
}

impl std::fmt::Debug for VerificationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerificationStore")
            .field("prefix", &self.config.prefix)
            .finish()
    }
}
