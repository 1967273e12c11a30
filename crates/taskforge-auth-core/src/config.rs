//! Configuration for the auth core

use std::time::Duration;

/// Auth core configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Shared secret for token signing (HS256)
    pub token_secret: String,
    /// Access token lifetime
    pub access_token_ttl: Duration,
    /// Refresh token lifetime
    pub refresh_token_ttl: Duration,
    /// Password-reset token lifetime
    pub reset_token_ttl: Duration,
    /// Email-verification token lifetime
    pub verification_token_ttl: Duration,
    /// Minimum acceptable password length
    pub password_min_length: usize,
}

impl AuthConfig {
    /// Minimum allowed secret length in bytes (256 bits)
    pub const MIN_SECRET_LENGTH: usize = 32;

    /// Create a config with default lifetimes
    ///
    /// Defaults: access 30 minutes, refresh 7 days, reset 1 hour,
    /// verification 24 hours, minimum password length 8.
    ///
    /// # Errors
    /// Returns an error if the secret is shorter than 32 bytes.
    pub fn new(token_secret: impl Into<String>) -> Result<Self, ConfigError> {
        let token_secret = token_secret.into();
        if token_secret.len() < Self::MIN_SECRET_LENGTH {
            return Err(ConfigError::SecretTooShort {
                actual: token_secret.len(),
                minimum: Self::MIN_SECRET_LENGTH,
            });
        }
        Ok(Self {
            token_secret,
            access_token_ttl: Duration::from_secs(30 * 60),
            refresh_token_ttl: Duration::from_secs(7 * 24 * 60 * 60),
            reset_token_ttl: Duration::from_secs(60 * 60),
            verification_token_ttl: Duration::from_secs(24 * 60 * 60),
            password_min_length: 8,
        })
    }

    /// Load configuration from environment variables
    ///
    /// `SECRET_KEY` is required; `ACCESS_TOKEN_EXPIRE_MINUTES`,
    /// `REFRESH_TOKEN_EXPIRE_DAYS`, and `PASSWORD_MIN_LENGTH` override the
    /// defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let secret = std::env::var("SECRET_KEY").map_err(|_| ConfigError::Missing("SECRET_KEY"))?;
        let mut config = Self::new(secret)?;

        if let Ok(minutes) = std::env::var("ACCESS_TOKEN_EXPIRE_MINUTES") {
            let minutes: u64 = minutes
                .parse()
                .map_err(|_| ConfigError::Invalid("ACCESS_TOKEN_EXPIRE_MINUTES"))?;
            config.access_token_ttl = Duration::from_secs(minutes * 60);
        }

        if let Ok(days) = std::env::var("REFRESH_TOKEN_EXPIRE_DAYS") {
            let days: u64 = days
                .parse()
                .map_err(|_| ConfigError::Invalid("REFRESH_TOKEN_EXPIRE_DAYS"))?;
            config.refresh_token_ttl = Duration::from_secs(days * 24 * 60 * 60);
        }

        if let Ok(len) = std::env::var("PASSWORD_MIN_LENGTH") {
            config.password_min_length = len
                .parse()
                .map_err(|_| ConfigError::Invalid("PASSWORD_MIN_LENGTH"))?;
        }

        Ok(config)
    }

    /// Set access token lifetime
    pub fn with_access_token_ttl(mut self, ttl: Duration) -> Self {
        self.access_token_ttl = ttl;
        self
    }

    /// Set refresh token lifetime
    pub fn with_refresh_token_ttl(mut self, ttl: Duration) -> Self {
        self.refresh_token_ttl = ttl;
        self
    }

    /// Set password-reset token lifetime
    pub fn with_reset_token_ttl(mut self, ttl: Duration) -> Self {
        self.reset_token_ttl = ttl;
        self
    }

    /// Set email-verification token lifetime
    pub fn with_verification_token_ttl(mut self, ttl: Duration) -> Self {
        self.verification_token_ttl = ttl;
        self
    }

    /// Set minimum password length
    pub fn with_password_min_length(mut self, min: usize) -> Self {
        self.password_min_length = min;
        self
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),

    #[error("token secret too short: got {actual} bytes, need at least {minimum}")]
    SecretTooShort { actual: usize, minimum: usize },
}
