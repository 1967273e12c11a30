//! Signed token codec
//!
//! Compact tamper-evident tokens (HS256 JWTs) carrying subject, email,
//! optional role, a type discriminant, and an absolute expiry. Verification
//! checks the signature first, then the type, then the expiry, so a forged
//! token is indistinguishable from any other rejected token.

use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use taskforge_types::UserId;

use crate::{AuthConfig, AuthError};

/// Token type discriminant embedded in the claim set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Short-lived credential for API calls
    Access,
    /// Long-lived credential used solely to mint new access tokens
    Refresh,
}

impl std::fmt::Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Access => write!(f, "access"),
            Self::Refresh => write!(f, "refresh"),
        }
    }
}

/// Claims embedded in a signed token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Email address
    pub email: String,
    /// Application role (access tokens only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Token type
    #[serde(rename = "type")]
    pub token_type: TokenType,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
}

impl Claims {
    /// Check if the claims are expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Get the user ID from the subject claim
    pub fn user_id(&self) -> Option<UserId> {
        UserId::parse(&self.sub).ok()
    }
}

/// Signs and verifies typed, expiring tokens with a shared secret
///
/// Pure function of token, secret, and clock; holds no mutable state and is
/// cheap to share across request handlers.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_ttl: ChronoDuration,
    refresh_ttl: ChronoDuration,
}

impl TokenCodec {
    /// Create a codec from a validated config
    ///
    /// # Panics
    /// Panics if the configured TTLs do not fit a signed duration; the
    /// config defaults and env parsing keep them well inside that range.
    pub fn new(config: &AuthConfig) -> Self {
        let secret = config.token_secret.as_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry and type are checked explicitly after the signature so the
        // check order is fixed regardless of library behavior.
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims = HashSet::new();

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            access_ttl: ChronoDuration::from_std(config.access_token_ttl)
                .expect("access token TTL out of range"),
            refresh_ttl: ChronoDuration::from_std(config.refresh_token_ttl)
                .expect("refresh token TTL out of range"),
        }
    }

    /// Issue a token with the configured TTL for its type
    pub fn issue(
        &self,
        user_id: UserId,
        email: &str,
        role: Option<&str>,
        token_type: TokenType,
    ) -> Result<String, AuthError> {
        let ttl = match token_type {
            TokenType::Access => self.access_ttl,
            TokenType::Refresh => self.refresh_ttl,
        };
        self.issue_with_ttl(user_id, email, role, token_type, ttl)
    }

    /// Issue a token with an explicit TTL
    pub fn issue_with_ttl(
        &self,
        user_id: UserId,
        email: &str,
        role: Option<&str>,
        token_type: TokenType,
        ttl: ChronoDuration,
    ) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            role: role.map(str::to_string),
            token_type,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Token signing failed: {}", e);
            AuthError::Internal("token signing failed".to_string())
        })
    }

    /// Verify a token and return its claims
    ///
    /// Check order: signature, then type, then expiry.
    pub fn verify(&self, token: &str, expected_type: TokenType) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            tracing::debug!("Token rejected: {}", e);
            AuthError::InvalidToken
        })?;

        let claims = data.claims;

        if claims.token_type != expected_type {
            tracing::debug!(
                "Token type mismatch: expected {}, got {}",
                expected_type,
                claims.token_type
            );
            return Err(AuthError::WrongTokenType);
        }

        if claims.is_expired() {
            tracing::debug!("Token expired for subject {}", claims.sub);
            return Err(AuthError::TokenExpired);
        }

        Ok(claims)
    }
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}
