//! Password hashing and strength policy
//!
//! Hashing uses bcrypt with the library default cost. Verification goes
//! through bcrypt's own routine; a malformed stored hash reports a mismatch
//! rather than an error.

use bcrypt::DEFAULT_COST;

use crate::error::AuthError;

/// Symbols accepted by the policy and counted by the scorer
pub const SPECIAL_CHARS: &str = "!@#$%^&*()_+-=[]{}|;:,.<>?";

const COMMON_PASSWORDS: &[&str] = &[
    "password",
    "123456",
    "123456789",
    "qwerty",
    "abc123",
    "password123",
    "admin",
    "letmein",
    "welcome",
    "monkey",
    "dragon",
    "master",
    "sunshine",
    "princess",
    "shadow",
    "football",
    "baseball",
    "superman",
    "batman",
    "spider",
];

/// Hash a password with bcrypt
pub fn hash_password(plain: &str) -> Result<String, AuthError> {
    bcrypt::hash(plain, DEFAULT_COST).map_err(|e| {
        tracing::error!("Password hashing failed: {}", e);
        AuthError::Internal("password hashing failed".to_string())
    })
}

/// Verify a password against its stored hash
///
/// Malformed hashes yield `false`, never an error.
pub fn verify_password(plain: &str, hash: &str) -> bool {
    bcrypt::verify(plain, hash).unwrap_or(false)
}

/// Hard-gate password policy
///
/// Acceptable iff length >= `min_length` and the password contains at least
/// one uppercase letter, one lowercase letter, one digit, and one symbol
/// from [`SPECIAL_CHARS`].
pub fn meets_policy(password: &str, min_length: usize) -> bool {
    if password.chars().count() < min_length {
        return false;
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return false;
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return false;
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return false;
    }
    if !password.chars().any(|c| SPECIAL_CHARS.contains(c)) {
        return false;
    }
    true
}

/// Check a password against a short list of very common passwords
///
/// Advisory only; registration does not hard-gate on it.
pub fn is_common_password(password: &str) -> bool {
    let lowered = password.to_lowercase();
    COMMON_PASSWORDS.contains(&lowered.as_str())
}

/// Advisory strength score from 0 (worst) to 5 (best)
///
/// One point each for length >= 8, length >= 12, lowercase, uppercase,
/// digit, and symbol, capped at 5; two-point penalty for common passwords
/// and a floor of 0 for passwords under 4 characters.
pub fn strength_score(password: &str) -> u8 {
    let len = password.chars().count();
    let mut score: i32 = 0;

    if len >= 8 {
        score += 1;
    }
    if len >= 12 {
        score += 1;
    }
    if password.chars().any(|c| c.is_ascii_lowercase()) {
        score += 1;
    }
    if password.chars().any(|c| c.is_ascii_uppercase()) {
        score += 1;
    }
    if password.chars().any(|c| c.is_ascii_digit()) {
        score += 1;
    }
    if password.chars().any(|c| SPECIAL_CHARS.contains(c)) {
        score += 1;
    }

    if is_common_password(password) {
        score = (score - 2).max(0);
    }
    if len < 4 {
        score = 0;
    }

    score.min(5) as u8
}
