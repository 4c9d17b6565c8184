//! Password hashing and bearer-token issuance/verification.
//!
//! Everything here is a pure function over its inputs and the signing configuration;
//! nothing is cached and no token is remembered server-side, so logout is a client concern.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{config::JwtConfig, error::AppError};

/// Claims
///
/// Payload carried inside every issued token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (sub): the user's primary key.
    pub sub: Uuid,
    /// Expiration Time (exp), seconds since the epoch.
    pub exp: usize,
    /// Issued At (iat), seconds since the epoch.
    pub iat: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("invalid token")]
    Invalid,
    #[error("expired token")]
    Expired,
}

/// One-way salted bcrypt hash at the library's default cost.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))
}

/// Returns false, never an error, when `hash` is not a well-formed bcrypt string.
pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

/// [`hash_password`] on the blocking pool; bcrypt is CPU-bound and must stay off the
/// async workers.
pub async fn hash_password_blocking(password: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(format!("hashing task failed: {e}")))?
}

pub async fn verify_password_blocking(password: String, hash: String) -> bool {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .unwrap_or(false)
}

pub fn issue_token(
    jwt: &JwtConfig,
    subject: Uuid,
    expiry_minutes: i64,
) -> Result<String, AppError> {
    let now = Utc::now();
    let exp = Duration::try_minutes(expiry_minutes)
        .and_then(|lifetime| now.checked_add_signed(lifetime))
        .ok_or_else(|| AppError::Internal("token lifetime out of range".to_string()))?;
    let claims = Claims {
        sub: subject,
        iat: now.timestamp().max(0) as usize,
        exp: exp.timestamp().max(0) as usize,
    };

    encode(
        &Header::new(jwt.algorithm),
        &claims,
        &EncodingKey::from_secret(jwt.secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("token signing failed: {e}")))
}

/// Validates signature, algorithm and expiry and returns the subject id.
pub fn verify_token(jwt: &JwtConfig, token: &str) -> Result<Uuid, TokenError> {
    let mut validation = Validation::new(jwt.algorithm);
    validation.validate_exp = true;
    // Expiry is exact; a token is dead the second its ttl elapses.
    validation.leeway = 0;

    match decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt.secret.as_bytes()),
        &validation,
    ) {
        Ok(data) => Ok(data.claims.sub),
        Err(e) => match e.kind() {
            ErrorKind::ExpiredSignature => Err(TokenError::Expired),
            _ => Err(TokenError::Invalid),
        },
    }
}
