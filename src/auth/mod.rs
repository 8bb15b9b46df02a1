use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::SecurityConfig;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Any credential failure: missing, malformed, bad signature, expired.
    /// Deliberately carries no detail about which check rejected the token.
    #[error("Authentication failed!")]
    InvalidToken,

    #[error("JWT secret is not configured")]
    MissingSecret,

    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("password hashing error: {0}")]
    Hash(String),
}

/// Password hashing and token lifecycle. Stateless beyond its settings,
/// so it is cheap to clone into the shared app state.
#[derive(Clone)]
pub struct AuthService {
    secret: String,
    token_ttl: Duration,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(secret: impl Into<String>, token_ttl_secs: i64, bcrypt_cost: u32) -> Self {
        Self {
            secret: secret.into(),
            token_ttl: Duration::seconds(token_ttl_secs),
            bcrypt_cost,
        }
    }

    pub fn from_config(security: &SecurityConfig) -> Self {
        Self::new(
            security.jwt_secret.clone(),
            security.token_ttl_secs,
            security.bcrypt_cost,
        )
    }

    pub fn hash_password(&self, plaintext: &str) -> Result<String, AuthError> {
        bcrypt::hash(plaintext, self.bcrypt_cost).map_err(|e| AuthError::Hash(e.to_string()))
    }

    /// Constant-shape verify: hash-parse failures count as a mismatch.
    pub fn verify_password(&self, plaintext: &str, hash: &str) -> bool {
        bcrypt::verify(plaintext, hash).unwrap_or(false)
    }

    /// Sign a `{userId, email, iat, exp}` payload with the configured secret.
    pub fn issue_token(&self, user_id: Uuid, email: &str) -> Result<String, AuthError> {
        if self.secret.is_empty() {
            return Err(AuthError::MissingSecret);
        }

        let now = Utc::now();
        let claims = Claims {
            user_id,
            email: email.to_string(),
            iat: now.timestamp(),
            exp: (now + self.token_ttl).timestamp(),
        };

        let encoding_key = EncodingKey::from_secret(self.secret.as_bytes());
        encode(&Header::default(), &claims, &encoding_key)
            .map_err(|e| AuthError::TokenGeneration(e.to_string()))
    }

    /// Check signature and expiry. All failure modes collapse into
    /// `AuthError::InvalidToken`; the cause is only logged.
    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        if self.secret.is_empty() {
            return Err(AuthError::MissingSecret);
        }

        let decoding_key = DecodingKey::from_secret(self.secret.as_bytes());
        let mut validation = Validation::default();
        validation.leeway = 0;

        decode::<Claims>(token, &decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("token rejected: {}", e);
                AuthError::InvalidToken
            })
    }
}
