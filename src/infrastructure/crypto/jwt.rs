//! JWT Token handling

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::User;

/// Longest accepted token lifetime (one year).
pub const MAX_EXPIRATION_HOURS: i64 = 24 * 365;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token lifetime of {0}h is out of range")]
    Lifetime(i64),
    #[error(transparent)]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens
    pub secret: String,
    /// Token expiration time in hours
    pub expiration_hours: i64,
    /// Issuer claim
    pub issuer: String,
}

impl JwtConfig {
    /// Token lifetime, `None` when `expiration_hours` is outside
    /// `1..=MAX_EXPIRATION_HOURS`.
    pub fn lifetime(&self) -> Option<Duration> {
        if !(1..=MAX_EXPIRATION_HOURS).contains(&self.expiration_hours) {
            return None;
        }
        Duration::try_hours(self.expiration_hours)
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "super-secret-key-change-in-production".to_string(),
            expiration_hours: 24,
            issuer: "roster".to_string(),
        }
    }
}

/// JWT TokenClaims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TokenClaims {
    /// Subject (user ID)
    pub sub: String,
    pub email: String,
    /// Effective roles at the time the token was issued
    pub roles: Vec<String>,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Issuer
    pub iss: String,
}

impl TokenClaims {
    /// Create new claims for a user
    pub fn new(user: &User, config: &JwtConfig) -> Result<Self, TokenError> {
        let lifetime = config
            .lifetime()
            .ok_or(TokenError::Lifetime(config.expiration_hours))?;
        let now = Utc::now();
        let exp = now
            .checked_add_signed(lifetime)
            .ok_or(TokenError::Lifetime(config.expiration_hours))?;

        Ok(Self {
            sub: user.id.to_string(),
            email: user.email.clone(),
            roles: user
                .effective_roles()
                .iter()
                .map(|r| r.as_str().to_string())
                .collect(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: config.issuer.clone(),
        })
    }

    /// Check if the token is expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

/// Create a JWT token for a user
pub fn create_token(user: &User, config: &JwtConfig) -> Result<String, TokenError> {
    let token_claims = TokenClaims::new(user, config)?;

    let token = encode(
        &Header::default(),
        &token_claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )?;
    Ok(token)
}

/// Verify and decode a JWT token
pub fn verify_token(
    token: &str,
    config: &JwtConfig,
) -> Result<TokenClaims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default();
    validation.set_issuer(&[&config.issuer]);

    let token_data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;

    Ok(token_data.claims)
}
