use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config;
use crate::database::models::user::Role;

/// Claims carried by the session token (cookie or bearer).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Account id.
    pub sub: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(sub: Uuid, email: String, name: Option<String>, role: Role) -> Self {
        let now = Utc::now();
        let ttl_hours = config::config().security.session_ttl_hours;
        let exp = (now + Duration::hours(ttl_hours as i64)).timestamp();

        Self {
            sub,
            email,
            name,
            role,
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug)]
pub enum TokenError {
    MissingSecret,
    Encode(String),
    Invalid(String),
}

impl std::fmt::Display for TokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenError::MissingSecret => write!(f, "Session secret not configured"),
            TokenError::Encode(msg) => write!(f, "Token generation error: {}", msg),
            TokenError::Invalid(msg) => write!(f, "Invalid session token: {}", msg),
        }
    }
}

impl std::error::Error for TokenError {}

/// Sign a session token with the configured secret.
pub fn generate_session_token(claims: &Claims) -> Result<String, TokenError> {
    encode_with_secret(claims, &config::config().security.session_secret)
}

/// Validate a session token and return its claims. Expiry is enforced.
pub fn verify_session_token(token: &str) -> Result<Claims, TokenError> {
    decode_with_secret(token, &config::config().security.session_secret)
}

fn encode_with_secret(claims: &Claims, secret: &str) -> Result<String, TokenError> {
    if secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), claims, &encoding_key)
        .map_err(|e| TokenError::Encode(e.to_string()))
}

fn decode_with_secret(token: &str, secret: &str) -> Result<Claims, TokenError> {
    if secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let data = decode::<Claims>(token, &decoding_key, &Validation::default())
        .map_err(|e| TokenError::Invalid(e.to_string()))?;

    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_claims(role: Role) -> Claims {
        let now = Utc::now();
        Claims {
            sub: Uuid::new_v4(),
            email: "agent@example.com".to_string(),
            name: Some("Agent".to_string()),
            role,
            exp: (now + Duration::hours(1)).timestamp(),
            iat: now.timestamp(),
        }
    }

    #[test]
    fn token_round_trips_claims() {
        let claims = sample_claims(Role::Agent);
        let token = encode_with_secret(&claims, "test-secret").unwrap();
        let decoded = decode_with_secret(&token, "test-secret").unwrap();

        assert_eq!(decoded.sub, claims.sub);
        assert_eq!(decoded.email, claims.email);
        assert_eq!(decoded.role, Role::Agent);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = encode_with_secret(&sample_claims(Role::User), "secret-a").unwrap();
        assert!(matches!(
            decode_with_secret(&token, "secret-b"),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let mut claims = sample_claims(Role::Admin);
        claims.exp = (Utc::now() - Duration::hours(2)).timestamp();
        let token = encode_with_secret(&claims, "test-secret").unwrap();
        assert!(matches!(
            decode_with_secret(&token, "test-secret"),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn empty_secret_is_refused() {
        assert!(matches!(
            encode_with_secret(&sample_claims(Role::User), ""),
            Err(TokenError::MissingSecret)
        ));
    }
}
